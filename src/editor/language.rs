//! File extension to editor language mapping.

use crate::tree::path;

/// Editor language id for a path, by extension. Unknown extensions map to
/// `plaintext`.
pub fn language_for_path(file_path: &str) -> &'static str {
    match path::extension(file_path).as_deref() {
        Some("js" | "jsx" | "mjs" | "cjs") => "javascript",
        Some("ts" | "tsx") => "typescript",
        Some("html" | "htm") => "html",
        Some("css") => "css",
        Some("scss") => "scss",
        Some("less") => "less",
        Some("json") => "json",
        Some("md" | "markdown") => "markdown",
        Some("php") => "php",
        Some("py") => "python",
        Some("rb") => "ruby",
        Some("java") => "java",
        Some("c" | "h") => "c",
        Some("cpp" | "cc" | "cxx" | "hpp") => "cpp",
        Some("cs") => "csharp",
        Some("go") => "go",
        Some("rs") => "rust",
        Some("swift") => "swift",
        Some("sql") => "sql",
        Some("yaml" | "yml") => "yaml",
        Some("xml" | "svg") => "xml",
        Some("sh" | "bash") => "shell",
        Some("toml") => "ini",
        _ => "plaintext",
    }
}

/// Human-readable label for a language id, as shown in the status bar.
pub fn language_label(language: &str) -> &str {
    match language {
        "plaintext" => "Plain Text",
        "javascript" => "JavaScript",
        "typescript" => "TypeScript",
        "html" => "HTML",
        "css" => "CSS",
        "scss" => "SCSS",
        "json" => "JSON",
        "markdown" => "Markdown",
        "python" => "Python",
        "java" => "Java",
        "csharp" => "C#",
        "cpp" => "C++",
        "c" => "C",
        "php" => "PHP",
        "rust" => "Rust",
        "go" => "Go",
        other => other,
    }
}
