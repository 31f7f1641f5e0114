//! Slash-delimited project paths.
//!
//! Paths are plain strings whose first segment is the project root folder,
//! e.g. `demo/src/index.html`. Nothing here touches the real filesystem.

/// Normalize a path: trims whitespace, drops empty and `.` segments, and
/// joins the remainder with single slashes.
pub fn normalize(path: &str) -> String {
    segments(path).collect::<Vec<_>>().join("/")
}

/// Iterate the non-empty segments of a path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.trim()
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != ".")
}

/// Parent of a path, or `None` for a single-segment (root) path.
pub fn parent(path: &str) -> Option<String> {
    let normalized = normalize(path);
    normalized
        .rsplit_once('/')
        .map(|(parent, _)| parent.to_string())
}

/// Last segment of a path. Empty for an empty path.
pub fn leaf_name(path: &str) -> String {
    segments(path).last().unwrap_or_default().to_string()
}

/// Join a folder path and a child name.
pub fn join(parent: &str, name: &str) -> String {
    let parent = normalize(parent);
    let name = normalize(name);
    match (parent.is_empty(), name.is_empty()) {
        (true, _) => name,
        (_, true) => parent,
        _ => format!("{}/{}", parent, name),
    }
}

/// True when `path` equals `ancestor` or lies beneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    let path = normalize(path);
    let ancestor = normalize(ancestor);
    path == ancestor
        || (path.len() > ancestor.len()
            && path.starts_with(&ancestor)
            && path.as_bytes()[ancestor.len()] == b'/')
}

/// Re-root `path` from `old_prefix` onto `new_prefix`.
///
/// Returns `None` when `path` is not within `old_prefix`.
pub fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if !is_within(path, old_prefix) {
        return None;
    }
    let path = normalize(path);
    let old_prefix = normalize(old_prefix);
    let rest = &path[old_prefix.len()..];
    Some(format!("{}{}", normalize(new_prefix), rest))
}

/// A node name is valid when it is non-empty, contains no `/`, is not a
/// relative marker and has no surrounding whitespace (which [`segments`]
/// would strip, leaving the node unreachable).
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.trim() == name
        && !name.contains('/')
        && name != "."
        && name != ".."
}

/// File extension of the leaf segment, lowercased.
pub fn extension(path: &str) -> Option<String> {
    let leaf = leaf_name(path);
    let (stem, ext) = leaf.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_slashes() {
        assert_eq!(normalize("/demo//src/./index.html/"), "demo/src/index.html");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  demo "), "demo");
    }

    #[test]
    fn parent_and_leaf() {
        assert_eq!(parent("demo/src/app.js").as_deref(), Some("demo/src"));
        assert_eq!(parent("demo"), None);
        assert_eq!(leaf_name("demo/src/app.js"), "app.js");
        assert_eq!(leaf_name(""), "");
    }

    #[test]
    fn join_handles_empty_sides() {
        assert_eq!(join("demo", "a.txt"), "demo/a.txt");
        assert_eq!(join("", "demo"), "demo");
        assert_eq!(join("demo/", "/a.txt"), "demo/a.txt");
    }

    #[test]
    fn within_respects_segment_boundaries() {
        assert!(is_within("demo/src/a.js", "demo/src"));
        assert!(is_within("demo/src", "demo/src"));
        assert!(!is_within("demo/srcs/a.js", "demo/src"));
        assert!(!is_within("demo", "demo/src"));
    }

    #[test]
    fn rebase_moves_prefix() {
        assert_eq!(
            rebase("demo/src/a.js", "demo/src", "demo/lib").as_deref(),
            Some("demo/lib/a.js")
        );
        assert_eq!(rebase("demo/src", "demo/src", "demo/lib").as_deref(), Some("demo/lib"));
        assert_eq!(rebase("demo/other", "demo/src", "demo/lib"), None);
    }

    #[test]
    fn names_and_extensions() {
        assert!(is_valid_name("index.html"));
        assert!(!is_valid_name("a/b"));
        assert!(!is_valid_name(" "));
        assert!(!is_valid_name(".."));
        assert!(!is_valid_name(" notes.txt"));
        assert!(!is_valid_name("notes.txt\t"));
        assert!(is_valid_name("my notes.txt"));
        assert_eq!(extension("demo/Main.RS").as_deref(), Some("rs"));
        assert_eq!(extension("demo/.gitignore"), None);
        assert_eq!(extension("demo/Makefile"), None);
    }
}
