//! Binary sniffing and placeholder text for imported files.

/// Characters inspected by [`is_binary`]
pub const BINARY_SAMPLE_CHARS: usize = 1000;

/// Heuristic binary check.
///
/// Binary if the text holds a NUL, or if more than 10% of the first
/// [`BINARY_SAMPLE_CHARS`] characters are control characters other than
/// tab, LF and CR (DEL counts as control). Approximate; UTF-8 text in other
/// scripts is never flagged.
pub fn is_binary(content: &str) -> bool {
    if content.contains('\0') {
        return true;
    }
    let mut sampled = 0usize;
    let mut non_printable = 0usize;
    for c in content.chars().take(BINARY_SAMPLE_CHARS) {
        sampled += 1;
        let code = c as u32;
        if (code < 32 && !matches!(c, '\t' | '\n' | '\r')) || code == 127 {
            non_printable += 1;
        }
    }
    sampled > 0 && non_printable * 10 > sampled
}

pub fn binary_placeholder(len: usize) -> String {
    format!("// Binary file - cannot display content\n// Size: {} bytes", len)
}

/// Placeholder for a file skipped because of its size; `location` is where
/// the original can be viewed.
pub fn oversized_placeholder(size: u64, location: &str) -> String {
    let kb = (size as f64 / 1024.0).round() as u64;
    format!(
        "// This file is too large to display ({}KB)\n// View the original file at: {}",
        kb, location
    )
}

pub fn error_placeholder(message: &str) -> String {
    format!("// Error loading file content: {}", message)
}

pub const EMPTY_PLACEHOLDER: &str = "// Empty file";
