//! Project-wide text search.

use crate::error::ShellError;
use crate::tree::{Node, Project};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub match_case: bool,
    /// Ignored when `regex` is set
    pub whole_word: bool,
    pub regex: bool,
}

/// One match. `line` and `column` are 1-based; `match_start` and
/// `match_end` are character offsets into `line_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub path: String,
    pub line: usize,
    pub column: usize,
    pub line_content: String,
    pub match_text: String,
    pub match_start: usize,
    pub match_end: usize,
}

pub fn build_matcher(query: &str, options: SearchOptions) -> Result<Regex, ShellError> {
    let pattern = if options.regex {
        query.to_string()
    } else if options.whole_word {
        format!(r"\b{}\b", regex::escape(query))
    } else {
        regex::escape(query)
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(!options.match_case)
        .build()
        .map_err(|e| ShellError::Search(e.to_string()))
}

/// Search every file in tree order. An empty query finds nothing.
pub fn search_project(
    project: &Project,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<SearchResult>, ShellError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let matcher = build_matcher(query, options)?;
    let mut results = Vec::new();
    for (path, node) in project.walk() {
        if let Node::File(file) = node {
            search_text(&matcher, &path, &file.content, &mut results);
        }
    }
    Ok(results)
}

fn search_text(matcher: &Regex, path: &str, text: &str, results: &mut Vec<SearchResult>) {
    for (index, line) in text.lines().enumerate() {
        for found in matcher.find_iter(line) {
            if found.as_str().is_empty() {
                continue;
            }
            let start = line[..found.start()].chars().count();
            let end = start + found.as_str().chars().count();
            results.push(SearchResult {
                path: path.to_string(),
                line: index + 1,
                column: start + 1,
                line_content: line.to_string(),
                match_text: found.as_str().to_string(),
                match_start: start,
                match_end: end,
            });
        }
    }
}
