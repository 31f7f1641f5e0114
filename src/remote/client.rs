//! Repository client contract and the wire types it returns.

use crate::error::ImportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `owner/name` reference to a remote repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/repo` or a github.com URL (`.git` suffix allowed).
    pub fn parse(input: &str) -> Result<Self, ImportError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ImportError::InvalidRepository(
                "expected a repository URL or owner/repo".to_string(),
            ));
        }

        let (owner, name) = if trimmed.contains("github.com") {
            let cleaned = trimmed.trim_end_matches('/');
            let cleaned = cleaned.strip_suffix(".git").unwrap_or(cleaned);
            let mut parts = cleaned.rsplit('/');
            let name = parts.next().unwrap_or_default();
            let owner = parts.next().unwrap_or_default();
            (owner, name)
        } else if let Some((owner, rest)) = trimmed.split_once('/') {
            (owner, rest.split('/').next().unwrap_or_default())
        } else {
            return Err(ImportError::InvalidRepository(trimmed.to_string()));
        };

        if owner.is_empty() || name.is_empty() || owner.contains(':') {
            return Err(ImportError::InvalidRepository(format!(
                "could not parse repository owner or name from {}",
                trimmed
            )));
        }
        Ok(Self::new(owner, name))
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepoRef {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Repository metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub full_name: String,
    pub owner: String,
    pub description: Option<String>,
    pub html_url: String,
    pub clone_url: String,
    pub default_branch: String,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
}

/// Listing entry kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// File
    Blob,
    /// Directory
    Tree,
    /// Submodule pointer
    Commit,
    #[serde(other)]
    Other,
}

/// One entry of the flat recursive listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: Option<u64>,
    pub sha: String,
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>, size: u64, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
            size: Some(size),
            sha: sha.into(),
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Tree,
            size: None,
            sha: String::new(),
        }
    }
}

/// Recursive listing of a branch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryTree {
    #[serde(rename = "tree", default)]
    pub entries: Vec<TreeEntry>,
    /// The server cut the listing short
    #[serde(default)]
    pub truncated: bool,
}

/// Remote source the import pipeline reads from.
///
/// Async because every call is a network request.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    async fn fetch_repository(&self, repo: &RepoRef) -> Result<RepositoryInfo, ImportError>;

    async fn fetch_tree(&self, repo: &RepoRef, branch: &str) -> Result<RepositoryTree, ImportError>;

    /// Raw text of a blob by content id.
    async fn fetch_blob(&self, repo: &RepoRef, sha: &str) -> Result<String, ImportError>;
}
