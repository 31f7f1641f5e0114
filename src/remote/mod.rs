//! Remote import: repository clients, the import pipeline, local folder
//! import and recent-repository history.

pub mod client;
pub mod content;
pub mod github;
pub mod local;
pub mod pipeline;
pub mod recent;

pub use client::{EntryKind, RepoRef, RepositoryClient, RepositoryInfo, RepositoryTree, TreeEntry};
pub use github::GitHubClient;
pub use local::import_directory;
pub use pipeline::{ImportPipeline, ImportReport, ImportStage, ImportedProject};
pub use recent::{RecentRepositories, RecentRepository};
