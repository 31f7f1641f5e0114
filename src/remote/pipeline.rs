//! Remote import pipeline
//!
//! metadata -> recursive listing -> skeleton -> batched blob fetch -> tree.
//! Failures in the first two steps abort the import. Per-file failures
//! become placeholder content and never abort a batch. The tree is built off
//! to the side; installing it is the caller's job.

use super::client::{EntryKind, RepoRef, RepositoryClient, RepositoryInfo, TreeEntry};
use super::content;
use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::tree::{path, FileNode, FolderNode, Node, Project};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Import progress, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Initializing,
    FetchingMetadata,
    FetchingContents,
    ProcessingFiles,
    FetchingBlobs { completed: usize, total: usize },
    Finalizing,
    Complete,
}

impl ImportStage {
    /// Rough completion percentage for progress bars
    pub fn percent(&self) -> u8 {
        match *self {
            ImportStage::Initializing => 0,
            ImportStage::FetchingMetadata => 10,
            ImportStage::FetchingContents => 30,
            ImportStage::ProcessingFiles => 50,
            ImportStage::FetchingBlobs { completed, total } => {
                if total == 0 {
                    90
                } else {
                    (60 + completed.min(total) * 30 / total) as u8
                }
            }
            ImportStage::Finalizing => 90,
            ImportStage::Complete => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImportStage::Initializing => "Initializing",
            ImportStage::FetchingMetadata => "Fetching repository metadata",
            ImportStage::FetchingContents => "Fetching repository contents",
            ImportStage::ProcessingFiles => "Processing files",
            ImportStage::FetchingBlobs { .. } => "Creating project structure",
            ImportStage::Finalizing => "Finalizing",
            ImportStage::Complete => "Complete",
        }
    }
}

/// Counts gathered while assembling an imported tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Where the tree came from (`owner/repo` or a directory)
    pub source: String,
    pub folders: usize,
    pub files: usize,
    /// Files whose real content was loaded
    pub fetched: usize,
    /// Files replaced by the size placeholder
    pub oversized: usize,
    /// Files replaced by the binary placeholder
    pub binary: usize,
    /// Project paths (root name first, e.g. `repo/src/main.rs`) of files
    /// that could not be loaded and hold an error placeholder
    pub failed: Vec<String>,
    /// Listing entries that could not be placed (submodules, name clashes)
    pub skipped: usize,
}

/// A fully assembled project ready to be installed
#[derive(Debug, Clone)]
pub struct ImportedProject {
    pub project: Project,
    pub report: ImportReport,
    pub repository: Option<RepositoryInfo>,
}

struct PendingFile {
    path: String,
    sha: String,
    size: u64,
}

enum FetchOutcome {
    Text(String),
    Binary(usize),
    Failed(String),
}

pub struct ImportPipeline {
    client: Arc<dyn RepositoryClient>,
    max_file_size: u64,
    batch_size: usize,
}

impl ImportPipeline {
    pub fn new(client: Arc<dyn RepositoryClient>, config: &ImportConfig) -> Self {
        Self {
            client,
            max_file_size: config.max_file_size,
            batch_size: config.batch_size.max(1),
        }
    }

    pub fn with_limits(mut self, max_file_size: u64, batch_size: usize) -> Self {
        self.max_file_size = max_file_size;
        self.batch_size = batch_size.max(1);
        self
    }

    /// Run the import for `repo`, reporting stages to `progress` if given.
    pub async fn run(
        &self,
        repo: &RepoRef,
        progress: Option<&UnboundedSender<ImportStage>>,
    ) -> Result<ImportedProject, ImportError> {
        report(progress, ImportStage::Initializing);
        info!(repository = %repo, "Starting repository import");

        report(progress, ImportStage::FetchingMetadata);
        let repository = self.client.fetch_repository(repo).await?;

        report(progress, ImportStage::FetchingContents);
        let listing = self.client.fetch_tree(repo, &repository.default_branch).await?;
        if listing.truncated {
            warn!(repository = %repo, "Repository listing was truncated by the server");
        }

        report(progress, ImportStage::ProcessingFiles);
        let mut root = FolderNode::new(repository.name.as_str());
        let mut import_report = ImportReport {
            source: repository.full_name.clone(),
            ..Default::default()
        };
        let pending = self.build_skeleton(&mut root, &repository, &listing.entries, &mut import_report);

        let total = pending.len();
        report(progress, ImportStage::FetchingBlobs { completed: 0, total });
        let mut completed = 0;
        for batch in pending.chunks(self.batch_size) {
            let outcomes = join_all(batch.iter().map(|file| self.fetch_one(repo, file))).await;
            for (file, outcome) in batch.iter().zip(outcomes) {
                let text = match outcome {
                    FetchOutcome::Text(text) => {
                        import_report.fetched += 1;
                        if text.is_empty() {
                            content::EMPTY_PLACEHOLDER.to_string()
                        } else {
                            text
                        }
                    }
                    FetchOutcome::Binary(len) => {
                        import_report.binary += 1;
                        content::binary_placeholder(len)
                    }
                    FetchOutcome::Failed(message) => {
                        import_report.failed.push(file.path.clone());
                        content::error_placeholder(&message)
                    }
                };
                set_content(&mut root, &file.path, text);
            }
            completed += batch.len();
            report(progress, ImportStage::FetchingBlobs { completed, total });
        }

        report(progress, ImportStage::Finalizing);
        let project = Project::from_root(root)
            .map_err(|e| ImportError::fetch_failed("project assembly", e))?;
        info!(
            repository = %repo,
            files = import_report.files,
            failed = import_report.failed.len(),
            "Repository import finished"
        );
        report(progress, ImportStage::Complete);

        Ok(ImportedProject {
            project,
            report: import_report,
            repository: Some(repository),
        })
    }

    /// Create folders then files from the flat listing.
    ///
    /// Returns the files that still need their content fetched; oversized
    /// files get their placeholder here.
    fn build_skeleton(
        &self,
        root: &mut FolderNode,
        repository: &RepositoryInfo,
        entries: &[TreeEntry],
        report: &mut ImportReport,
    ) -> Vec<PendingFile> {
        for entry in entries.iter().filter(|e| e.kind == EntryKind::Tree) {
            if folder_at(root, &entry.path).is_some() {
                report.folders += 1;
            } else {
                warn!(path = %entry.path, "Folder collides with a file; skipped");
                report.skipped += 1;
            }
        }

        let mut pending = Vec::new();
        for entry in entries {
            match entry.kind {
                EntryKind::Blob => {}
                EntryKind::Tree => continue,
                EntryKind::Commit | EntryKind::Other => {
                    debug!(path = %entry.path, "Skipping non-file listing entry");
                    report.skipped += 1;
                    continue;
                }
            }
            let size = entry.size.unwrap_or(0);
            let (dir, name) = match entry.path.rsplit_once('/') {
                Some((dir, name)) => (dir, name),
                None => ("", entry.path.as_str()),
            };
            let Some(parent) = folder_at(root, dir) else {
                warn!(path = %entry.path, "Parent of file is not a folder; skipped");
                report.skipped += 1;
                continue;
            };
            if !path::is_valid_name(name) || parent.contains(name) {
                report.skipped += 1;
                continue;
            }

            let full_path = path::join(&repository.name, &entry.path);
            let body = if size < self.max_file_size {
                pending.push(PendingFile {
                    path: full_path,
                    sha: entry.sha.clone(),
                    size,
                });
                String::new()
            } else {
                report.oversized += 1;
                let location = format!(
                    "{}/blob/{}/{}",
                    repository.html_url, repository.default_branch, entry.path
                );
                content::oversized_placeholder(size, &location)
            };
            parent.insert(Node::File(FileNode {
                name: name.to_string(),
                content: body,
                sha: Some(entry.sha.clone()),
                size: Some(size),
            }));
            report.files += 1;
        }
        pending
    }

    async fn fetch_one(&self, repo: &RepoRef, file: &PendingFile) -> FetchOutcome {
        match self.client.fetch_blob(repo, &file.sha).await {
            Ok(text) if content::is_binary(&text) => FetchOutcome::Binary(text.len()),
            Ok(text) => FetchOutcome::Text(text),
            Err(e) => {
                warn!(path = %file.path, size = file.size, error = %e, "Failed to fetch file");
                FetchOutcome::Failed(e.to_string())
            }
        }
    }
}

fn report(progress: Option<&UnboundedSender<ImportStage>>, stage: ImportStage) {
    if let Some(tx) = progress {
        // a dropped receiver only means nobody is watching
        let _ = tx.send(stage);
    }
}

/// Walk (creating as needed) to the folder at a root-relative path.
///
/// `None` when a file occupies one of the segments.
pub(crate) fn folder_at<'a>(root: &'a mut FolderNode, relative: &str) -> Option<&'a mut FolderNode> {
    let mut current = root;
    for part in path::segments(relative) {
        if !path::is_valid_name(part) {
            return None;
        }
        current = current.folder_entry(part)?;
    }
    Some(current)
}

/// Fill in a file created by the skeleton pass; `full_path` includes the root name.
fn set_content(root: &mut FolderNode, full_path: &str, text: String) {
    let relative = match full_path.split_once('/') {
        Some((_, rest)) => rest,
        None => return,
    };
    let (dir, name) = relative.rsplit_once('/').unwrap_or(("", relative));
    if let Some(Node::File(file)) = folder_at(root, dir).and_then(|f| f.child_mut(name)) {
        file.content = text;
    }
}
