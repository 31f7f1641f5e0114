//! Local folder import ("open folder").

use super::content;
use super::pipeline::{folder_at, ImportReport, ImportedProject};
use crate::error::ImportError;
use crate::tree::{path, FolderNode, Node, Project};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Directory names never descended into
pub const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "target"];

/// Build a project from a directory on disk.
///
/// The project is named after the directory. Files at or above
/// `max_file_size` bytes and binary files get the same placeholders as a
/// remote import. Unreadable entries are logged and skipped.
pub fn import_directory(dir: &Path, max_file_size: u64) -> Result<ImportedProject, ImportError> {
    let root_dir = dir.canonicalize()?;
    let name = root_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    let mut root = FolderNode::new(name.as_str());
    let mut report = ImportReport {
        source: root_dir.display().to_string(),
        ..Default::default()
    };

    let walker = WalkDir::new(&root_dir)
        .follow_links(false)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !(e.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                report.skipped += 1;
                continue;
            }
        };
        let Ok(relative) = entry.path().strip_prefix(&root_dir) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            if folder_at(&mut root, &relative).is_some() {
                report.folders += 1;
            } else {
                report.skipped += 1;
            }
            continue;
        }
        if !entry.file_type().is_file() {
            debug!(path = %relative, "Skipping special file");
            report.skipped += 1;
            continue;
        }

        let (parent_dir, file_name) = relative.rsplit_once('/').unwrap_or(("", relative.as_str()));
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let body = if size >= max_file_size {
            report.oversized += 1;
            content::oversized_placeholder(size, &entry.path().display().to_string())
        } else {
            match std::fs::read(entry.path()) {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    if content::is_binary(&text) {
                        report.binary += 1;
                        content::binary_placeholder(bytes.len())
                    } else {
                        report.fetched += 1;
                        text
                    }
                }
                Err(e) => {
                    warn!(path = %relative, error = %e, "Failed to read file");
                    report.failed.push(path::join(&name, &relative));
                    content::error_placeholder(&e.to_string())
                }
            }
        };

        if !path::is_valid_name(file_name) {
            warn!(path = %relative, "File name cannot be addressed in the tree; skipped");
            report.skipped += 1;
            continue;
        }
        match folder_at(&mut root, parent_dir) {
            Some(parent) => {
                parent.insert(Node::file(file_name, body));
                report.files += 1;
            }
            None => report.skipped += 1,
        }
    }

    let project = Project::from_root(root)
        .map_err(|e| ImportError::fetch_failed("project assembly", e))?;
    info!(source = %report.source, files = report.files, "Imported local folder");
    Ok(ImportedProject {
        project,
        report,
        repository: None,
    })
}
