//! Virtual project tree
//!
//! Path-addressed CRUD over a single in-memory folder/file tree. Every path
//! starts with the project root name (`demo/src/app.js`). All operations are
//! synchronous; callers sequence tab bookkeeping after a mutation succeeds.

use super::node::{FileNode, FolderNode, Node};
use super::path;
use crate::error::{ShellError, StorageError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What happens when a created, renamed or moved node lands on an existing name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Replace the existing node (last write wins)
    #[default]
    Overwrite,
    /// Fail with `AlreadyExists`
    Reject,
    /// Pick a free name such as `index (1).html`
    AutoRename,
}

/// Result of a create operation
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    /// Path of the new node (may differ from the request under auto-rename)
    pub path: String,
    /// Node that was overwritten, if any
    pub replaced: Option<Node>,
}

/// Result of a rename or move
#[derive(Debug, Clone, PartialEq)]
pub struct Relocated {
    pub from: String,
    pub to: String,
    /// Node that was overwritten at the destination, if any
    pub replaced: Option<Node>,
}

/// Storage shape: `{ name, fileSystem }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProject {
    pub name: String,
    #[serde(rename = "fileSystem")]
    pub file_system: Node,
}

/// A named project rooted at a single folder
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    root: Node,
    collision: CollisionPolicy,
}

impl Project {
    /// Create an empty project whose root folder carries `name`.
    pub fn new(name: impl Into<String>) -> Result<Self, ShellError> {
        Self::from_root(FolderNode::new(name))
    }

    /// Wrap an existing folder as a project root.
    pub fn from_root(root: FolderNode) -> Result<Self, ShellError> {
        if !path::is_valid_name(&root.name) {
            return Err(ShellError::InvalidName(root.name));
        }
        Ok(Self {
            root: Node::Folder(root),
            collision: CollisionPolicy::default(),
        })
    }

    pub fn with_collision_policy(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    pub fn set_collision_policy(&mut self, collision: CollisionPolicy) {
        self.collision = collision;
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision
    }

    pub fn name(&self) -> &str {
        self.root.name()
    }

    pub fn root(&self) -> &FolderNode {
        match &self.root {
            Node::Folder(folder) => folder,
            Node::File(_) => unreachable!("project root is always a folder"),
        }
    }

    /// Resolve a path to a node.
    ///
    /// Fails with `NotFound` if any segment is absent, if a non-terminal
    /// segment is a file, or if the first segment is not the root name.
    pub fn resolve(&self, target: &str) -> Result<&Node, ShellError> {
        let mut parts = path::segments(target);
        if parts.next() != Some(self.name()) {
            return Err(ShellError::NotFound(path::normalize(target)));
        }
        let mut current = &self.root;
        for part in parts {
            current = match current {
                Node::Folder(folder) => folder.child(part),
                Node::File(_) => None,
            }
            .ok_or_else(|| ShellError::NotFound(path::normalize(target)))?;
        }
        Ok(current)
    }

    fn resolve_mut(&mut self, target: &str) -> Result<&mut Node, ShellError> {
        let normalized = path::normalize(target);
        let root_name = self.name().to_string();
        let mut parts = path::segments(&normalized);
        if parts.next() != Some(root_name.as_str()) {
            return Err(ShellError::NotFound(normalized.clone()));
        }
        let mut current = &mut self.root;
        for part in parts {
            current = match current {
                Node::Folder(folder) => folder.child_mut(part),
                Node::File(_) => None,
            }
            .ok_or_else(|| ShellError::NotFound(normalized.clone()))?;
        }
        Ok(current)
    }

    /// Resolve a folder for insertion; anything else is `ParentNotFound`.
    fn parent_folder_mut(&mut self, parent: &str) -> Result<&mut FolderNode, ShellError> {
        match self.resolve_mut(parent) {
            Ok(Node::Folder(folder)) => Ok(folder),
            _ => Err(ShellError::ParentNotFound(path::normalize(parent))),
        }
    }

    pub fn exists(&self, target: &str) -> bool {
        self.resolve(target).is_ok()
    }

    /// Resolve a path that must be a file.
    pub fn file(&self, target: &str) -> Result<&FileNode, ShellError> {
        self.resolve(target)?
            .as_file()
            .ok_or_else(|| ShellError::FileNotFound(path::normalize(target)))
    }

    pub fn read_file(&self, target: &str) -> Result<&str, ShellError> {
        self.file(target).map(|f| f.content.as_str())
    }

    /// Create a file under `parent`.
    pub fn create_file(
        &mut self,
        parent: &str,
        name: &str,
        content: impl Into<String>,
    ) -> Result<Created, ShellError> {
        self.insert_node(parent, Node::file(name, content))
    }

    /// Create an empty folder under `parent`.
    pub fn create_folder(&mut self, parent: &str, name: &str) -> Result<Created, ShellError> {
        self.insert_node(parent, Node::folder(name))
    }

    /// Attach a prepared node under `parent`, honouring the collision policy.
    pub fn insert_node(&mut self, parent: &str, mut node: Node) -> Result<Created, ShellError> {
        if !path::is_valid_name(node.name()) {
            return Err(ShellError::InvalidName(node.name().to_string()));
        }
        let collision = self.collision;
        let folder = self.parent_folder_mut(parent)?;
        let name = settle_name(folder, node.name(), collision, parent)?;
        node.set_name(name.clone());
        let replaced = folder.insert(node);
        let created = path::join(parent, &name);
        debug!(path = %created, replaced = replaced.is_some(), "Created node");
        Ok(Created {
            path: created,
            replaced,
        })
    }

    /// Copy a file next to itself as `<stem> copy.<ext>`.
    ///
    /// The copy goes through [`Project::insert_node`], so an existing
    /// `… copy` sibling is handled by the collision policy.
    pub fn duplicate(&mut self, target: &str) -> Result<Created, ShellError> {
        let source = path::normalize(target);
        let Some(parent) = path::parent(&source) else {
            return Err(ShellError::RootOperation(source));
        };
        let content = self.file(&source)?.content.clone();
        let name = copy_name(&path::leaf_name(&source));
        self.insert_node(&parent, Node::file(name, content))
    }

    /// Re-key a node under its parent. Renaming the root renames the project.
    pub fn rename(&mut self, target: &str, new_name: &str) -> Result<Relocated, ShellError> {
        if !path::is_valid_name(new_name) {
            return Err(ShellError::InvalidName(new_name.to_string()));
        }
        let from = path::normalize(target);
        self.resolve(&from)?;

        let Some(parent) = path::parent(&from) else {
            self.root.set_name(new_name.to_string());
            debug!(from = %from, to = %new_name, "Renamed project root");
            return Ok(Relocated {
                from,
                to: new_name.to_string(),
                replaced: None,
            });
        };

        let old_name = path::leaf_name(&from);
        if old_name == new_name {
            return Ok(Relocated {
                to: from.clone(),
                from,
                replaced: None,
            });
        }

        let collision = self.collision;
        let folder = self.parent_folder_mut(&parent)?;
        let name = settle_name(folder, new_name, collision, &parent)?;
        let replaced = folder.remove(&name);
        folder
            .child_mut(&old_name)
            .ok_or_else(|| ShellError::NotFound(from.clone()))?
            .set_name(name.clone());

        let to = path::join(&parent, &name);
        debug!(from = %from, to = %to, "Renamed node");
        Ok(Relocated { from, to, replaced })
    }

    /// Move a node into `dest_folder`, keeping its leaf name.
    pub fn move_node(&mut self, source: &str, dest_folder: &str) -> Result<Relocated, ShellError> {
        let from = path::normalize(source);
        let dest = path::normalize(dest_folder);
        self.resolve(&from)?;
        let Some(old_parent) = path::parent(&from) else {
            return Err(ShellError::RootOperation(from));
        };
        match self.resolve(&dest) {
            Ok(node) if node.is_folder() => {}
            _ => return Err(ShellError::ParentNotFound(dest)),
        }
        if path::is_within(&dest, &from) {
            return Err(ShellError::InvalidMove { from, to: dest });
        }
        if old_parent == dest {
            return Ok(Relocated {
                to: from.clone(),
                from,
                replaced: None,
            });
        }

        let leaf = path::leaf_name(&from);
        let collision = self.collision;
        let name = {
            let target = self.parent_folder_mut(&dest)?;
            settle_name(target, &leaf, collision, &dest)?
        };
        let mut node = self
            .parent_folder_mut(&old_parent)?
            .remove(&leaf)
            .ok_or_else(|| ShellError::NotFound(from.clone()))?;
        node.set_name(name.clone());
        let replaced = self.parent_folder_mut(&dest)?.insert(node);

        let to = path::join(&dest, &name);
        debug!(from = %from, to = %to, "Moved node");
        Ok(Relocated { from, to, replaced })
    }

    /// Remove a node and its subtree. The root cannot be deleted.
    pub fn delete(&mut self, target: &str) -> Result<Node, ShellError> {
        let normalized = path::normalize(target);
        self.resolve(&normalized)?;
        let Some(parent) = path::parent(&normalized) else {
            return Err(ShellError::RootOperation(normalized));
        };
        let leaf = path::leaf_name(&normalized);
        let removed = self
            .parent_folder_mut(&parent)?
            .remove(&leaf)
            .ok_or_else(|| ShellError::NotFound(normalized.clone()))?;
        debug!(path = %normalized, nodes = removed.subtree_len(), "Deleted node");
        Ok(removed)
    }

    /// Replace a file's content in place.
    pub fn update_file(&mut self, target: &str, content: impl Into<String>) -> Result<(), ShellError> {
        match self.resolve_mut(target)? {
            Node::File(file) => {
                file.content = content.into();
                Ok(())
            }
            Node::Folder(_) => Err(ShellError::FileNotFound(path::normalize(target))),
        }
    }

    /// Pre-order traversal of the whole tree, root first, children in order.
    ///
    /// Iterative so deep trees cannot exhaust the stack.
    pub fn walk(&self) -> Vec<(String, &Node)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.name().to_string(), &self.root)];
        while let Some((current, node)) = stack.pop() {
            if let Node::Folder(folder) = node {
                for child in folder.children.iter().rev() {
                    stack.push((path::join(&current, child.name()), child));
                }
            }
            out.push((current, node));
        }
        out
    }

    /// Paths of every file in traversal order.
    pub fn file_paths(&self) -> Vec<String> {
        self.walk()
            .into_iter()
            .filter(|(_, node)| node.is_file())
            .map(|(p, _)| p)
            .collect()
    }

    pub fn to_stored(&self) -> StoredProject {
        StoredProject {
            name: self.name().to_string(),
            file_system: self.root.clone(),
        }
    }

    /// JSON-compatible representation used for storage.
    pub fn serialize(&self) -> Result<serde_json::Value, StorageError> {
        Ok(serde_json::to_value(self.to_stored())?)
    }

    /// Rebuild a project from [`Project::serialize`] output.
    pub fn deserialize(value: serde_json::Value) -> Result<Self, StorageError> {
        let stored: StoredProject = serde_json::from_value(value)?;
        Self::from_stored(stored)
    }

    pub fn from_stored(stored: StoredProject) -> Result<Self, StorageError> {
        match stored.file_system {
            Node::Folder(mut root) => {
                root.name = stored.name;
                Self::from_root(root).map_err(|e| invalid_stored(e.to_string()))
            }
            Node::File(_) => Err(invalid_stored("project fileSystem must be a folder")),
        }
    }
}

fn invalid_stored(message: impl std::fmt::Display) -> StorageError {
    StorageError::Serialization(<serde_json::Error as serde::de::Error>::custom(message))
}

fn copy_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{} copy.{}", stem, ext),
        _ => format!("{} copy", name),
    }
}

/// Decide the final child name under `folder` according to `collision`.
fn settle_name(
    folder: &FolderNode,
    requested: &str,
    collision: CollisionPolicy,
    parent: &str,
) -> Result<String, ShellError> {
    if !folder.contains(requested) {
        return Ok(requested.to_string());
    }
    match collision {
        CollisionPolicy::Overwrite => Ok(requested.to_string()),
        CollisionPolicy::Reject => Err(ShellError::AlreadyExists(path::join(parent, requested))),
        CollisionPolicy::AutoRename => {
            let (stem, ext) = match requested.rsplit_once('.') {
                Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{}", ext)),
                _ => (requested, String::new()),
            };
            let mut n = 1;
            loop {
                let candidate = format!("{} ({}){}", stem, n, ext);
                if !folder.contains(&candidate) {
                    return Ok(candidate);
                }
                n += 1;
            }
        }
    }
}
