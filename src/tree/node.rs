//! Project tree node types

use serde::{Deserialize, Serialize};

/// File node: text content plus optional remote bookkeeping.
///
/// Binary files never carry raw bytes here; the importer substitutes a
/// placeholder string instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    #[serde(default)]
    pub content: String,
    /// Remote content id, set only for imported files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// Remote size in bytes, set only for imported files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Folder node with insertion-ordered children; names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FolderNode {
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Project tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    File(FileNode),
    Folder(FolderNode),
}

impl Node {
    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Node::File(FileNode {
            name: name.into(),
            content: content.into(),
            sha: None,
            size: None,
        })
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Node::Folder(FolderNode {
            name: name.into(),
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Node::File(f) => &f.name,
            Node::Folder(d) => &d.name,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Node::File(f) => f.name = name,
            Node::Folder(d) => d.name = name,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(f) => Some(f),
            Node::Folder(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut FileNode> {
        match self {
            Node::File(f) => Some(f),
            Node::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            Node::Folder(d) => Some(d),
            Node::File(_) => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut FolderNode> {
        match self {
            Node::Folder(d) => Some(d),
            Node::File(_) => None,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            if let Node::Folder(folder) = node {
                stack.extend(folder.children.iter());
            }
        }
        count
    }
}

impl FolderNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|c| c.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// Insert a child. A child with the same name is replaced in place and
    /// returned; otherwise the node is appended.
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        match self.children.iter().position(|c| c.name() == node.name()) {
            Some(index) => Some(std::mem::replace(&mut self.children[index], node)),
            None => {
                self.children.push(node);
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        let index = self.children.iter().position(|c| c.name() == name)?;
        Some(self.children.remove(index))
    }

    /// Get the named child folder, creating it when absent.
    ///
    /// Returns `None` if a file already occupies the name.
    pub fn folder_entry(&mut self, name: &str) -> Option<&mut FolderNode> {
        if !self.contains(name) {
            self.children.push(Node::folder(name));
        }
        self.child_mut(name).and_then(Node::as_folder_mut)
    }
}
