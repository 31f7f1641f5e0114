//! Virtual project tree: nodes, paths, CRUD and templates.

pub mod node;
pub mod path;
pub mod project;
pub mod templates;

pub use node::{FileNode, FolderNode, Node};
pub use project::{CollisionPolicy, Created, Project, Relocated, StoredProject};
pub use templates::ProjectTemplate;
