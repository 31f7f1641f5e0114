//! Codeshell: core of a client-side code editor shell
//!
//! A virtual project tree held in memory, a tab session bound to an editing
//! widget through a narrow adapter, full-project search, local persistence
//! of project/session/preferences/notes, and import of GitHub repositories
//! or local directories into the tree.

pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod notes;
pub mod preferences;
pub mod projects;
pub mod remote;
pub mod search;
pub mod session;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod workbench;

pub use error::{ImportError, ShellError, StorageError};
pub use tree::{Project, ProjectTemplate};
pub use workbench::Workbench;
