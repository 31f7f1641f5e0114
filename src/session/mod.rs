//! Tab sessions: open tabs, the active tab, dirty tracking and auto-save.

pub mod autosave;
pub mod manager;
pub mod tab;

pub use autosave::{spawn_auto_save, spawn_configured};
pub use manager::{CloseOutcome, SwitchMode, TabManager, UnsavedDecision};
pub use tab::{SessionSnapshot, Tab, TabRecord, TabState};
