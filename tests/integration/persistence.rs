use super::support::{workbench, SharedEditor};
use codeshell::config::{StorageBackend, StorageConfig};
use codeshell::editor::EditorAdapter;
use codeshell::notes::NoteBook;
use codeshell::store::{keys, SledStore, Storage};
use codeshell::tree::ProjectTemplate;
use codeshell::workbench::open_storage;
use std::sync::Arc;
use tempfile::TempDir;

fn sled_storage(dir: &TempDir) -> Storage {
    Storage::new(Arc::new(SledStore::open(&dir.path().join("store")).unwrap()))
}

#[test]
fn project_and_tabs_survive_restart() {
    let dir = TempDir::new().unwrap();
    {
        let editor = SharedEditor::new();
        let mut wb = workbench(&editor, sled_storage(&dir));
        wb.new_project("site", ProjectTemplate::Web).unwrap();
        wb.open_file("site/index.html").unwrap();
        wb.open_file("site/js/main.js").unwrap();
        editor.type_text("\n// pending");
        wb.pump_editor_events();
    }

    let editor = SharedEditor::new();
    let mut wb = workbench(&editor, sled_storage(&dir));
    assert!(wb.load().unwrap());
    assert_eq!(wb.project().unwrap().name(), "site");
    assert_eq!(wb.tabs().len(), 2);
    assert_eq!(wb.tabs().active_path(), Some("site/js/main.js"));
    assert!(wb.tabs().active_tab().unwrap().is_modified());
    assert!(editor.buffer().ends_with("// pending"));
}

#[test]
fn stale_tabs_are_dropped_on_restore() {
    let dir = TempDir::new().unwrap();
    {
        let editor = SharedEditor::new();
        let mut wb = workbench(&editor, sled_storage(&dir));
        wb.new_project("site", ProjectTemplate::Web).unwrap();
        wb.open_file("site/css/styles.css").unwrap();
        // Remove the file behind the session's back.
        let mut project = wb.project().unwrap().clone();
        project.delete("site/css").unwrap();
        wb.storage().save(keys::PROJECT, &project.to_stored()).unwrap();
    }

    let editor = SharedEditor::new();
    let mut wb = workbench(&editor, sled_storage(&dir));
    assert!(wb.load().unwrap());
    assert!(wb.tabs().is_empty());
    assert!(wb.tabs().active_path().is_none());
}

#[test]
fn empty_store_loads_nothing() {
    let dir = TempDir::new().unwrap();
    let editor = SharedEditor::new();
    let mut wb = workbench(&editor, sled_storage(&dir));
    assert!(!wb.load().unwrap());
    assert!(!wb.has_project());
}

#[test]
fn notes_persist_in_configured_store() {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig {
        backend: StorageBackend::Sled,
        path: Some(dir.path().join("configured")),
    };
    {
        let mut book = NoteBook::load(open_storage(&config).unwrap());
        book.add("todo", "ship it").unwrap();
    }
    let book = NoteBook::load(open_storage(&config).unwrap());
    assert_eq!(book.list().len(), 1);
    assert_eq!(book.list()[0].title, "todo");
}
