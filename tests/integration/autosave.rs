use super::support::{workbench, SharedEditor};
use codeshell::config::AutosaveConfig;
use codeshell::session::{spawn_auto_save, spawn_configured};
use codeshell::store::Storage;
use codeshell::tree::Project;
use codeshell::Workbench;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

fn shared_demo(editor: &SharedEditor) -> Arc<Mutex<Workbench>> {
    let mut wb = workbench(editor, Storage::in_memory());
    let mut project = Project::new("demo").unwrap();
    project.create_file("demo", "notes.md", "draft").unwrap();
    wb.replace_project(project).unwrap();
    wb.open_file("demo/notes.md").unwrap();
    Arc::new(Mutex::new(wb))
}

#[tokio::test(start_paused = true)]
async fn saves_dirty_active_tab_each_period() {
    let editor = SharedEditor::new();
    let wb = shared_demo(&editor);
    let config = AutosaveConfig::default();
    let period = config.interval();
    let handle = spawn_configured(wb.clone(), &config).unwrap();

    editor.type_text(" one");
    tokio::time::sleep(period / 2).await;
    assert_eq!(wb.lock().project().unwrap().read_file("demo/notes.md").unwrap(), "draft");

    tokio::time::sleep(period).await;
    {
        let wb = wb.lock();
        assert_eq!(wb.project().unwrap().read_file("demo/notes.md").unwrap(), "draft one");
        assert!(!wb.tabs().active_tab().unwrap().is_modified());
    }

    editor.type_text(" two");
    tokio::time::sleep(period).await;
    assert_eq!(
        wb.lock().project().unwrap().read_file("demo/notes.md").unwrap(),
        "draft one two"
    );
    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn clean_tabs_are_left_alone() {
    let editor = SharedEditor::new();
    let wb = shared_demo(&editor);
    let handle = spawn_auto_save(wb.clone(), Duration::from_millis(100));
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(wb.lock().auto_save_tick().unwrap(), None);
    handle.abort();
}

#[tokio::test]
async fn disabled_config_spawns_nothing() {
    let editor = SharedEditor::new();
    let wb = shared_demo(&editor);
    let config = AutosaveConfig {
        enabled: false,
        ..Default::default()
    };
    assert!(spawn_configured(wb, &config).is_none());
}
