use super::support::{workbench, SharedEditor};
use codeshell::editor::EditorAdapter;
use codeshell::error::ShellError;
use codeshell::preferences::Preferences;
use codeshell::search::SearchOptions;
use codeshell::session::{CloseOutcome, SwitchMode, TabState, UnsavedDecision};
use codeshell::store::Storage;
use codeshell::tree::{Project, ProjectTemplate};

fn demo() -> (SharedEditor, codeshell::Workbench) {
    let editor = SharedEditor::new();
    let mut wb = workbench(&editor, Storage::in_memory());
    let mut project = Project::new("demo").unwrap();
    project.create_file("demo", "index.html", "<h1>demo</h1>").unwrap();
    wb.replace_project(project).unwrap();
    (editor, wb)
}

#[test]
fn edit_save_and_round_trip() {
    let (editor, mut wb) = demo();
    wb.open_file("demo/index.html").unwrap();
    assert_eq!(wb.tabs().active_tab().unwrap().state(), TabState::Clean);

    editor.type_text("<!-- x -->");
    wb.pump_editor_events();
    assert_eq!(wb.tabs().active_tab().unwrap().state(), TabState::Dirty);
    assert_eq!(wb.dirty_paths(), vec!["demo/index.html"]);

    wb.save("demo/index.html").unwrap();
    assert_eq!(wb.tabs().active_tab().unwrap().state(), TabState::Clean);

    let project = wb.project().unwrap();
    let restored = Project::deserialize(project.serialize().unwrap()).unwrap();
    assert_eq!(
        restored.read_file("demo/index.html").unwrap(),
        "<h1>demo</h1><!-- x -->"
    );
}

#[test]
fn marked_edit_is_what_gets_saved() {
    let (editor, mut wb) = demo();
    wb.open_file("demo/index.html").unwrap();
    assert!(wb.mark_modified("demo/index.html", "<h1>marked</h1>").unwrap());
    assert_eq!(editor.buffer(), "<h1>marked</h1>");

    wb.save("demo/index.html").unwrap();
    assert_eq!(wb.project().unwrap().read_file("demo/index.html").unwrap(), "<h1>marked</h1>");
    assert!(wb.dirty_paths().is_empty());
}

#[test]
fn duplicate_then_history_after_switch() {
    let (_editor, mut wb) = demo();
    let created = wb.duplicate("demo/index.html").unwrap();
    assert_eq!(created.path, "demo/index copy.html");
    assert_eq!(wb.tabs().active_path(), Some("demo/index copy.html"));
    assert_eq!(wb.project().unwrap().read_file(&created.path).unwrap(), "<h1>demo</h1>");

    wb.new_project("site", ProjectTemplate::Web).unwrap();
    let names: Vec<_> = wb.recent_projects().entries().iter().map(|e| e.name.clone()).collect();
    assert_eq!(names, vec!["site", "demo"]);
}

#[test]
fn deleting_a_folder_closes_tabs_beneath_it() {
    let editor = SharedEditor::new();
    let mut wb = workbench(&editor, Storage::in_memory());
    wb.new_project("site", ProjectTemplate::Web).unwrap();
    wb.open_file("site/index.html").unwrap();
    wb.open_file("site/css/styles.css").unwrap();
    wb.open_file("site/js/main.js").unwrap();

    wb.delete("site/css").unwrap();
    assert!(!wb.tabs().is_open("site/css/styles.css"));
    assert_eq!(wb.tabs().len(), 2);
    assert_eq!(wb.tabs().active_path(), Some("site/js/main.js"));

    wb.delete("site/js").unwrap();
    assert_eq!(wb.tabs().active_path(), Some("site/index.html"));
    assert_eq!(editor.buffer(), wb.project().unwrap().read_file("site/index.html").unwrap());
}

#[test]
fn closing_last_tab_empties_editor() {
    let (editor, mut wb) = demo();
    wb.open_file("demo/index.html").unwrap();
    assert!(editor.is_visible());
    assert_eq!(wb.close_tab("demo/index.html", None).unwrap(), CloseOutcome::Closed);
    assert!(!editor.is_visible());
    assert!(wb.tabs().active_path().is_none());
}

#[test]
fn dirty_close_needs_a_decision() {
    let (editor, mut wb) = demo();
    wb.open_file("demo/index.html").unwrap();
    editor.type_text("!");
    wb.pump_editor_events();

    assert!(matches!(
        wb.close_tab("demo/index.html", None),
        Err(ShellError::UnsavedChanges(_))
    ));
    assert_eq!(
        wb.close_tab("demo/index.html", Some(UnsavedDecision::Cancel)).unwrap(),
        CloseOutcome::Cancelled
    );
    wb.close_tab("demo/index.html", Some(UnsavedDecision::Discard)).unwrap();
    assert_eq!(wb.project().unwrap().read_file("demo/index.html").unwrap(), "<h1>demo</h1>");
}

#[test]
fn rename_carries_open_tab() {
    let (_editor, mut wb) = demo();
    wb.create_folder("demo", "pages").unwrap();
    wb.move_node("demo/index.html", "demo/pages").unwrap();
    wb.open_file("demo/pages/index.html").unwrap();
    wb.rename("demo/pages", "views").unwrap();
    assert_eq!(wb.tabs().active_path(), Some("demo/views/index.html"));
    assert_eq!(wb.tabs().active_tab().unwrap().title(), "index.html");
}

#[test]
fn switching_tabs_flushes_or_discards() {
    let (editor, mut wb) = demo();
    wb.create_file("demo", "app.js", "let a;").unwrap();
    wb.open_file("demo/index.html").unwrap();
    editor.type_text("<p>");
    wb.open_file("demo/app.js").unwrap();
    assert_eq!(
        wb.tabs().get("demo/index.html").unwrap().buffer(),
        "<h1>demo</h1><p>"
    );

    editor.type_text(" let b;");
    wb.activate("demo/index.html", SwitchMode::Discard).unwrap();
    assert_eq!(wb.tabs().get("demo/app.js").unwrap().buffer(), "let a;");
    assert_eq!(editor.buffer(), "<h1>demo</h1><p>");
}

#[test]
fn cursor_events_update_position() {
    let (editor, mut wb) = demo();
    wb.open_file("demo/index.html").unwrap();
    editor.move_cursor(3, 7);
    wb.pump_editor_events();
    assert_eq!(wb.cursor(), (3, 7));
}

#[test]
fn preferences_reach_the_editor_and_survive_restart() {
    let editor = SharedEditor::new();
    let storage = Storage::in_memory();
    let mut wb = workbench(&editor, storage.clone());
    let mut prefs = wb.preferences().clone();
    prefs.set("fontSize", "18").unwrap();
    wb.apply_preferences(prefs).unwrap();
    assert_eq!(editor.font_size(), 18);

    let fresh = SharedEditor::new();
    let restarted = workbench(&fresh, storage);
    assert_eq!(restarted.preferences().font_size, 18);
    assert_eq!(fresh.font_size(), 18);
    assert_eq!(Preferences::default().font_size, 14);
}

#[test]
fn search_spans_the_project() {
    let editor = SharedEditor::new();
    let mut wb = workbench(&editor, Storage::in_memory());
    wb.new_project("app", ProjectTemplate::Node).unwrap();
    let results = wb.search("server", SearchOptions::default()).unwrap();
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r.path == "app/index.js"));

    let exact = wb
        .search(
            "Server",
            SearchOptions {
                match_case: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(exact.len(), 2);
    assert!(exact.iter().all(|r| r.match_text == "Server"));
}
