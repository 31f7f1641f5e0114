use super::support::{workbench, ScriptedClient, SharedEditor};
use codeshell::config::ImportConfig;
use codeshell::editor::EditorAdapter;
use codeshell::error::{ImportError, ShellError};
use codeshell::remote::{ImportPipeline, ImportStage, RepoRef, TreeEntry};
use codeshell::store::Storage;
use codeshell::tree::Project;
use std::sync::Arc;

fn pipeline(client: ScriptedClient) -> ImportPipeline {
    ImportPipeline::new(Arc::new(client), &ImportConfig::default())
}

#[tokio::test]
async fn import_replaces_project_and_opens_readme() {
    let client = ScriptedClient::new(vec![
        TreeEntry::blob("README.md", 9, "readme"),
        TreeEntry::tree("src"),
        TreeEntry::blob("src/lib.rs", 11, "lib"),
    ])
    .blob("readme", "# widgets")
    .blob("lib", "pub fn x() {}");

    let editor = SharedEditor::new();
    let mut wb = workbench(&editor, Storage::in_memory());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let report = wb
        .import_repository(&pipeline(client), &RepoRef::new("acme", "widgets"), Some(&tx))
        .await
        .unwrap();
    drop(tx);

    assert_eq!(report.files, 2);
    assert!(report.failed.is_empty());
    let project = wb.project().unwrap();
    assert_eq!(project.name(), "widgets");
    assert_eq!(project.read_file("widgets/src/lib.rs").unwrap(), "pub fn x() {}");
    assert_eq!(wb.tabs().active_path(), Some("widgets/README.md"));
    assert_eq!(editor.buffer(), "# widgets");
    assert_eq!(wb.recent().entries()[0].full_name, "acme/widgets");

    let mut stages = Vec::new();
    while let Some(stage) = rx.recv().await {
        stages.push(stage);
    }
    assert_eq!(stages.last(), Some(&ImportStage::Complete));
    let percents: Vec<u8> = stages.iter().map(ImportStage::percent).collect();
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn failed_file_keeps_the_rest_of_the_import() {
    let client = ScriptedClient::new(vec![
        TreeEntry::blob("a.txt", 1, "a"),
        TreeEntry::blob("b.txt", 1, "b"),
    ])
    .blob("a", "A")
    .failing_blob("b", "connection reset");

    let editor = SharedEditor::new();
    let mut wb = workbench(&editor, Storage::in_memory());
    let report = wb
        .import_repository(&pipeline(client), &RepoRef::new("acme", "partial"), None)
        .await
        .unwrap();

    assert_eq!(report.failed, vec!["partial/b.txt".to_string()]);
    let project = wb.project().unwrap();
    assert!(project.exists(&report.failed[0]));
    assert_eq!(project.read_file("partial/a.txt").unwrap(), "A");
    assert!(project
        .read_file("partial/b.txt")
        .unwrap()
        .starts_with("// Error loading file content: "));
}

#[tokio::test]
async fn missing_repository_leaves_current_project() {
    let mut client = ScriptedClient::new(Vec::new());
    client.missing = true;

    let editor = SharedEditor::new();
    let mut wb = workbench(&editor, Storage::in_memory());
    wb.replace_project(Project::new("keep").unwrap()).unwrap();

    let err = wb
        .import_repository(&pipeline(client), &RepoRef::new("acme", "ghost"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ShellError::Import(ImportError::RepositoryNotFound(_))));
    assert_eq!(wb.project().unwrap().name(), "keep");
    assert!(wb.recent().is_empty());
}

#[tokio::test]
async fn reimport_moves_history_entry_to_front() {
    let editor = SharedEditor::new();
    let mut wb = workbench(&editor, Storage::in_memory());
    for name in ["one", "two", "one"] {
        let client = ScriptedClient::new(vec![TreeEntry::blob("x.txt", 1, "x")]).blob("x", "x");
        wb.import_repository(&pipeline(client), &RepoRef::new("acme", name), None)
            .await
            .unwrap();
    }
    let names: Vec<&str> = wb.recent().entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["one", "two"]);
}

#[test]
fn local_directory_import_skips_build_output() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().join("local");
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::create_dir_all(root.join("target/debug")).unwrap();
    std::fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
    std::fs::write(root.join("target/debug/out"), "junk").unwrap();

    let editor = SharedEditor::new();
    let mut wb = workbench(&editor, Storage::in_memory());
    let report = wb.import_directory(&root, 100_000).unwrap();
    assert_eq!(report.files, 1);
    assert_eq!(wb.project().unwrap().file_paths(), vec!["local/src/main.rs"]);
    assert!(wb.recent().is_empty());
}
