use async_trait::async_trait;
use codeshell::config::TreeConfig;
use codeshell::editor::{EditorAdapter, EditorEvent, HeadlessEditor};
use codeshell::error::ImportError;
use codeshell::remote::{RepoRef, RepositoryClient, RepositoryInfo, RepositoryTree, TreeEntry};
use codeshell::store::Storage;
use codeshell::workbench::Workbench;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Headless editor the test keeps a handle to while the workbench owns a clone.
#[derive(Clone)]
pub struct SharedEditor(Arc<Mutex<HeadlessEditor>>);

impl SharedEditor {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(HeadlessEditor::new())))
    }

    pub fn type_text(&self, text: &str) {
        self.0.lock().type_text(text);
    }

    pub fn move_cursor(&self, line: usize, column: usize) {
        self.0.lock().move_cursor(line, column);
    }

    pub fn font_size(&self) -> u16 {
        self.0.lock().options().font_size
    }

    pub fn is_visible(&self) -> bool {
        self.0.lock().is_visible()
    }
}

impl EditorAdapter for SharedEditor {
    fn set_buffer(&mut self, text: &str, language: &str) {
        self.0.lock().set_buffer(text, language);
    }

    fn buffer(&self) -> String {
        self.0.lock().buffer()
    }

    fn language(&self) -> String {
        self.0.lock().language()
    }

    fn clear(&mut self) {
        self.0.lock().clear();
    }

    fn set_theme(&mut self, theme: &str) {
        self.0.lock().set_theme(theme);
    }

    fn set_font_size(&mut self, size: u16) {
        self.0.lock().set_font_size(size);
    }

    fn set_word_wrap(&mut self, wrap: bool) {
        self.0.lock().set_word_wrap(wrap);
    }

    fn set_tab_size(&mut self, size: u8) {
        self.0.lock().set_tab_size(size);
    }

    fn take_events(&mut self) -> Vec<EditorEvent> {
        self.0.lock().take_events()
    }
}

pub fn workbench(editor: &SharedEditor, storage: Storage) -> Workbench {
    Workbench::new(Box::new(editor.clone()), storage, TreeConfig::default())
}

/// Repository client answering from a fixed listing.
pub struct ScriptedClient {
    pub tree: Vec<TreeEntry>,
    pub blobs: HashMap<String, Result<String, String>>,
    pub missing: bool,
}

impl ScriptedClient {
    pub fn new(tree: Vec<TreeEntry>) -> Self {
        Self {
            tree,
            blobs: HashMap::new(),
            missing: false,
        }
    }

    pub fn blob(mut self, sha: &str, text: &str) -> Self {
        self.blobs.insert(sha.to_string(), Ok(text.to_string()));
        self
    }

    pub fn failing_blob(mut self, sha: &str, message: &str) -> Self {
        self.blobs.insert(sha.to_string(), Err(message.to_string()));
        self
    }
}

#[async_trait]
impl RepositoryClient for ScriptedClient {
    async fn fetch_repository(&self, repo: &RepoRef) -> Result<RepositoryInfo, ImportError> {
        if self.missing {
            return Err(ImportError::RepositoryNotFound(repo.full_name()));
        }
        Ok(RepositoryInfo {
            name: repo.name.clone(),
            full_name: repo.full_name(),
            owner: repo.owner.clone(),
            description: Some("scripted".to_string()),
            html_url: format!("https://github.com/{}", repo.full_name()),
            clone_url: format!("https://github.com/{}.git", repo.full_name()),
            default_branch: "main".to_string(),
            stars: 42,
            forks: 3,
            language: Some("Rust".to_string()),
        })
    }

    async fn fetch_tree(&self, _repo: &RepoRef, _branch: &str) -> Result<RepositoryTree, ImportError> {
        Ok(RepositoryTree {
            entries: self.tree.clone(),
            truncated: false,
        })
    }

    async fn fetch_blob(&self, _repo: &RepoRef, sha: &str) -> Result<String, ImportError> {
        match self.blobs.get(sha) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(ImportError::fetch_failed("file content", message)),
            None => Err(ImportError::fetch_failed("file content", "no such blob")),
        }
    }
}
