//! Workbench
//!
//! Composition root for the shell core. Owns the project, the tab manager
//! (and through it the editor adapter), storage, preferences and project
//! and import history. Every tree mutation goes through here so the matching tab
//! bookkeeping runs right after the tree change succeeds, and every
//! successful mutation persists the project.

use crate::config::{ShellConfig, StorageBackend, StorageConfig, TreeConfig};
use crate::editor::{EditorAdapter, EditorEvent};
use crate::error::ShellError;
use crate::preferences::Preferences;
use crate::projects::RecentProjects;
use crate::remote::{
    import_directory, ImportPipeline, ImportReport, ImportStage, ImportedProject,
    RecentRepositories, RecentRepository, RepoRef,
};
use crate::search::{search_project, SearchOptions, SearchResult};
use crate::session::{CloseOutcome, SwitchMode, TabManager, UnsavedDecision};
use crate::store::{keys, MemoryStore, SledStore, Storage};
use crate::tree::{path, Created, Node, Project, ProjectTemplate, Relocated, StoredProject};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Open the storage backend named by the configuration.
pub fn open_storage(config: &StorageConfig) -> Result<Storage, ShellError> {
    match config.backend {
        StorageBackend::Memory => Ok(Storage::new(Arc::new(MemoryStore::new()))),
        StorageBackend::Sled => {
            let path = config.resolve_path()?;
            Ok(Storage::new(Arc::new(SledStore::open(&path)?)))
        }
    }
}

pub struct Workbench {
    project: Option<Project>,
    tabs: TabManager,
    storage: Storage,
    preferences: Preferences,
    recent: RecentRepositories,
    recent_projects: RecentProjects,
    tree: TreeConfig,
    cursor: (usize, usize),
}

impl Workbench {
    /// Wire the collaborators together and push stored preferences to the editor.
    pub fn new(mut editor: Box<dyn EditorAdapter>, storage: Storage, tree: TreeConfig) -> Self {
        let preferences = Preferences::load(&storage);
        editor.apply_options(&preferences.editor_options());
        let recent = RecentRepositories::load(&storage);
        let recent_projects = RecentProjects::load(&storage);
        Self {
            project: None,
            tabs: TabManager::new(editor, storage.clone()),
            storage,
            preferences,
            recent,
            recent_projects,
            tree,
            cursor: (1, 1),
        }
    }

    pub fn from_config(config: &ShellConfig, editor: Box<dyn EditorAdapter>) -> Result<Self, ShellError> {
        let storage = open_storage(&config.storage)?;
        Ok(Self::new(editor, storage, config.tree.clone()))
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn editor(&self) -> &dyn EditorAdapter {
        self.tabs.editor()
    }

    pub fn editor_mut(&mut self) -> &mut dyn EditorAdapter {
        self.tabs.editor_mut()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn recent(&self) -> &RecentRepositories {
        &self.recent
    }

    pub fn recent_projects(&self) -> &RecentProjects {
        &self.recent_projects
    }

    /// Last cursor position reported by the editor (1-based).
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn delete_requires_confirmation(&self) -> bool {
        self.tree.confirm_delete
    }

    pub fn has_project(&self) -> bool {
        self.project.is_some()
    }

    pub fn project(&self) -> Result<&Project, ShellError> {
        self.project.as_ref().ok_or(ShellError::NoProject)
    }

    fn project_mut(&mut self) -> Result<&mut Project, ShellError> {
        self.project.as_mut().ok_or(ShellError::NoProject)
    }

    /// Load the stored project and tab session.
    ///
    /// Returns false when nothing usable is stored.
    pub fn load(&mut self) -> Result<bool, ShellError> {
        let stored = match self.storage.load::<StoredProject>(keys::PROJECT) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Ok(false),
            Err(e) => {
                warn!(error = %e, "Stored project is unreadable; starting empty");
                return Ok(false);
            }
        };
        let project = match Project::from_stored(stored) {
            Ok(project) => project.with_collision_policy(self.tree.collision),
            Err(e) => {
                warn!(error = %e, "Stored project is invalid; starting empty");
                return Ok(false);
            }
        };
        info!(project = %project.name(), "Loaded project");
        self.tabs.restore_from_storage(&project);
        self.project = Some(project);
        Ok(true)
    }

    fn persist_project(&self) -> Result<(), ShellError> {
        let project = self.project()?;
        self.storage.save(keys::PROJECT, &project.to_stored())?;
        Ok(())
    }

    /// Swap in a new project and return the previous one.
    ///
    /// Dirty tabs of the outgoing project are saved and the incoming project
    /// is written to storage before anything changes; if either fails the
    /// current project and its tabs stay in place.
    pub fn replace_project(&mut self, project: Project) -> Result<Option<Project>, ShellError> {
        self.swap_project(project, None)
    }

    pub fn new_project(&mut self, name: &str, template: ProjectTemplate) -> Result<(), ShellError> {
        let project = Project::from_template(name, template)?;
        self.swap_project(project, Some(template))?;
        Ok(())
    }

    fn swap_project(
        &mut self,
        project: Project,
        template: Option<ProjectTemplate>,
    ) -> Result<Option<Project>, ShellError> {
        if let Some(current) = self.project.as_mut() {
            self.tabs.save_all(current)?;
        }
        let project = project.with_collision_policy(self.tree.collision);
        self.storage.save(keys::PROJECT, &project.to_stored())?;

        self.tabs.reset();
        info!(project = %project.name(), files = project.file_paths().len(), "Project replaced");
        self.recent_projects
            .record(project.name(), template, chrono::Utc::now());
        if let Err(e) = self.recent_projects.save(&self.storage) {
            warn!(error = %e, "Failed to persist recent projects");
        }
        Ok(self.project.replace(project))
    }

    pub fn create_file(&mut self, parent: &str, name: &str, content: &str) -> Result<Created, ShellError> {
        let created = self.project_mut()?.create_file(parent, name, content)?;
        if created.replaced.is_some() {
            self.tabs.close_within(&created.path);
        }
        self.persist_project()?;
        Ok(created)
    }

    pub fn create_folder(&mut self, parent: &str, name: &str) -> Result<Created, ShellError> {
        let created = self.project_mut()?.create_folder(parent, name)?;
        if created.replaced.is_some() {
            self.tabs.close_within(&created.path);
        }
        self.persist_project()?;
        Ok(created)
    }

    /// Copy a file beside itself and open the copy.
    ///
    /// The copy takes the file's saved content, not unsaved tab edits.
    pub fn duplicate(&mut self, target: &str) -> Result<Created, ShellError> {
        let created = self.project_mut()?.duplicate(target)?;
        if created.replaced.is_some() {
            self.tabs.close_within(&created.path);
        }
        self.persist_project()?;
        self.open_file(&created.path)?;
        Ok(created)
    }

    pub fn rename(&mut self, target: &str, new_name: &str) -> Result<Relocated, ShellError> {
        let relocated = self.project_mut()?.rename(target, new_name)?;
        self.after_relocation(&relocated)?;
        Ok(relocated)
    }

    pub fn move_node(&mut self, source: &str, dest_folder: &str) -> Result<Relocated, ShellError> {
        let relocated = self.project_mut()?.move_node(source, dest_folder)?;
        self.after_relocation(&relocated)?;
        Ok(relocated)
    }

    fn after_relocation(&mut self, relocated: &Relocated) -> Result<(), ShellError> {
        if relocated.replaced.is_some() {
            self.tabs.close_within(&relocated.to);
        }
        self.tabs.relocate(&relocated.from, &relocated.to);
        self.persist_project()
    }

    /// Delete a node; tabs on it or anything beneath it close unprompted.
    pub fn delete(&mut self, target: &str) -> Result<Node, ShellError> {
        let removed = self.project_mut()?.delete(target)?;
        self.tabs.close_within(&path::normalize(target));
        self.persist_project()?;
        Ok(removed)
    }

    pub fn open_file(&mut self, target: &str) -> Result<(), ShellError> {
        let project = self.project.as_mut().ok_or(ShellError::NoProject)?;
        self.tabs.open(project, target)?;
        Ok(())
    }

    pub fn activate(&mut self, target: &str, mode: SwitchMode) -> Result<(), ShellError> {
        let project = self.project.as_mut().ok_or(ShellError::NoProject)?;
        self.tabs.activate(project, target, mode)
    }

    pub fn close_tab(
        &mut self,
        target: &str,
        decision: Option<UnsavedDecision>,
    ) -> Result<CloseOutcome, ShellError> {
        let project = self.project.as_mut().ok_or(ShellError::NoProject)?;
        self.tabs.close(project, target, decision)
    }

    pub fn save(&mut self, target: &str) -> Result<(), ShellError> {
        let project = self.project.as_mut().ok_or(ShellError::NoProject)?;
        self.tabs.save(project, target)
    }

    /// Save the active tab. Returns its path, or None without an active tab.
    pub fn save_active(&mut self) -> Result<Option<String>, ShellError> {
        let Some(active) = self.tabs.active_path().map(str::to_string) else {
            return Ok(None);
        };
        self.save(&active)?;
        Ok(Some(active))
    }

    pub fn save_all(&mut self) -> Result<usize, ShellError> {
        let project = self.project.as_mut().ok_or(ShellError::NoProject)?;
        self.tabs.save_all(project)
    }

    pub fn mark_modified(&mut self, target: &str, buffer: &str) -> Result<bool, ShellError> {
        self.tabs.mark_modified(target, buffer)
    }

    /// Replace the active buffer as an edit.
    pub fn edit_active(&mut self, text: &str) -> Result<bool, ShellError> {
        let active = self
            .tabs
            .active_path()
            .map(str::to_string)
            .ok_or_else(|| ShellError::NotFound("active tab".to_string()))?;
        self.tabs.mark_modified(&active, text)
    }

    pub fn dirty_paths(&mut self) -> Vec<String> {
        self.tabs.dirty_paths()
    }

    /// Drain editor events into tab state and the cursor position.
    pub fn pump_editor_events(&mut self) -> usize {
        let events = self.tabs.pump_editor_events();
        for event in &events {
            if let EditorEvent::CursorChanged { line, column } = *event {
                self.cursor = (line, column);
            }
        }
        events.len()
    }

    /// One auto-save pass: fold pending editor events, then save the active
    /// tab if it is dirty.
    pub fn auto_save_tick(&mut self) -> Result<Option<String>, ShellError> {
        self.pump_editor_events();
        match self.project.as_mut() {
            Some(project) => self.tabs.auto_save(project),
            None => Ok(None),
        }
    }

    /// Store new preferences and push the editor-facing ones to the widget.
    pub fn apply_preferences(&mut self, preferences: Preferences) -> Result<(), ShellError> {
        preferences.save(&self.storage)?;
        self.tabs.editor_mut().apply_options(&preferences.editor_options());
        self.preferences = preferences;
        Ok(())
    }

    pub fn search(&self, query: &str, options: SearchOptions) -> Result<Vec<SearchResult>, ShellError> {
        search_project(self.project()?, query, options)
    }

    /// Install an assembled import: swap the project, record history, open
    /// the root README if there is one.
    pub fn install_import(&mut self, imported: ImportedProject) -> Result<ImportReport, ShellError> {
        let readme = path::join(imported.project.name(), "README.md");
        self.replace_project(imported.project)?;
        if let Some(repository) = &imported.repository {
            self.recent
                .record(RecentRepository::from_info(repository, chrono::Utc::now()));
            if let Err(e) = self.recent.save(&self.storage) {
                warn!(error = %e, "Failed to persist recent repositories");
            }
        }
        if self.project()?.file(&readme).is_ok() {
            self.open_file(&readme)?;
        }
        Ok(imported.report)
    }

    /// Import a remote repository. On failure the current project is untouched.
    pub async fn import_repository(
        &mut self,
        pipeline: &ImportPipeline,
        repo: &RepoRef,
        progress: Option<&UnboundedSender<ImportStage>>,
    ) -> Result<ImportReport, ShellError> {
        let imported = pipeline.run(repo, progress).await?;
        self.install_import(imported)
    }

    pub fn import_directory(&mut self, dir: &Path, max_file_size: u64) -> Result<ImportReport, ShellError> {
        let imported = import_directory(dir, max_file_size)?;
        self.install_import(imported)
    }
}

impl std::fmt::Debug for Workbench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbench")
            .field("project", &self.project.as_ref().map(Project::name))
            .field("tabs", &self.tabs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::HeadlessEditor;
    use crate::tree::CollisionPolicy;

    fn workbench() -> Workbench {
        let mut wb = Workbench::new(
            Box::new(HeadlessEditor::new()),
            Storage::in_memory(),
            TreeConfig::default(),
        );
        wb.new_project("demo", ProjectTemplate::Web).unwrap();
        wb
    }

    #[test]
    fn operations_need_a_project() {
        let mut wb = Workbench::new(
            Box::new(HeadlessEditor::new()),
            Storage::in_memory(),
            TreeConfig::default(),
        );
        assert!(matches!(wb.create_file("demo", "a", ""), Err(ShellError::NoProject)));
        assert!(matches!(wb.open_file("demo/a"), Err(ShellError::NoProject)));
        assert_eq!(wb.auto_save_tick().unwrap(), None);
    }

    #[test]
    fn rename_retargets_open_tab() {
        let mut wb = workbench();
        wb.open_file("demo/js/main.js").unwrap();
        wb.rename("demo/js", "scripts").unwrap();
        assert_eq!(wb.tabs().active_path(), Some("demo/scripts/main.js"));
        assert!(wb.project().unwrap().exists("demo/scripts/main.js"));
    }

    #[test]
    fn overwrite_closes_stale_tab() {
        let mut wb = workbench();
        wb.open_file("demo/index.html").unwrap();
        let created = wb.create_file("demo", "index.html", "fresh").unwrap();
        assert!(created.replaced.is_some());
        assert!(wb.tabs().is_empty());
    }

    #[test]
    fn delete_closes_descendant_tabs() {
        let mut wb = workbench();
        wb.open_file("demo/index.html").unwrap();
        wb.open_file("demo/css/styles.css").unwrap();
        wb.delete("demo/css").unwrap();
        assert_eq!(wb.tabs().len(), 1);
        assert_eq!(wb.tabs().active_path(), Some("demo/index.html"));
    }

    #[test]
    fn edit_then_auto_save() {
        let mut wb = workbench();
        wb.open_file("demo/js/main.js").unwrap();
        assert!(wb.edit_active("console.log('edited');").unwrap());
        assert_eq!(wb.auto_save_tick().unwrap().as_deref(), Some("demo/js/main.js"));
        assert_eq!(
            wb.project().unwrap().read_file("demo/js/main.js").unwrap(),
            "console.log('edited');"
        );
        // clean tab: nothing to do
        assert_eq!(wb.auto_save_tick().unwrap(), None);
    }

    #[test]
    fn replace_project_flushes_dirty_tabs() {
        let storage = Storage::in_memory();
        let mut wb = Workbench::new(Box::new(HeadlessEditor::new()), storage.clone(), TreeConfig::default());
        wb.new_project("demo", ProjectTemplate::Empty).unwrap();
        wb.open_file("demo/README.md").unwrap();
        wb.edit_active("# changed").unwrap();

        let previous = wb.replace_project(Project::new("next").unwrap()).unwrap().unwrap();
        assert!(wb.tabs().is_empty());
        assert_eq!(previous.read_file("demo/README.md").unwrap(), "# changed");

        let stored: StoredProject = storage.load(keys::PROJECT).unwrap().unwrap();
        assert_eq!(stored.name, "next");
    }

    #[test]
    fn failed_persist_keeps_current_project() {
        let storage = Storage::new(Arc::new(MemoryStore::with_quota(16 * 1024)));
        let mut wb = Workbench::new(Box::new(HeadlessEditor::new()), storage.clone(), TreeConfig::default());
        wb.new_project("demo", ProjectTemplate::Empty).unwrap();
        wb.open_file("demo/README.md").unwrap();

        let mut big = Project::new("big").unwrap();
        big.create_file("big", "blob.txt", "x".repeat(32 * 1024)).unwrap();
        assert!(matches!(
            wb.replace_project(big),
            Err(ShellError::Storage(crate::error::StorageError::QuotaExceeded { .. }))
        ));

        assert_eq!(wb.project().unwrap().name(), "demo");
        assert_eq!(wb.tabs().active_path(), Some("demo/README.md"));
        let stored: StoredProject = storage.load(keys::PROJECT).unwrap().unwrap();
        assert_eq!(stored.name, "demo");
        assert_eq!(wb.recent_projects().entries()[0].name, "demo");
    }

    #[test]
    fn duplicate_opens_the_copy() {
        let mut wb = workbench();
        wb.open_file("demo/index.html").unwrap();
        let created = wb.duplicate("demo/index.html").unwrap();
        assert_eq!(created.path, "demo/index copy.html");
        assert_eq!(wb.tabs().len(), 2);
        assert_eq!(wb.tabs().active_path(), Some("demo/index copy.html"));

        let stored: StoredProject = wb.storage().load(keys::PROJECT).unwrap().unwrap();
        let project = Project::from_stored(stored).unwrap();
        assert_eq!(
            project.read_file("demo/index copy.html").unwrap(),
            project.read_file("demo/index.html").unwrap()
        );
    }

    #[test]
    fn project_switches_are_recorded() {
        let storage = Storage::in_memory();
        let mut wb = Workbench::new(Box::new(HeadlessEditor::new()), storage.clone(), TreeConfig::default());
        wb.new_project("demo", ProjectTemplate::Web).unwrap();
        wb.replace_project(Project::new("next").unwrap()).unwrap();

        let names: Vec<_> = wb.recent_projects().entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["next", "demo"]);
        assert_eq!(wb.recent_projects().entries()[1].template, Some(ProjectTemplate::Web));
        assert_eq!(wb.recent_projects().entries()[0].template, None);

        let reopened = Workbench::new(Box::new(HeadlessEditor::new()), storage, TreeConfig::default());
        assert_eq!(reopened.recent_projects(), wb.recent_projects());
    }

    #[test]
    fn load_restores_project_and_tabs() {
        let storage = Storage::in_memory();
        {
            let mut wb = Workbench::new(Box::new(HeadlessEditor::new()), storage.clone(), TreeConfig::default());
            wb.new_project("demo", ProjectTemplate::Node).unwrap();
            wb.open_file("demo/index.js").unwrap();
        }
        let tree = TreeConfig {
            collision: CollisionPolicy::Reject,
            confirm_delete: true,
        };
        let mut wb = Workbench::new(Box::new(HeadlessEditor::new()), storage, tree);
        assert!(wb.load().unwrap());
        assert_eq!(wb.tabs().active_path(), Some("demo/index.js"));
        assert_eq!(wb.project().unwrap().collision_policy(), CollisionPolicy::Reject);
        assert!(wb.delete_requires_confirmation());
    }

    #[test]
    fn preferences_reach_the_editor() {
        let mut wb = workbench();
        let mut prefs = wb.preferences().clone();
        prefs.font_size = 22;
        wb.apply_preferences(prefs).unwrap();

        let reopened = Workbench::new(
            Box::new(HeadlessEditor::new()),
            wb.storage().clone(),
            TreeConfig::default(),
        );
        assert_eq!(reopened.preferences().font_size, 22);
    }

    #[test]
    fn search_covers_project() {
        let wb = workbench();
        let results = wb.search("demo", SearchOptions::default()).unwrap();
        assert!(results.iter().any(|r| r.path == "demo/index.html"));
    }
}
