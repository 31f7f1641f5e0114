//! CLI Tooling
//!
//! Drives a [`Workbench`] with a headless editor. Each invocation loads the
//! stored project and tab session, runs one command, and leaves everything
//! persisted for the next run.

use crate::config::{ConfigLoader, ShellConfig, StorageBackend};
use crate::editor::HeadlessEditor;
use crate::error::ShellError;
use crate::logging::{LogFormat, LogOutput, LoggingConfig};
use crate::notes::NoteBook;
use crate::remote::{GitHubClient, ImportPipeline, ImportReport, ImportStage, RepoRef};
use crate::search::SearchOptions;
use crate::session::{SwitchMode, TabState, UnsavedDecision};
use crate::tree::{path, ProjectTemplate};
use crate::workbench::Workbench;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Codeshell CLI - virtual project tree, tabs and repository import
#[derive(Parser)]
#[command(name = "codeshell")]
#[command(about = "Headless driver for the codeshell editor core")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Storage directory (overrides storage.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold logging flags over the configured logging section.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.format = format;
        }
        if let Some(output) = self.log_output {
            config.output = output;
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

/// Answer for closing a tab with unsaved edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

impl From<UnsavedChoice> for UnsavedDecision {
    fn from(choice: UnsavedChoice) -> Self {
        match choice {
            UnsavedChoice::Save => UnsavedDecision::Save,
            UnsavedChoice::Discard => UnsavedDecision::Discard,
            UnsavedChoice::Cancel => UnsavedDecision::Cancel,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project from a template, replacing the current one
    New {
        name: String,
        #[arg(long, value_enum, default_value_t = ProjectTemplate::Empty)]
        template: ProjectTemplate,
    },
    /// Show the project tree
    Tree,
    /// Print a file's stored content
    Cat { path: String },
    /// Create a file (or a folder with --folder) under PARENT
    Create {
        parent: String,
        name: String,
        #[arg(long)]
        folder: bool,
        /// Initial file content
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Copy a file beside itself as "<stem> copy.<ext>" and open the copy
    Duplicate { path: String },
    /// Rename a file or folder
    Rename { path: String, new_name: String },
    /// Move a file or folder into another folder
    Move { source: String, dest: String },
    /// Delete a file or folder and everything beneath it
    Delete {
        path: String,
        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },
    /// Open a file in a tab
    Open { path: String },
    /// Switch the active tab
    Activate {
        path: String,
        /// Drop the outgoing tab's unsaved edits instead of saving them
        #[arg(long)]
        discard: bool,
    },
    /// Replace a file's buffer in its tab (opening it if needed)
    Edit {
        path: String,
        content: String,
        /// Save immediately
        #[arg(long)]
        save: bool,
    },
    /// Save a tab (default: the active one)
    Save { path: Option<String> },
    /// Close a tab
    Close {
        path: String,
        #[arg(long, value_enum)]
        unsaved: Option<UnsavedChoice>,
    },
    /// List open tabs
    Tabs,
    /// Search file contents
    Search {
        query: String,
        #[arg(long)]
        match_case: bool,
        #[arg(long)]
        whole_word: bool,
        #[arg(long)]
        regex: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Import a GitHub repository (owner/repo or URL)
    Import {
        repository: String,
        /// Bearer token (overrides import.token and GITHUB_TOKEN)
        #[arg(long)]
        token: Option<String>,
    },
    /// Import a local directory as the project
    OpenFolder { dir: PathBuf },
    /// Recently imported repositories
    Recent,
    /// Recently opened projects
    Projects,
    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
    /// Manage notes
    Notes {
        #[command(subcommand)]
        command: NotesCommands,
    },
    /// Summary of the current project and tabs
    Status,
}

#[derive(Subcommand)]
pub enum PrefsCommands {
    Show,
    /// Set one preference by key (fontSize, theme, wordWrap, ...)
    Set { key: String, value: String },
}

#[derive(Subcommand)]
pub enum NotesCommands {
    List,
    Add { title: String, content: String },
    Edit { id: u64, title: String, content: String },
    Delete { id: u64 },
}

/// CLI context holding the loaded workbench
pub struct CliContext {
    workbench: Workbench,
    config: ShellConfig,
}

impl CliContext {
    /// Load configuration, honouring an explicit `--config` file.
    pub fn load_config(config_path: Option<&Path>) -> Result<ShellConfig, ShellError> {
        ConfigLoader::load(config_path).map_err(|e| ShellError::ConfigError(e.to_string()))
    }

    /// Build the workbench and load any stored project.
    pub fn new(mut config: ShellConfig, store: Option<PathBuf>) -> Result<Self, ShellError> {
        if let Some(store) = store {
            config.storage.backend = StorageBackend::Sled;
            config.storage.path = Some(store);
        }
        let mut workbench = Workbench::from_config(&config, Box::new(HeadlessEditor::new()))?;
        workbench.load()?;
        Ok(Self { workbench, config })
    }

    /// Wrap an existing workbench (tests and embedding).
    pub fn with_workbench(workbench: Workbench, config: ShellConfig) -> Self {
        Self { workbench, config }
    }

    pub fn workbench(&self) -> &Workbench {
        &self.workbench
    }

    /// Execute a CLI command
    pub fn execute(&mut self, command: &Commands) -> Result<String, ShellError> {
        match command {
            Commands::New { name, template } => {
                self.workbench.new_project(name, *template)?;
                Ok(format!("Created project {} ({:?} template)", name, template))
            }
            Commands::Tree => self.render_tree(),
            Commands::Cat { path } => Ok(self.workbench.project()?.read_file(path)?.to_string()),
            Commands::Create {
                parent,
                name,
                folder,
                content,
            } => {
                let created = if *folder {
                    self.workbench.create_folder(parent, name)?
                } else {
                    self.workbench.create_file(parent, name, content)?
                };
                let verb = if created.replaced.is_some() { "Replaced" } else { "Created" };
                Ok(format!("{} {}", verb, created.path))
            }
            Commands::Duplicate { path } => {
                let created = self.workbench.duplicate(path)?;
                Ok(format!("Duplicated {} -> {}", path::normalize(path), created.path))
            }
            Commands::Rename { path, new_name } => {
                let renamed = self.workbench.rename(path, new_name)?;
                Ok(format!("Renamed {} -> {}", renamed.from, renamed.to))
            }
            Commands::Move { source, dest } => {
                let moved = self.workbench.move_node(source, dest)?;
                Ok(format!("Moved {} -> {}", moved.from, moved.to))
            }
            Commands::Delete { path, yes } => {
                if self.workbench.delete_requires_confirmation() && !yes {
                    return Ok(format!(
                        "Not deleted: confirm deletion of {} with --yes",
                        path::normalize(path)
                    ));
                }
                let removed = self.workbench.delete(path)?;
                Ok(format!(
                    "Deleted {} ({} nodes)",
                    path::normalize(path),
                    removed.subtree_len()
                ))
            }
            Commands::Open { path } => {
                self.workbench.open_file(path)?;
                Ok(format!("Opened {}", path::normalize(path)))
            }
            Commands::Activate { path, discard } => {
                let mode = if *discard { SwitchMode::Discard } else { SwitchMode::Flush };
                self.workbench.activate(path, mode)?;
                Ok(format!("Active tab: {}", path::normalize(path)))
            }
            Commands::Edit { path, content, save } => {
                self.workbench.open_file(path)?;
                let modified = self.workbench.edit_active(content)?;
                if *save {
                    self.workbench.save(path)?;
                    return Ok(format!("Saved {}", path::normalize(path)));
                }
                Ok(if modified {
                    format!("Edited {} (unsaved)", path::normalize(path))
                } else {
                    format!("No changes to {}", path::normalize(path))
                })
            }
            Commands::Save { path } => {
                let saved = match path {
                    Some(p) => {
                        self.workbench.save(p)?;
                        Some(path::normalize(p))
                    }
                    None => self.workbench.save_active()?,
                };
                Ok(match saved {
                    Some(p) => format!("Saved {}", p),
                    None => "No open tab to save".to_string(),
                })
            }
            Commands::Close { path, unsaved } => {
                let outcome = self.workbench.close_tab(path, unsaved.map(Into::into))?;
                Ok(format!("{:?} {}", outcome, path::normalize(path)))
            }
            Commands::Tabs => Ok(self.render_tabs()),
            Commands::Search {
                query,
                match_case,
                whole_word,
                regex,
                format,
            } => {
                let options = SearchOptions {
                    match_case: *match_case,
                    whole_word: *whole_word,
                    regex: *regex,
                };
                let results = self.workbench.search(query, options)?;
                if format == "json" {
                    return serde_json::to_string_pretty(&results)
                        .map_err(|e| ShellError::Storage(e.into()));
                }
                if results.is_empty() {
                    return Ok("No results".to_string());
                }
                let lines: Vec<String> = results
                    .iter()
                    .map(|r| format!("{}:{}:{}: {}", r.path, r.line, r.column, r.line_content.trim()))
                    .collect();
                Ok(lines.join("\n"))
            }
            Commands::Import { repository, token } => self.handle_import(repository, token.clone()),
            Commands::OpenFolder { dir } => {
                let report = self
                    .workbench
                    .import_directory(dir, self.config.import.max_file_size)?;
                Ok(format_report(&report))
            }
            Commands::Recent => Ok(self.render_recent()),
            Commands::Projects => Ok(self.render_projects()),
            Commands::Prefs { command } => self.handle_prefs(command),
            Commands::Notes { command } => self.handle_notes(command),
            Commands::Status => self.render_status(),
        }
    }

    fn handle_import(&mut self, repository: &str, token: Option<String>) -> Result<String, ShellError> {
        let repo = RepoRef::parse(repository)?;
        let mut import_config = self.config.import.clone();
        if token.is_some() {
            import_config.token = token;
        }
        let client = GitHubClient::new(&import_config)?;
        let pipeline = ImportPipeline::new(Arc::new(client), &import_config);

        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| ShellError::Import(crate::error::ImportError::Io(e)))?;
        let workbench = &mut self.workbench;
        let report = rt.block_on(async {
            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ImportStage>();
            let watcher = tokio::spawn(async move {
                while let Some(stage) = rx.recv().await {
                    info!(stage = stage.label(), percent = stage.percent(), "Import progress");
                }
            });
            let result = workbench.import_repository(&pipeline, &repo, Some(&tx)).await;
            drop(tx);
            let _ = watcher.await;
            result
        })?;
        Ok(format_report(&report))
    }

    fn handle_prefs(&mut self, command: &PrefsCommands) -> Result<String, ShellError> {
        match command {
            PrefsCommands::Show => serde_json::to_string_pretty(self.workbench.preferences())
                .map_err(|e| ShellError::Storage(e.into())),
            PrefsCommands::Set { key, value } => {
                let mut prefs = self.workbench.preferences().clone();
                prefs.set(key, value)?;
                self.workbench.apply_preferences(prefs)?;
                Ok(format!("Set {} = {}", key, value))
            }
        }
    }

    fn handle_notes(&mut self, command: &NotesCommands) -> Result<String, ShellError> {
        let mut book = NoteBook::load(self.workbench.storage().clone());
        match command {
            NotesCommands::List => {
                if book.list().is_empty() {
                    return Ok("No notes".to_string());
                }
                let mut table = Table::new();
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.set_header(vec!["ID", "Title", "Date", "Content"]);
                for note in book.list() {
                    table.add_row(vec![
                        note.id.to_string(),
                        note.title.clone(),
                        note.date.format("%Y-%m-%d %H:%M").to_string(),
                        note.content.clone(),
                    ]);
                }
                Ok(table.to_string())
            }
            NotesCommands::Add { title, content } => {
                let id = book.add(title, content)?.id;
                Ok(format!("Added note {}", id))
            }
            NotesCommands::Edit { id, title, content } => {
                book.edit(*id, title, content)?;
                Ok(format!("Updated note {}", id))
            }
            NotesCommands::Delete { id } => {
                let removed = book.delete(*id)?;
                Ok(format!("Deleted note {} ({})", id, removed.title))
            }
        }
    }

    fn render_tree(&self) -> Result<String, ShellError> {
        let project = self.workbench.project()?;
        let mut out = String::new();
        for (node_path, node) in project.walk() {
            let depth = path::segments(&node_path).count().saturating_sub(1);
            let marker = if node.is_folder() { "/" } else { "" };
            out.push_str(&format!("{}{}{}\n", "  ".repeat(depth), node.name(), marker));
        }
        Ok(out.trim_end().to_string())
    }

    fn render_tabs(&self) -> String {
        let tabs = self.workbench.tabs();
        if tabs.is_empty() {
            return "No open tabs".to_string();
        }
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["", "Title", "Path", "Language", "State"]);
        for tab in tabs.tabs() {
            let active = if tabs.active_path() == Some(tab.path()) { "*" } else { "" };
            let state = match tab.state() {
                TabState::Clean => "saved",
                TabState::Dirty => "modified",
            };
            table.add_row(vec![
                active.to_string(),
                tab.title(),
                tab.path().to_string(),
                crate::editor::language_label(tab.language()).to_string(),
                state.to_string(),
            ]);
        }
        table.to_string()
    }

    fn render_recent(&self) -> String {
        let recent = self.workbench.recent();
        if recent.is_empty() {
            return "No recent repositories".to_string();
        }
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["Repository", "Language", "Stars", "Imported"]);
        for entry in recent.entries() {
            table.add_row(vec![
                entry.full_name.clone(),
                entry.language.clone().unwrap_or_else(|| "-".to_string()),
                entry.stars.to_string(),
                entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            ]);
        }
        table.to_string()
    }

    fn render_projects(&self) -> String {
        let recent = self.workbench.recent_projects();
        if recent.is_empty() {
            return "No recent projects".to_string();
        }
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["Project", "Type", "Created", "Last opened"]);
        for entry in recent.entries() {
            let kind = match entry.template {
                Some(template) => format!("{:?}", template).to_lowercase(),
                None => "imported".to_string(),
            };
            table.add_row(vec![
                entry.name.clone(),
                kind,
                entry.created.format("%Y-%m-%d %H:%M").to_string(),
                entry.last_opened.format("%Y-%m-%d %H:%M").to_string(),
            ]);
        }
        table.to_string()
    }

    fn render_status(&mut self) -> Result<String, ShellError> {
        let dirty = self.workbench.dirty_paths();
        let project = self.workbench.project()?;
        let files = project
            .walk()
            .into_iter()
            .filter(|(_, node)| node.is_file())
            .count();
        let tabs = self.workbench.tabs();
        let (line, column) = self.workbench.cursor();
        Ok(format!(
            "Project: {}\nFiles: {}\nOpen tabs: {}\nActive: {}\nUnsaved: {}\nCursor: Ln {}, Col {}",
            project.name(),
            files,
            tabs.len(),
            tabs.active_path().unwrap_or("-"),
            if dirty.is_empty() { "-".to_string() } else { dirty.join(", ") },
            line,
            column
        ))
    }
}

fn format_report(report: &ImportReport) -> String {
    let mut out = format!(
        "Imported {}: {} files in {} folders ({} loaded, {} too large, {} binary)",
        report.source, report.files, report.folders, report.fetched, report.oversized, report.binary
    );
    if !report.failed.is_empty() {
        out.push_str(&format!("\nFailed to load {} files:", report.failed.len()));
        for failed in &report.failed {
            out.push_str(&format!("\n  - {}", failed));
        }
    }
    out
}
