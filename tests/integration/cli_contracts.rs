use codeshell::config::{ShellConfig, StorageBackend};
use codeshell::tooling::cli::{CliContext, Commands, NotesCommands, PrefsCommands};
use tempfile::TempDir;

fn context(dir: &TempDir) -> CliContext {
    let mut config = ShellConfig::default();
    config.storage.backend = StorageBackend::Sled;
    CliContext::new(config, Some(dir.path().join("store"))).unwrap()
}

#[test]
fn state_carries_across_invocations() {
    let dir = TempDir::new().unwrap();
    {
        let mut cli = context(&dir);
        cli.execute(&Commands::New {
            name: "demo".to_string(),
            template: codeshell::ProjectTemplate::Empty,
        })
        .unwrap();
        cli.execute(&Commands::Create {
            parent: "demo".to_string(),
            name: "main.js".to_string(),
            folder: false,
            content: "console.log(1);".to_string(),
        })
        .unwrap();
        cli.execute(&Commands::Open {
            path: "demo/main.js".to_string(),
        })
        .unwrap();
    }

    let mut cli = context(&dir);
    let tabs = cli.execute(&Commands::Tabs).unwrap();
    assert!(tabs.contains("demo/main.js"));
    let cat = cli
        .execute(&Commands::Cat {
            path: "demo/main.js".to_string(),
        })
        .unwrap();
    assert_eq!(cat, "console.log(1);");
}

#[test]
fn search_json_contract_has_required_fields() {
    let dir = TempDir::new().unwrap();
    let mut cli = context(&dir);
    cli.execute(&Commands::New {
        name: "demo".to_string(),
        template: codeshell::ProjectTemplate::Web,
    })
    .unwrap();
    let output = cli
        .execute(&Commands::Search {
            query: "demo".to_string(),
            match_case: false,
            whole_word: true,
            regex: false,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let first = &parsed.as_array().unwrap()[0];
    for field in ["path", "line", "column", "lineContent", "matchText", "matchStart", "matchEnd"] {
        assert!(first.get(field).is_some(), "missing {}", field);
    }
}

#[test]
fn prefs_and_notes_commands() {
    let dir = TempDir::new().unwrap();
    let mut cli = context(&dir);
    cli.execute(&Commands::Prefs {
        command: PrefsCommands::Set {
            key: "theme".to_string(),
            value: "vs-light".to_string(),
        },
    })
    .unwrap();
    let shown = cli
        .execute(&Commands::Prefs {
            command: PrefsCommands::Show,
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(parsed["theme"], "vs-light");

    cli.execute(&Commands::Notes {
        command: NotesCommands::Add {
            title: "idea".to_string(),
            content: "split panes".to_string(),
        },
    })
    .unwrap();
    let listed = cli
        .execute(&Commands::Notes {
            command: NotesCommands::List,
        })
        .unwrap();
    assert!(listed.contains("split panes"));
}
