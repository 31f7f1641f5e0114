use codeshell::tree::{path, Project};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    File(Vec<String>, String, String),
    Folder(Vec<String>, String),
}

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}(\\.[a-z]{1,3})?"
}

fn op() -> impl Strategy<Value = Op> {
    let dirs = prop::collection::vec("[a-d]", 0..3);
    prop_oneof![
        (dirs.clone(), name(), ".{0,40}").prop_map(|(d, n, c)| Op::File(d, n, c)),
        (dirs, name()).prop_map(|(d, n)| Op::Folder(d, n)),
    ]
}

/// Create each missing folder along `dirs`, returning the deepest path.
fn ensure_dirs(project: &mut Project, dirs: &[String]) -> Option<String> {
    let mut current = project.name().to_string();
    for dir in dirs {
        let next = path::join(&current, dir);
        match project.resolve(&next) {
            Ok(node) if node.is_folder() => {}
            Ok(_) => return None,
            Err(_) => {
                project.create_folder(&current, dir).ok()?;
            }
        }
        current = next;
    }
    Some(current)
}

fn build(ops: &[Op]) -> Project {
    let mut project = Project::new("prop").unwrap();
    for op in ops {
        match op {
            Op::File(dirs, n, content) => {
                if let Some(parent) = ensure_dirs(&mut project, dirs) {
                    let _ = project.create_file(&parent, n, content);
                }
            }
            Op::Folder(dirs, n) => {
                if let Some(parent) = ensure_dirs(&mut project, dirs) {
                    let _ = project.create_folder(&parent, n);
                }
            }
        }
    }
    project
}

proptest! {
    #[test]
    fn serialize_round_trip_preserves_tree(ops in prop::collection::vec(op(), 0..25)) {
        let project = build(&ops);
        let restored = Project::deserialize(project.serialize().unwrap()).unwrap();
        prop_assert_eq!(&restored, &project);
        for file in project.file_paths() {
            prop_assert_eq!(restored.read_file(&file).unwrap(), project.read_file(&file).unwrap());
        }
    }

    #[test]
    fn sibling_names_stay_unique(ops in prop::collection::vec(op(), 0..25)) {
        let project = build(&ops);
        for (_, node) in project.walk() {
            if let Some(folder) = node.as_folder() {
                let mut names: Vec<&str> = folder.children.iter().map(|c| c.name()).collect();
                let total = names.len();
                names.sort_unstable();
                names.dedup();
                prop_assert_eq!(names.len(), total);
            }
        }
    }

    #[test]
    fn rename_keeps_file_count(ops in prop::collection::vec(op(), 1..20)) {
        let mut project = build(&ops);
        let before = project.file_paths().len();
        if let Some(target) = project.file_paths().first().cloned() {
            let renamed = project.rename(&target, "renamed_target.txt").unwrap();
            prop_assert!(project.exists(&renamed.to));
            prop_assert!(!project.exists(&target) || target == renamed.to);
            prop_assert!(project.file_paths().len() <= before);
        }
    }
}
