//! Starter layouts for new projects.

use super::node::{FolderNode, Node};
use super::project::Project;
use crate::error::ShellError;
use serde::{Deserialize, Serialize};

/// Project template kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProjectTemplate {
    /// index.html with css/ and js/ folders
    Web,
    /// package.json, index.js, .gitignore and README.md
    Node,
    /// README.md only
    #[default]
    Empty,
}

impl Project {
    /// Create a project populated from a template.
    pub fn from_template(name: &str, template: ProjectTemplate) -> Result<Self, ShellError> {
        let mut root = FolderNode::new(name);
        match template {
            ProjectTemplate::Web => {
                root.insert(Node::file("index.html", web_index(name)));
                let mut css = FolderNode::new("css");
                css.insert(Node::file("styles.css", web_styles(name)));
                root.insert(Node::Folder(css));
                let mut js = FolderNode::new("js");
                js.insert(Node::file("main.js", web_script(name)));
                root.insert(Node::Folder(js));
            }
            ProjectTemplate::Node => {
                root.insert(Node::file("package.json", node_package(name)));
                root.insert(Node::file("index.js", node_index(name)));
                root.insert(Node::file(".gitignore", NODE_GITIGNORE));
                root.insert(Node::file("README.md", node_readme(name)));
            }
            ProjectTemplate::Empty => {
                root.insert(Node::file(
                    "README.md",
                    format!("# {}\n\nWelcome to your new project!", name),
                ));
            }
        }
        Project::from_root(root)
    }
}

fn web_index(name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{name}</title>
    <link rel="stylesheet" href="css/styles.css">
</head>
<body>
    <h1>{name}</h1>
    <p>Welcome to your new web project!</p>

    <script src="js/main.js"></script>
</body>
</html>"#
    )
}

fn web_styles(name: &str) -> String {
    format!(
        "/* Styles for {name} */\nbody {{\n    font-family: Arial, sans-serif;\n    line-height: 1.6;\n    margin: 0;\n    padding: 20px;\n    color: #333;\n}}\n\nh1 {{\n    color: #0066cc;\n}}"
    )
}

fn web_script(name: &str) -> String {
    format!(
        "// Main JavaScript for {name}\ndocument.addEventListener('DOMContentLoaded', () => {{\n    console.log('{name} application loaded');\n}});"
    )
}

/// npm package names: lowercase, anything outside `[a-z0-9]` becomes `-`.
fn package_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect()
}

fn node_package(name: &str) -> String {
    let package = serde_json::json!({
        "name": package_name(name),
        "version": "1.0.0",
        "description": format!("{} - Node.js application", name),
        "main": "index.js",
        "scripts": {
            "start": "node index.js",
            "test": "echo \"Error: no test specified\" && exit 1"
        },
        "keywords": [],
        "author": "",
        "license": "ISC"
    });
    serde_json::to_string_pretty(&package).unwrap_or_default()
}

fn node_index(name: &str) -> String {
    format!(
        r#"// Main entry point for {name}
console.log('{name} application started');

const http = require('http');

const server = http.createServer((req, res) => {{
    res.statusCode = 200;
    res.setHeader('Content-Type', 'text/plain');
    res.end('Hello, World!\n');
}});

const PORT = process.env.PORT || 3000;
server.listen(PORT, () => {{
    console.log(`Server running at http://localhost:${{PORT}}/`);
}});"#
    )
}

const NODE_GITIGNORE: &str = "# Node.js specific\nnode_modules/\nnpm-debug.log\nyarn-debug.log\nyarn-error.log\npackage-lock.json\n\n# Environment variables\n.env\n\n# Logs\nlogs/\n*.log\n\n# OS specific\n.DS_Store\nThumbs.db";

fn node_readme(name: &str) -> String {
    format!(
        "# {name}\n\nA Node.js application.\n\n## Getting Started\n\n1. Clone this repository\n2. Run `npm install`\n3. Run `npm start`\n\n## License\n\nISC"
    )
}
