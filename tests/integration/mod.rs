//! Integration tests for the codeshell core

mod autosave;
mod cli_contracts;
mod import_flow;
mod persistence;
mod support;
mod tree_properties;
mod workbench_flow;
