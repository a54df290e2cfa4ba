use crate::cli::TreeArgs;
use colored::*;
use repodump::config::load_config;
use repodump::{build_tree, collect_files, render_tree, Result};
use std::path::PathBuf;

pub fn run(args: TreeArgs) -> Result<()> {
    let dir = PathBuf::from(args.path.unwrap_or_else(|| ".".to_string()));
    let config = load_config(&dir);
    if config.no_color == Some(true) {
        colored::control::set_override(false);
    }

    let (files, _stats) = collect_files(&dir, &config.filter_rules()?)?;
    let tree = build_tree(&files);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    if files.is_empty() {
        println!("{}", "No files matched.".yellow());
        return Ok(());
    }

    for line in render_tree(&tree) {
        match line.strip_suffix('/') {
            Some(dir_line) => println!("{}{}", dir_line, "/".blue().bold()),
            None => println!("{}", line),
        }
    }
    println!("\n{} files", files.len());

    Ok(())
}
