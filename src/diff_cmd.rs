use crate::cli::DiffArgs;
use colored::*;
use repodump::config::load_config;
use repodump::tokens::count_tokens;
use repodump::{
    dump_diff, DiffOptions, DiffOutcome, Error, Result, TemplateKey, TemplateRegistry,
};
use std::path::PathBuf;

pub fn run(args: DiffArgs) -> Result<()> {
    let dir = PathBuf::from(args.path.unwrap_or_else(|| ".".to_string()));
    let config = load_config(&dir);
    if config.no_color == Some(true) {
        colored::control::set_override(false);
    }

    let registry = TemplateRegistry::builtin();
    let key = args.template.unwrap_or(TemplateKey::Followup);
    let no_prompt = args.no_prompt || config.no_prompt.unwrap_or(false);
    let header = if no_prompt { None } else { registry.text(key) };

    let opts = DiffOptions {
        dir,
        output_dir: args.output_dir.map(PathBuf::from),
        header,
    };

    match dump_diff(&opts)? {
        DiffOutcome::Written {
            path,
            document,
            cleanup_error,
        } => {
            if let Some(e) = cleanup_error {
                eprintln!("{}", cleanup_warning(&e));
            }

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            if args.tokens || config.tokens.unwrap_or(false) {
                println!(
                    "{} {} (~{} tokens)",
                    "✅ Diff dumped to:".green().bold(),
                    name,
                    count_tokens(&document)
                );
            } else {
                println!("{} {}", "✅ Diff dumped to:".green().bold(), name);
            }
        }
        DiffOutcome::NoChanges => {
            println!("{}", "No uncommitted changes detected. Nothing to dump.".yellow());
        }
        DiffOutcome::NoCommits => {
            println!(
                "{}",
                "No commits yet, so there is nothing to diff against.".yellow()
            );
        }
        DiffOutcome::Unavailable(e) => {
            println!("{} {}", "❌".red(), e);
        }
    }

    Ok(())
}

fn cleanup_warning(e: &Error) -> String {
    format!("{} {}", "⚠️  Warning:".yellow().bold(), e)
}
