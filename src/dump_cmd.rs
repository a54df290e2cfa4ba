use crate::cli::DumpArgs;
use colored::*;
use repodump::config::load_config;
use repodump::tokens::count_tokens;
use repodump::{dump_codebase, DumpOptions, DumpOutcome, Result, TemplateKey, TemplateRegistry};
use std::path::PathBuf;

pub fn run(args: DumpArgs) -> Result<()> {
    let dir = PathBuf::from(args.path.unwrap_or_else(|| ".".to_string()));
    let config = load_config(&dir);
    if config.no_color == Some(true) {
        colored::control::set_override(false);
    }

    let registry = TemplateRegistry::builtin();
    let key = match args.template {
        Some(key) => key,
        None => config.template_key()?.unwrap_or(TemplateKey::RooReview),
    };
    let no_prompt = args.no_prompt || config.no_prompt.unwrap_or(false);
    let header = if no_prompt { None } else { registry.text(key) };
    log::debug!("template: {}", if no_prompt { "none".to_string() } else { key.to_string() });

    let opts = DumpOptions {
        dir,
        output_dir: args.output_dir.map(PathBuf::from),
        header,
        rules: config.filter_rules()?,
    };

    match dump_codebase(&opts)? {
        DumpOutcome::Written {
            path,
            document,
            files,
            stats,
        } => {
            log::info!(
                "skipped: {} by type, {} by name, {} by directory, {} earlier dumps, {} binary",
                stats.not_included,
                stats.excluded_name,
                stats.excluded_dir,
                stats.artifact,
                stats.binary
            );

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let mut summary = format!("{} files", files);
            if args.tokens || config.tokens.unwrap_or(false) {
                summary.push_str(&format!(", ~{} tokens", count_tokens(&document)));
            }
            println!(
                "{} {} ({})",
                "✅ Codebase dumped to:".green().bold(),
                name,
                summary
            );
        }
        DumpOutcome::NoFiles { stats } => {
            log::info!("{} files listed by git, none matched", stats.total());
            println!("{}", "No files to dump after filtering.".yellow());
        }
    }

    Ok(())
}
