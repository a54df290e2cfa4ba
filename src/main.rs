mod cli;
mod diff_cmd;
mod dump_cmd;
mod init;
mod templates_cmd;
mod tree_cmd;

use clap::Parser;
use cli::{Cli, Commands};
use colored::*;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.quiet, cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = match cli.command {
        Commands::Dump(args) => dump_cmd::run(args),
        Commands::Diff(args) => diff_cmd::run(args),
        Commands::Tree(args) => tree_cmd::run(args),
        Commands::Templates(args) => templates_cmd::run(args),
        Commands::Init(args) => init::run(args),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}
