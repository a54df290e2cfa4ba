use clap::{ArgAction, Parser, Subcommand};
use repodump::TemplateKey;

#[derive(Parser)]
#[command(name = "repodump", version)]
#[command(
    about = "Dump a git project's tree and sources into one prompt-ready text file",
    long_about = None
)]
pub struct Cli {
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "More log output (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Silence log output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Disable colors")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Write the file tree and file contents to PROJECT.txt")]
    Dump(DumpArgs),

    #[command(about = "Write uncommitted changes, untracked files included, to diff_dump.txt")]
    Diff(DiffArgs),

    #[command(about = "Print the filtered file tree without writing anything")]
    Tree(TreeArgs),

    #[command(about = "List the built-in templates, or print one")]
    Templates(TemplatesArgs),

    #[command(about = "Create a default .repodump.toml")]
    Init(InitArgs),
}

#[derive(Parser)]
pub struct DumpArgs {
    #[arg(help = "Project path (default: current directory)")]
    pub path: Option<String>,

    #[arg(short, long, value_enum, help = "Template to prepend (default: rooreview)")]
    pub template: Option<TemplateKey>,

    #[arg(long, help = "Leave out the template header")]
    pub no_prompt: bool,

    #[arg(long, help = "Report an approximate token count")]
    pub tokens: bool,

    #[arg(short, long, help = "Directory to write the dump to (default: project path)")]
    pub output_dir: Option<String>,
}

#[derive(Parser)]
pub struct DiffArgs {
    #[arg(help = "Project path (default: current directory)")]
    pub path: Option<String>,

    #[arg(short, long, value_enum, help = "Template to prepend (default: followup)")]
    pub template: Option<TemplateKey>,

    #[arg(long, help = "Leave out the template header")]
    pub no_prompt: bool,

    #[arg(long, help = "Report an approximate token count")]
    pub tokens: bool,

    #[arg(short, long, help = "Directory to write the dump to (default: project path)")]
    pub output_dir: Option<String>,
}

#[derive(Parser)]
pub struct TreeArgs {
    #[arg(help = "Project path (default: current directory)")]
    pub path: Option<String>,

    #[arg(long, help = "Print the tree as nested JSON")]
    pub json: bool,
}

#[derive(Parser)]
pub struct TemplatesArgs {
    #[arg(value_enum, help = "Template to print in full")]
    pub key: Option<TemplateKey>,
}

#[derive(Parser)]
pub struct InitArgs {
    #[arg(long, help = "Write ~/.repodump/config.toml instead")]
    pub global: bool,

    #[arg(short, long, help = "Overwrite an existing file")]
    pub force: bool,
}
