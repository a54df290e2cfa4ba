use crate::cli::InitArgs;
use repodump::config::{global_config_path, DEFAULT_CONFIG, PROJECT_CONFIG};
use repodump::{Error, Result};
use std::fs;
use std::path::PathBuf;

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.global {
        global_config_path()
            .ok_or_else(|| Error::Config("could not determine home directory".to_string()))?
    } else {
        PathBuf::from(PROJECT_CONFIG)
    };

    if path.exists() && !args.force {
        return Err(Error::InvalidArgument(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, DEFAULT_CONFIG).map_err(|source| Error::FileWrite {
        path: path.clone(),
        source,
    })?;

    let location = if args.global { "global" } else { "local" };
    println!("Created {} config at {}", location, path.display());

    Ok(())
}
