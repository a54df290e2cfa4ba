use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

fn candidate(dir: &Path, stem: &str, ext: &str, counter: usize) -> PathBuf {
    if counter == 0 {
        dir.join(format!("{}.{}", stem, ext))
    } else {
        dir.join(format!("{} ({}).{}", stem, counter, ext))
    }
}

/// First of `stem.ext`, `stem (1).ext`, `stem (2).ext`, ... not present in `dir`.
pub fn unique_output_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let mut counter = 0;
    let mut path = candidate(dir, stem, ext, counter);
    while path.exists() {
        counter += 1;
        path = candidate(dir, stem, ext, counter);
    }
    path
}

/// Creates the first free name in the same sequence as [`unique_output_path`].
/// The file is opened with `create_new`, so a name taken in the meantime is
/// skipped rather than truncated.
pub fn create_unique(dir: &Path, stem: &str, ext: &str) -> io::Result<(PathBuf, File)> {
    let mut counter = 0;
    loop {
        let path = candidate(dir, stem, ext, counter);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => counter += 1,
            Err(e) => return Err(e),
        }
    }
}

/// Name of the directory a dump is labelled after.
pub fn project_name(dir: &Path) -> String {
    std::fs::canonicalize(dir)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "project".to_string())
}
