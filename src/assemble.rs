use crate::error::{Error, Result};
use crate::naming;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

pub const STRUCTURE_HEADER: &str = "## 📁 File Structure";
pub const CONTENTS_HEADER: &str = "## 📄 File Contents";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBody {
    Text(String),
    /// Read failure message, rendered as an inline placeholder.
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub body: FileBody,
}

impl FileEntry {
    pub fn read(root: &Path, rel_path: &Path) -> Self {
        let body = match fs::read(root.join(rel_path)) {
            Ok(bytes) => FileBody::Text(normalize_newlines(&String::from_utf8_lossy(&bytes))),
            Err(e) => {
                log::warn!("could not read {}: {}", rel_path.display(), e);
                FileBody::Unreadable(e.to_string())
            }
        };
        FileEntry {
            path: rel_path.to_path_buf(),
            body,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DumpDocument<'a> {
    pub header: Option<&'a str>,
    pub tree_lines: Vec<String>,
    pub files: Vec<FileEntry>,
}

/// `/`-separated form of a relative path, independent of the host separator.
pub fn posix(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Root-level files first, then nested ones, each group by full path.
pub fn order_files(files: &mut [PathBuf]) {
    files.sort_by_cached_key(|p| (p.components().count() > 1, posix(p)));
}

pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn assemble(doc: &DumpDocument) -> String {
    let mut out = String::new();

    if let Some(header) = doc.header {
        out.push_str(header);
    }

    out.push('\n');
    out.push_str(STRUCTURE_HEADER);
    out.push_str("\n\n");
    out.push_str(&doc.tree_lines.join("\n"));
    out.push_str("\n\n");
    out.push_str(CONTENTS_HEADER);
    out.push_str("\n\n");

    for entry in &doc.files {
        let path = posix(&entry.path);
        match &entry.body {
            FileBody::Text(text) => {
                out.push_str(&format!("### {}\n```\n{}\n```\n\n", path, text.trim_end()));
            }
            FileBody::Unreadable(reason) => {
                out.push_str(&format!("<Could not read file {}: {}>\n\n", path, reason));
            }
        }
    }

    out
}

pub fn assemble_diff(header: Option<&str>, diff: &str) -> String {
    let mut out = String::new();
    if let Some(header) = header {
        out.push_str(header);
        out.push_str("\n---\n\n");
    }
    out.push_str("```diff\n");
    out.push_str(diff.trim());
    out.push_str("\n```\n");
    out
}

/// Writes `contents` to the first free `stem.txt` / `stem (N).txt` in `dir`
/// and returns the path used. Existing files are never replaced.
pub fn write_output(dir: &Path, stem: &str, contents: &str) -> Result<PathBuf> {
    let (path, mut file) =
        naming::create_unique(dir, stem, "txt").map_err(|source| Error::FileWrite {
            path: naming::unique_output_path(dir, stem, "txt"),
            source,
        })?;
    file.write_all(normalize_newlines(contents).as_bytes())
        .map_err(|source| Error::FileWrite {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
