use crate::error::{Error, Result};
use glob::Pattern;
use lazy_static::lazy_static;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path};

/// Bytes inspected by the binary heuristic.
pub const SNIFF_LEN: u64 = 2048;

/// Share of non-text bytes above which a sample counts as binary.
pub const BINARY_RATIO: f64 = 0.30;

lazy_static! {
    pub static ref DEFAULT_INCLUDE: Vec<&'static str> = vec![
        "*.py",
        "*.ts",
        "*.tsx",
        "*.js",
        "*.jsx",
        "*.rs",
        "*.html",
        "*.css",
        "*.json",
        "*.toml",
        "*.yml",
        "*.yaml",
        "*.md",
        "*.txt",
        "*.sh",
        "*.env.example",
    ];
    pub static ref DEFAULT_EXCLUDED_NAMES: Vec<&'static str> = vec![".env", "secrets.json"];
    pub static ref DEFAULT_EXCLUDED_DIRS: Vec<&'static str> = vec![
        ".git",
        ".idea",
        ".vscode",
        "node_modules",
        ".venv",
        "venv",
        "dist",
        "build",
        "__pycache__",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    NotIncluded,
    ExcludedName,
    ExcludedDir,
    /// An earlier output of this tool.
    Artifact,
    Binary,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterStats {
    pub accepted: usize,
    pub not_included: usize,
    pub excluded_name: usize,
    pub excluded_dir: usize,
    pub artifact: usize,
    pub binary: usize,
}

impl FilterStats {
    pub fn record(&mut self, verdict: Verdict) {
        let slot = match verdict {
            Verdict::Accepted => &mut self.accepted,
            Verdict::NotIncluded => &mut self.not_included,
            Verdict::ExcludedName => &mut self.excluded_name,
            Verdict::ExcludedDir => &mut self.excluded_dir,
            Verdict::Artifact => &mut self.artifact,
            Verdict::Binary => &mut self.binary,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.accepted
            + self.not_included
            + self.excluded_name
            + self.excluded_dir
            + self.artifact
            + self.binary
    }
}

#[derive(Debug, Clone)]
pub struct FilterRules {
    include: Vec<Pattern>,
    excluded_names: BTreeSet<String>,
    excluded_dirs: BTreeSet<String>,
    artifact_stems: Vec<String>,
}

impl Default for FilterRules {
    fn default() -> Self {
        FilterRules {
            include: DEFAULT_INCLUDE
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect(),
            excluded_names: DEFAULT_EXCLUDED_NAMES.iter().map(|s| s.to_string()).collect(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            artifact_stems: Vec::new(),
        }
    }
}

impl FilterRules {
    pub fn new<S: AsRef<str>>(
        include: &[S],
        excluded_names: &[S],
        excluded_dirs: &[S],
    ) -> Result<Self> {
        let include = include
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| {
                    Error::Config(format!("invalid include pattern '{}': {}", p.as_ref(), e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FilterRules {
            include,
            excluded_names: excluded_names.iter().map(|s| s.as_ref().to_string()).collect(),
            excluded_dirs: excluded_dirs.iter().map(|s| s.as_ref().to_string()).collect(),
            artifact_stems: Vec::new(),
        })
    }

    /// Also reject `STEM.txt` and `STEM (N).txt`, the names this tool writes.
    pub fn with_artifact_stem(mut self, stem: &str) -> Self {
        self.artifact_stems.push(stem.to_string());
        self
    }

    /// Every rule except the binary check, which needs the file on disk.
    pub fn check_name(&self, rel_path: &Path) -> Verdict {
        let name = match rel_path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return Verdict::NotIncluded,
        };

        if !self.include.iter().any(|p| p.matches(name)) {
            return Verdict::NotIncluded;
        }

        if self.excluded_names.contains(name) {
            return Verdict::ExcludedName;
        }

        let in_excluded_dir = rel_path.components().any(|c| match c {
            Component::Normal(seg) => seg
                .to_str()
                .map(|s| self.excluded_dirs.contains(s))
                .unwrap_or(false),
            _ => false,
        });
        if in_excluded_dir {
            return Verdict::ExcludedDir;
        }

        if self
            .artifact_stems
            .iter()
            .any(|stem| is_output_artifact(name, stem))
        {
            return Verdict::Artifact;
        }

        Verdict::Accepted
    }

    pub fn check(&self, root: &Path, rel_path: &Path) -> Verdict {
        match self.check_name(rel_path) {
            Verdict::Accepted if is_binary(&root.join(rel_path)) => Verdict::Binary,
            verdict => verdict,
        }
    }

    pub fn accepts(&self, root: &Path, rel_path: &Path) -> bool {
        self.check(root, rel_path) == Verdict::Accepted
    }
}

/// Matches `STEM.txt` and `STEM (N).txt`.
pub fn is_output_artifact(name: &str, stem: &str) -> bool {
    let Some(rest) = name.strip_prefix(stem) else {
        return false;
    };
    if rest == ".txt" {
        return true;
    }
    rest.strip_prefix(" (")
        .and_then(|r| r.strip_suffix(").txt"))
        .map(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

/// Sniffs the head of `path`. Unreadable files count as binary.
pub fn is_binary(path: &Path) -> bool {
    let mut buf = Vec::with_capacity(SNIFF_LEN as usize);
    let read = File::open(path).and_then(|f| f.take(SNIFF_LEN).read_to_end(&mut buf));
    match read {
        Ok(_) => classify_bytes(&buf),
        Err(e) => {
            log::debug!("treating unreadable {} as binary: {}", path.display(), e);
            true
        }
    }
}

pub fn classify_bytes(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }
    let non_text = sample.iter().filter(|b| !is_text_byte(**b)).count();
    non_text as f64 / sample.len() as f64 > BINARY_RATIO
}

/// Printable ASCII plus common whitespace. Every byte >= 0x80 counts as
/// non-text, so a sample that is mostly multi-byte UTF-8 (CJK, emoji) can
/// cross the ratio and be treated as binary.
fn is_text_byte(b: u8) -> bool {
    matches!(b, 0x20..=0x7E | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}
