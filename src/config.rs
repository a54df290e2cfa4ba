use crate::error::{Error, Result};
use crate::filter::{FilterRules, DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_NAMES, DEFAULT_INCLUDE};
use crate::git;
use crate::templates::TemplateKey;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG: &str = ".repodump.toml";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub include: Option<Vec<String>>,
    pub extra_include: Option<Vec<String>>,
    pub exclude_names: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
    pub extra_exclude_dirs: Option<Vec<String>>,
    pub template: Option<String>,
    pub no_prompt: Option<bool>,
    pub no_color: Option<bool>,
    pub tokens: Option<bool>,
}

impl Config {
    pub fn merge(&mut self, other: Config) {
        if other.include.is_some() {
            self.include = other.include;
        }
        if let Some(extra) = other.extra_include {
            self.extra_include.get_or_insert_with(Vec::new).extend(extra);
        }
        if other.exclude_names.is_some() {
            self.exclude_names = other.exclude_names;
        }
        if other.exclude_dirs.is_some() {
            self.exclude_dirs = other.exclude_dirs;
        }
        if let Some(extra) = other.extra_exclude_dirs {
            self.extra_exclude_dirs.get_or_insert_with(Vec::new).extend(extra);
        }
        if other.template.is_some() {
            self.template = other.template;
        }
        if other.no_prompt.is_some() {
            self.no_prompt = other.no_prompt;
        }
        if other.no_color.is_some() {
            self.no_color = other.no_color;
        }
        if other.tokens.is_some() {
            self.tokens = other.tokens;
        }
    }

    pub fn parse_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| Error::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn filter_rules(&self) -> Result<FilterRules> {
        let mut include: Vec<String> = match &self.include {
            Some(list) => list.clone(),
            None => DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
        };
        include.extend(self.extra_include.iter().flatten().cloned());

        let names: Vec<String> = match &self.exclude_names {
            Some(list) => list.clone(),
            None => DEFAULT_EXCLUDED_NAMES.iter().map(|s| s.to_string()).collect(),
        };

        let mut dirs: Vec<String> = match &self.exclude_dirs {
            Some(list) => list.clone(),
            None => DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
        };
        dirs.extend(self.extra_exclude_dirs.iter().flatten().cloned());

        FilterRules::new(&include, &names, &dirs)
    }

    pub fn template_key(&self) -> Result<Option<TemplateKey>> {
        self.template.as_deref().map(TemplateKey::parse).transpose()
    }
}

pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".repodump").join("config.toml"))
}

/// Global config overlaid by the project's `.repodump.toml`. Unreadable or
/// malformed files are skipped with a warning.
pub fn load_config(dir: &Path) -> Config {
    let mut config = Config::default();

    // 1. Global config: ~/.repodump/config.toml
    if let Some(global_path) = global_config_path() {
        merge_file(&mut config, &global_path);
    }

    // 2. Project config, at the repo root when there is one
    let base = git::repo_root(dir).unwrap_or_else(|_| dir.to_path_buf());
    merge_file(&mut config, &base.join(PROJECT_CONFIG));

    config
}

fn merge_file(config: &mut Config, path: &Path) {
    if !path.is_file() {
        return;
    }
    match Config::parse_file(path) {
        Ok(layer) => {
            log::debug!("loaded config from {}", path.display());
            config.merge(layer);
        }
        Err(e) => log::warn!("ignoring config: {}", e),
    }
}

pub const DEFAULT_CONFIG: &str = r#"# repodump configuration
#
# Every key is optional. Lists under `include`, `exclude_names` and
# `exclude_dirs` replace the built-in defaults; the `extra_*` lists add to them.

# include = ["*.py", "*.rs", "*.md"]
# extra_include = ["Dockerfile", "*.sql"]
# exclude_names = [".env", "secrets.json"]
# exclude_dirs = [".git", "node_modules", "dist", "build"]
# extra_exclude_dirs = ["target", "coverage"]

# Header used by `repodump dump`: rooreview, neutral, auditor, security-auditor
# template = "rooreview"

# no_prompt = false
# no_color = false
# tokens = false
"#;
