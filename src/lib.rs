pub mod assemble;
pub mod config;
pub mod diff;
pub mod error;
pub mod filter;
pub mod git;
pub mod naming;
pub mod templates;
pub mod tokens;
pub mod tree;

#[cfg(test)]
mod test_support;

pub use assemble::{assemble, DumpDocument, FileBody, FileEntry};
pub use config::{load_config, Config};
pub use diff::{dump_diff, DiffOptions, DiffOutcome};
pub use error::{Error, Result};
pub use filter::{FilterRules, FilterStats, Verdict};
pub use git::GitError;
pub use templates::{TemplateKey, TemplateRegistry};
pub use tree::{build_tree, render_tree, Node};

use std::path::{Path, PathBuf};

/// Files under `dir` that git knows about and `rules` accept, in dump order.
/// Earlier outputs of this tool are always left out.
pub fn collect_files(dir: &Path, rules: &FilterRules) -> Result<(Vec<PathBuf>, FilterStats)> {
    let project = naming::project_name(dir);
    let rules = rules
        .clone()
        .with_artifact_stem(&project)
        .with_artifact_stem(diff::DIFF_STEM);

    let mut stats = FilterStats::default();
    let mut files: Vec<PathBuf> = git::ls_files(dir)?
        .into_iter()
        .filter(|p| {
            let verdict = rules.check(dir, p);
            if verdict != Verdict::Accepted {
                log::debug!("skipping {} ({:?})", p.display(), verdict);
            }
            stats.record(verdict);
            verdict == Verdict::Accepted
        })
        .collect();

    assemble::order_files(&mut files);
    log::info!("{} of {} files selected", stats.accepted, stats.total());
    Ok((files, stats))
}

#[derive(Debug, Clone)]
pub struct DumpOptions<'a> {
    pub dir: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub header: Option<&'a str>,
    pub rules: FilterRules,
}

#[derive(Debug)]
pub enum DumpOutcome {
    Written {
        path: PathBuf,
        document: String,
        files: usize,
        stats: FilterStats,
    },
    /// Nothing survived filtering; no file was written.
    NoFiles { stats: FilterStats },
}

pub fn dump_codebase(opts: &DumpOptions) -> Result<DumpOutcome> {
    let (files, stats) = collect_files(&opts.dir, &opts.rules)?;
    if files.is_empty() {
        return Ok(DumpOutcome::NoFiles { stats });
    }

    let tree = build_tree(&files);
    let entries: Vec<FileEntry> = files
        .iter()
        .map(|rel| FileEntry::read(&opts.dir, rel))
        .collect();

    let document = assemble(&DumpDocument {
        header: opts.header,
        tree_lines: render_tree(&tree),
        files: entries,
    });

    let out_dir = opts.output_dir.as_deref().unwrap_or(&opts.dir);
    let path = assemble::write_output(out_dir, &naming::project_name(&opts.dir), &document)?;

    Ok(DumpOutcome::Written {
        path,
        document,
        files: files.len(),
        stats,
    })
}
