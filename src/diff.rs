//! Uncommitted changes against `HEAD`, untracked files included.
//!
//! Untracked files only show up in `git diff` once the index knows about them,
//! so they are staged with `--intent-to-add` for the duration of the capture.
//! [`IntentToAdd`] owns that staging and undoes it on every exit path.

use crate::assemble::{assemble_diff, posix, write_output};
use crate::error::{Error, Result};
use crate::git::{self, GitError};
use crate::naming::{project_name, unique_output_path};
use std::fs;
use std::path::{Path, PathBuf};

pub const DIFF_STEM: &str = "diff_dump";

pub struct IntentToAdd<'a> {
    dir: &'a Path,
    paths: Vec<PathBuf>,
    released: bool,
}

impl<'a> IntentToAdd<'a> {
    pub fn stage(dir: &'a Path, paths: Vec<PathBuf>) -> Result<Self> {
        if let Err(e) = git::add_intent_to_add(dir, &paths) {
            // A failed add can still leave part of the batch in the index.
            if let Err(reset) = git::reset_paths(dir, &paths) {
                log::warn!("could not undo partial intent-to-add: {}", reset);
            }
            return Err(e.into());
        }
        log::debug!("staged {} untracked files with --intent-to-add", paths.len());
        Ok(IntentToAdd {
            dir,
            paths,
            released: false,
        })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Unstages everything this guard staged.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        git::reset_paths(self.dir, &self.paths)
            .map_err(|e| Error::StagingCleanup(e.to_string()))?;
        log::debug!("unstaged {} intent-to-add entries", self.paths.len());
        Ok(())
    }
}

impl Drop for IntentToAdd<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = git::reset_paths(self.dir, &self.paths) {
            log::warn!(
                "failed to unstage intent-to-add entries, run `git reset -- <paths>` by hand: {}",
                e
            );
        }
    }
}

#[derive(Debug)]
pub struct DiffCapture {
    pub diff: String,
    /// Set when the diff was captured but the staging could not be undone.
    pub cleanup_error: Option<Error>,
}

/// Pathspecs hiding this tool's own outputs (`STEM.txt`, `STEM (N).txt`) and
/// the exact file about to be written.
pub fn artifact_exclusions(dir: &Path, stems: &[&str], output: Option<&Path>) -> Vec<String> {
    let mut specs = Vec::new();
    for stem in stems {
        specs.push(format!(":(exclude,glob){}.txt", stem));
        specs.push(format!(":(exclude,glob){} (*).txt", stem));
    }

    let relative = output.and_then(|out| {
        let parent = fs::canonicalize(out.parent()?).ok()?;
        let base = fs::canonicalize(dir).ok()?;
        let rel = parent.strip_prefix(&base).ok()?.join(out.file_name()?);
        Some(posix(&rel))
    });
    if let Some(rel) = relative {
        specs.push(format!(":(exclude,literal){}", rel));
    }

    specs
}

/// Diff of `dir` against `HEAD`, with untracked files temporarily staged.
pub fn capture_diff(dir: &Path, exclude: &[String]) -> Result<DiffCapture> {
    let untracked = git::untracked_files(dir, exclude)?;
    let guard = IntentToAdd::stage(dir, untracked)?;

    let diff = git::diff_head(dir, exclude);
    settle(diff, guard.release())
}

/// A captured diff wins over a failed cleanup; the cleanup error rides along.
fn settle(diff: Result<String, GitError>, cleanup: Result<()>) -> Result<DiffCapture> {
    match (diff, cleanup) {
        (Ok(diff), Ok(())) => Ok(DiffCapture {
            diff,
            cleanup_error: None,
        }),
        (Ok(diff), Err(e)) => Ok(DiffCapture {
            diff,
            cleanup_error: Some(e),
        }),
        (Err(e), cleanup) => {
            if let Err(c) = cleanup {
                log::warn!("{}", c);
            }
            Err(e.into())
        }
    }
}

#[derive(Debug)]
pub struct DiffOptions<'a> {
    pub dir: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub header: Option<&'a str>,
}

#[derive(Debug)]
pub enum DiffOutcome {
    Written {
        path: PathBuf,
        document: String,
        cleanup_error: Option<Error>,
    },
    NoChanges,
    NoCommits,
    /// Git is missing or `dir` is not a repository.
    Unavailable(GitError),
}

pub fn dump_diff(opts: &DiffOptions) -> Result<DiffOutcome> {
    if let Err(e) = git::repo_root(&opts.dir) {
        return Ok(DiffOutcome::Unavailable(e));
    }
    if !git::has_commits(&opts.dir)? {
        return Ok(DiffOutcome::NoCommits);
    }

    let out_dir = opts.output_dir.as_deref().unwrap_or(&opts.dir);
    let output = unique_output_path(out_dir, DIFF_STEM, "txt");
    let project = project_name(&opts.dir);
    let exclude = artifact_exclusions(&opts.dir, &[DIFF_STEM, project.as_str()], Some(&output));
    log::debug!("diff exclusions: {:?}", exclude);

    let capture = capture_diff(&opts.dir, &exclude)?;
    if capture.diff.trim().is_empty() {
        if let Some(e) = capture.cleanup_error {
            log::warn!("{}", e);
        }
        return Ok(DiffOutcome::NoChanges);
    }

    let document = assemble_diff(opts.header, &capture.diff);
    let path = write_output(out_dir, DIFF_STEM, &document)?;
    if path != output {
        log::warn!("{} appeared meanwhile, wrote {}", output.display(), path.display());
    }

    Ok(DiffOutcome::Written {
        path,
        document,
        cleanup_error: capture.cleanup_error,
    })
}
