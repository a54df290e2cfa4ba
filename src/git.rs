use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git is not installed or not on PATH")]
    NotInstalled,
    #[error("not a git repository (run inside a git-initialized directory)")]
    NotARepo,
    #[error("git command failed: {0}")]
    CommandFailed(String),
}

/// Runs `git <args>` in `dir` and returns stdout, mapping the failure modes
/// every caller cares about.
fn git_output<I, S>(dir: &Path, args: I) -> Result<Vec<u8>, GitError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(dir);
    log::trace!("running {:?} in {}", cmd, dir.display());

    let output = cmd.output().map_err(spawn_error)?;
    check_output(output)
}

/// Like [`git_output`], but feeds `paths` to git on stdin, NUL-separated and
/// read as literal pathspecs. Keeps the command line short however many
/// paths there are.
fn git_with_pathspecs(dir: &Path, args: &[&str], paths: &[PathBuf]) -> Result<Vec<u8>, GitError> {
    let mut input = Vec::new();
    for path in paths {
        input.extend_from_slice(path.to_string_lossy().as_bytes());
        input.push(0);
    }

    let mut cmd = Command::new("git");
    cmd.arg("--literal-pathspecs")
        .args(args)
        .args(["--pathspec-from-file=-", "--pathspec-file-nul"])
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    log::trace!(
        "running {:?} in {} with {} pathspecs",
        cmd,
        dir.display(),
        paths.len()
    );

    let mut child = cmd.spawn().map_err(spawn_error)?;
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| GitError::CommandFailed("git stdin was not captured".to_string()))?;
    let writer = thread::spawn(move || stdin.write_all(&input));

    let output = child.wait_with_output().map_err(spawn_error)?;
    let written = writer.join();
    let stdout = check_output(output)?;
    match written {
        Ok(Ok(())) => Ok(stdout),
        Ok(Err(e)) => Err(GitError::CommandFailed(format!(
            "could not pass pathspecs to git: {}",
            e
        ))),
        Err(_) => Err(GitError::CommandFailed(
            "pathspec writer thread panicked".to_string(),
        )),
    }
}

fn spawn_error(e: io::Error) -> GitError {
    if e.kind() == io::ErrorKind::NotFound {
        GitError::NotInstalled
    } else {
        GitError::CommandFailed(format!("could not run git: {}", e))
    }
}

fn check_output(output: Output) -> Result<Vec<u8>, GitError> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("not a git repository") {
            return Err(GitError::NotARepo);
        }
        return Err(GitError::CommandFailed(stderr.trim().to_string()));
    }
    Ok(output.stdout)
}

fn split_nul(stdout: &[u8]) -> Vec<PathBuf> {
    stdout
        .split(|b| *b == 0)
        .filter(|entry| !entry.is_empty())
        .map(|entry| PathBuf::from(String::from_utf8_lossy(entry).into_owned()))
        .collect()
}

/// Tracked plus untracked-but-not-ignored files under `dir`, relative to `dir`.
pub fn ls_files(dir: &Path) -> Result<Vec<PathBuf>, GitError> {
    let stdout = git_output(
        dir,
        ["ls-files", "--cached", "--others", "--exclude-standard", "-z"],
    )?;
    let files = split_nul(&stdout);
    log::debug!("git listed {} files in {}", files.len(), dir.display());
    Ok(files)
}

pub fn repo_root(path: &Path) -> Result<PathBuf, GitError> {
    let stdout = git_output(path, ["rev-parse", "--show-toplevel"])?;
    let root = PathBuf::from(String::from_utf8_lossy(&stdout).trim());
    Ok(root)
}

/// Whether `HEAD` resolves to a commit. Callers must have checked the
/// repository first; any failure here is read as "no commits".
pub fn has_commits(dir: &Path) -> Result<bool, GitError> {
    let status = Command::new("git")
        .args(["rev-parse", "--verify", "--quiet", "HEAD"])
        .current_dir(dir)
        .output()
        .map_err(spawn_error)?
        .status;
    Ok(status.success())
}

/// Untracked, non-ignored files under `dir`, minus anything matched by the
/// `exclude` pathspecs.
pub fn untracked_files(dir: &Path, exclude: &[String]) -> Result<Vec<PathBuf>, GitError> {
    let mut args = vec!["ls-files", "--others", "--exclude-standard", "-z", "--", "."];
    args.extend(exclude.iter().map(String::as_str));
    Ok(split_nul(&git_output(dir, args)?))
}

pub fn add_intent_to_add(dir: &Path, paths: &[PathBuf]) -> Result<(), GitError> {
    if paths.is_empty() {
        return Ok(());
    }
    git_with_pathspecs(dir, &["add", "--intent-to-add"], paths)?;
    Ok(())
}

/// Drops `paths` from the index again, leaving the working tree alone.
pub fn reset_paths(dir: &Path, paths: &[PathBuf]) -> Result<(), GitError> {
    if paths.is_empty() {
        return Ok(());
    }
    git_with_pathspecs(dir, &["reset", "--quiet"], paths)?;
    Ok(())
}

/// Working tree diff against `HEAD` for everything under `dir`.
pub fn diff_head(dir: &Path, exclude: &[String]) -> Result<String, GitError> {
    let mut args = vec!["diff", "HEAD", "--no-color", "--no-ext-diff", "--", "."];
    args.extend(exclude.iter().map(String::as_str));
    let stdout = git_output(dir, args)?;
    Ok(String::from_utf8_lossy(&stdout).into_owned())
}

pub fn status_porcelain(dir: &Path) -> Result<String, GitError> {
    let stdout = git_output(dir, ["status", "--porcelain", "--untracked-files=all"])?;
    Ok(String::from_utf8_lossy(&stdout).into_owned())
}
