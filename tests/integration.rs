use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(output.status.success(), "git {:?} failed", args);
    String::from_utf8(output.stdout).unwrap()
}

fn setup_test_repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let tmp_path = tmp.path();

    git(tmp_path, &["init", "-q"]);
    git(tmp_path, &["config", "user.email", "test@example.com"]);
    git(tmp_path, &["config", "user.name", "Test User"]);
    git(tmp_path, &["config", "commit.gpgsign", "false"]);

    fs::write(tmp_path.join("README.md"), "# Test Project\n").unwrap();
    fs::write(tmp_path.join(".env"), "SECRET=1\n").unwrap();

    fs::create_dir(tmp_path.join("src")).unwrap();
    fs::write(tmp_path.join("src/a.py"), "print('a')\n").unwrap();
    fs::write(tmp_path.join("src/b.bin"), b"\x00\x01\x02binary").unwrap();

    fs::create_dir(tmp_path.join("node_modules")).unwrap();
    fs::write(tmp_path.join("node_modules/x.js"), "module.exports = 1;\n").unwrap();

    git(tmp_path, &["add", "-A"]);
    git(tmp_path, &["commit", "-q", "-m", "initial"]);

    tmp
}

fn outputs(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".txt"))
        .collect();
    names.sort();
    names
}

fn project_name(dir: &Path) -> String {
    fs::canonicalize(dir)
        .unwrap()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned()
}

#[test]
fn test_dump_basic() {
    let tmp = setup_test_repo();
    let name = project_name(tmp.path());

    Command::cargo_bin("repodump")
        .unwrap()
        .arg("dump")
        .arg(tmp.path())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("Codebase dumped to:"))
        .stdout(predicate::str::contains(format!("{}.txt", name)))
        .stdout(predicate::str::contains("2 files"));

    let dump = fs::read_to_string(tmp.path().join(format!("{}.txt", name))).unwrap();
    assert!(dump.starts_with("# 🧠 You are *RooReview*"));
    assert!(dump.contains("## 📁 File Structure\n\n├── README.md\n└── src/\n    └── a.py\n\n"));
    assert!(dump.contains("### README.md\n```\n# Test Project\n```\n\n### src/a.py\n"));
    assert!(!dump.contains("SECRET"));
    assert!(!dump.contains("module.exports"));
    assert!(!dump.contains("b.bin"));
    assert!(!dump.contains('\r'));
}

#[test]
fn test_dump_never_overwrites() {
    let tmp = setup_test_repo();
    let name = project_name(tmp.path());

    for _ in 0..3 {
        Command::cargo_bin("repodump")
            .unwrap()
            .args(["dump", "--no-color"])
            .current_dir(tmp.path())
            .assert()
            .success();
    }

    assert_eq!(
        outputs(tmp.path()),
        vec![
            format!("{} (1).txt", name),
            format!("{} (2).txt", name),
            format!("{}.txt", name),
        ]
    );

    let first = fs::read_to_string(tmp.path().join(format!("{}.txt", name))).unwrap();
    let third = fs::read_to_string(tmp.path().join(format!("{} (2).txt", name))).unwrap();
    assert_eq!(first, third);
}

#[test]
fn test_dump_no_prompt_and_template() {
    let tmp = setup_test_repo();
    let name = project_name(tmp.path());

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["dump", "--no-prompt", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let bare = fs::read_to_string(tmp.path().join(format!("{}.txt", name))).unwrap();
    assert!(bare.starts_with("\n## 📁 File Structure"));

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["dump", "--template", "auditor", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let audited = fs::read_to_string(tmp.path().join(format!("{} (1).txt", name))).unwrap();
    assert!(audited.starts_with("# 🔍 You are a senior code auditor."));
}

#[test]
fn test_dump_unknown_template() {
    let tmp = setup_test_repo();

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["dump", "--template", "shouty"])
        .current_dir(tmp.path())
        .assert()
        .failure();

    assert!(outputs(tmp.path()).is_empty());
}

#[test]
fn test_dump_respects_project_config() {
    let tmp = setup_test_repo();
    let name = project_name(tmp.path());
    fs::write(
        tmp.path().join(".repodump.toml"),
        "include = [\"*.py\"]\ntemplate = \"neutral\"\n",
    )
    .unwrap();

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["dump", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 files"));

    let dump = fs::read_to_string(tmp.path().join(format!("{}.txt", name))).unwrap();
    assert!(dump.starts_with("# Project Context"));
    assert!(!dump.contains("### README.md"));
}

#[test]
fn test_dump_nothing_to_do() {
    let tmp = TempDir::new().unwrap();
    git(tmp.path(), &["init", "-q"]);
    fs::write(tmp.path().join("logo.png"), b"\x89PNG\r\n").unwrap();

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["dump", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No files to dump after filtering."));

    assert!(outputs(tmp.path()).is_empty());
}

#[test]
fn test_not_git_repo() {
    let tmp = TempDir::new().unwrap();

    Command::cargo_bin("repodump")
        .unwrap()
        .arg("dump")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a git repository"));

    assert!(outputs(tmp.path()).is_empty());
}

#[test]
fn test_tree_preview() {
    let tmp = setup_test_repo();

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["tree", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("├── README.md\n└── src/\n    └── a.py\n"));

    assert!(outputs(tmp.path()).is_empty());
}

#[test]
fn test_tree_json() {
    let tmp = setup_test_repo();

    let output = Command::cargo_bin("repodump")
        .unwrap()
        .args(["tree", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "README.md": null, "src": { "a.py": null } })
    );
}

#[test]
fn test_diff_includes_untracked_and_restores_index() {
    let tmp = setup_test_repo();
    fs::write(tmp.path().join("README.md"), "# Test Project\n\nMore.\n").unwrap();
    fs::write(tmp.path().join("src/new.py"), "print('new')\n").unwrap();
    let status = git(tmp.path(), &["status", "--porcelain"]);

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["diff", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Diff dumped to: diff_dump.txt"));

    let dump = fs::read_to_string(tmp.path().join("diff_dump.txt")).unwrap();
    assert!(dump.starts_with("Here are the changes I've made based on your last review."));
    assert!(dump.contains("\n---\n\n```diff\n"));
    assert!(dump.contains("+More."));
    assert!(dump.contains("+print('new')"));
    assert!(dump.ends_with("```\n"));

    // Only the new dump itself shows up; nothing is left staged.
    let mut expected: Vec<&str> = status.lines().collect();
    expected.push("?? diff_dump.txt");
    expected.sort();
    let after = git(tmp.path(), &["status", "--porcelain"]);
    let mut actual: Vec<&str> = after.lines().collect();
    actual.sort();
    assert_eq!(actual, expected);
}

#[test]
fn test_diff_twice_is_identical() {
    let tmp = setup_test_repo();
    fs::write(tmp.path().join("src/a.py"), "print('changed')\n").unwrap();
    fs::write(tmp.path().join("notes.md"), "untracked\n").unwrap();

    for _ in 0..2 {
        Command::cargo_bin("repodump")
            .unwrap()
            .args(["diff", "--no-prompt", "--no-color"])
            .current_dir(tmp.path())
            .assert()
            .success();
    }

    let first = fs::read(tmp.path().join("diff_dump.txt")).unwrap();
    let second = fs::read(tmp.path().join("diff_dump (1).txt")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_diff_without_changes_or_commits() {
    let tmp = setup_test_repo();

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["diff", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No uncommitted changes detected."));
    assert!(outputs(tmp.path()).is_empty());

    let empty = TempDir::new().unwrap();
    git(empty.path(), &["init", "-q"]);
    fs::write(empty.path().join("a.py"), "x = 1\n").unwrap();

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["diff", "--no-color"])
        .current_dir(empty.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No commits yet"));
    assert_eq!(git(empty.path(), &["status", "--porcelain"]), "?? a.py\n");
}

#[test]
fn test_diff_outside_repo_is_not_fatal() {
    let tmp = TempDir::new().unwrap();

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["diff", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("not a git repository"));
}

#[test]
fn test_templates_list_and_show() {
    Command::cargo_bin("repodump")
        .unwrap()
        .args(["templates", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rooreview"))
        .stdout(predicate::str::contains("security-auditor"))
        .stdout(predicate::str::contains("followup"));

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["templates", "followup"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Here are the changes"));
}

#[test]
fn test_init_local() {
    let tmp = setup_test_repo();
    let config = tmp.path().join(".repodump.toml");

    Command::cargo_bin("repodump")
        .unwrap()
        .arg("init")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created local config"));
    assert!(config.exists());

    Command::cargo_bin("repodump")
        .unwrap()
        .arg("init")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force() {
    let tmp = setup_test_repo();
    let config = tmp.path().join(".repodump.toml");
    fs::write(&config, "existing content\n").unwrap();

    Command::cargo_bin("repodump")
        .unwrap()
        .args(["init", "--force"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let content = fs::read_to_string(&config).unwrap();
    assert!(content.contains("repodump configuration"));
}
