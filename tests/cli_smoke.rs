use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn init_git_repo(dir: &Path) {
    // init and basic identity
    assert!(Command::new("git")
        .args(["init"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "core.autocrlf", "false"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "user.email", "you@example.com"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "user.name", "Your Name"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn commit_file(dir: &Path, name: &str, lines: usize, email: &str, date: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let content: String = (0..lines).map(|i| format!("line {i}\n")).collect();
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    assert!(Command::new("git")
        .args(["add", "."])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args([
            "-c",
            &format!("user.email={email}"),
            "-c",
            "user.name=Test Author",
            "commit",
            "-m",
            &format!("add {name}"),
        ])
        .current_dir(dir)
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .status()
        .unwrap()
        .success());
}

fn write_contributors(path: &Path) {
    fs::write(
        path,
        r#"{
    "ignore": [],
    "ids": {
        "alice@example.com": "alice",
        "alice@old.example.com": "alice"
    },
    "info": {
        "alice": { "name": "Alice", "github": "alice" }
    },
    "team": ["alice"]
}"#,
    )
    .unwrap();
}

fn seed_workdir(root: &Path) {
    let repo = root.join("repos").join("acme").join("widget");
    fs::create_dir_all(&repo).unwrap();
    init_git_repo(&repo);
    commit_file(&repo, "a.txt", 10, "alice@example.com", "2021-03-15T12:00:00+00:00");
    commit_file(&repo, "b.txt", 20, "alice@old.example.com", "2021-05-01T12:00:00+00:00");
    commit_file(&repo, "c.txt", 30, "carol@unknown.example", "2021-07-10T12:00:00+00:00");
    write_contributors(&root.join("contributors.json"));
}

fn run_generate(root: &Path) {
    let mut cmd = Command::cargo_bin("gtally").unwrap();
    cmd.current_dir(root)
        .arg("--workdir")
        .arg(root.join("repos"))
        .arg("--contributors")
        .arg(root.join("contributors.json"))
        .arg("--out")
        .arg(root.join("out"))
        .arg("generate");
    cmd.assert().success();
}

#[test]
fn generate_writes_all_artifacts() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    seed_workdir(dir.path());
    run_generate(dir.path());

    let out = dir.path().join("out");
    let claimed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("generated_contrib.json")).unwrap())
            .unwrap();
    let entries = claimed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "alice");
    // both alice emails merge: 10 + 20 inserted lines across two commits
    assert_eq!(entries[0]["contributions"], 30);
    assert_eq!(entries[0]["commits"].as_array().unwrap().len(), 2);
    assert_eq!(entries[0]["team"], true);

    let unclaimed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("generated_unclaimed.json")).unwrap())
            .unwrap();
    assert_eq!(
        unclaimed.as_array().unwrap(),
        &vec![serde_json::Value::from("carol@unknown.example")]
    );

    // grand total is 60, so the claimed 30 lines are a 50.00% share
    let readme = fs::read_to_string(out.join("README.md")).unwrap();
    assert!(readme.contains("|**Alice**|30|(50.00%)|[GitHub](https://github.com/alice)"));

    let history = fs::read_to_string(out.join("HISTORY.md")).unwrap();
    assert!(history.contains("## 2021-04 to 2021-07"));
    // only the May commit lands in the first quarter window
    assert!(history.contains("\nAlice\n:-:\n20\n100.00%\n100.00%\n"));
}

#[test]
fn generate_is_idempotent() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    seed_workdir(dir.path());

    run_generate(dir.path());
    let first = fs::read(dir.path().join("out").join("generated_contrib.json")).unwrap();

    run_generate(dir.path());
    let second = fs::read(dir.path().join("out").join("generated_contrib.json")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn repo_without_commits_yields_nothing() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let repo = dir.path().join("repos").join("acme").join("empty");
    fs::create_dir_all(&repo).unwrap();
    init_git_repo(&repo);
    write_contributors(&dir.path().join("contributors.json"));
    run_generate(dir.path());

    let unclaimed: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("out").join("generated_unclaimed.json")).unwrap(),
    )
    .unwrap();
    assert!(unclaimed.as_array().unwrap().is_empty());
}

#[test]
fn generate_on_empty_workdir_produces_empty_reports() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("repos")).unwrap();
    write_contributors(&dir.path().join("contributors.json"));
    run_generate(dir.path());

    let claimed: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("out").join("generated_contrib.json")).unwrap(),
    )
    .unwrap();
    assert!(claimed.as_array().unwrap().is_empty());
}
