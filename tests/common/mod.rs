use std::path::{Path, PathBuf};
use std::process::Command;

#[allow(dead_code)]
pub const FIXTURE_AUTHOR: &str = "Fixture Bot";
#[allow(dead_code)]
pub const FIXTURE_EMAIL: &str = "fixture@example.com";

/// A date safely inside the window used by most tests.
#[allow(dead_code)]
pub const IN_WINDOW_DATE: &str = "2025-08-12T14:03:00";
/// A date outside it.
#[allow(dead_code)]
pub const OUT_WINDOW_DATE: &str = "2025-01-05T09:00:00";
/// The window flag matching IN_WINDOW_DATE only.
#[allow(dead_code)]
pub const WINDOW_SPEC: &str = "2025-08-01..2025-08-31";

#[allow(dead_code)]
pub fn run(repo: &Path, args: &[&str]) {
  let status = Command::new("git").args(args).current_dir(repo).status().unwrap();
  assert!(status.success(), "git {:?} failed", args);
}

#[allow(dead_code)]
pub fn init_repo(dir: &Path) {
  run(dir, &["init", "-q", "-b", "main"]);
  run(dir, &["config", "user.name", FIXTURE_AUTHOR]);
  run(dir, &["config", "user.email", FIXTURE_EMAIL]);
  run(dir, &["config", "commit.gpgsign", "false"]);
}

#[allow(dead_code)]
pub fn commit_file(repo: &Path, rel: &str, contents: &[u8], message: &str, date: &str) {
  let path = repo.join(rel);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(&path, contents).unwrap();
  run(repo, &["add", "."]);

  let status = Command::new("git")
    .args(["commit", "-q", "-m", message])
    .current_dir(repo)
    .env("GIT_AUTHOR_DATE", date)
    .env("GIT_COMMITTER_DATE", date)
    .status()
    .unwrap();
  assert!(status.success());
}

/// Create `base/name` as a repository with one commit on `date`.
#[allow(dead_code)]
pub fn repo_with_commit(base: &Path, name: &str, date: &str) -> PathBuf {
  repo_with_subject(base, name, date, &format!("{} work", name))
}

#[allow(dead_code)]
pub fn repo_with_subject(base: &Path, name: &str, date: &str, subject: &str) -> PathBuf {
  let dir = base.join(name);
  std::fs::create_dir_all(&dir).unwrap();
  init_repo(&dir);
  commit_file(&dir, "notes.txt", b"hello\n", subject, date);
  dir
}

#[allow(dead_code)]
pub fn mgitlog() -> assert_cmd::Command {
  let mut cmd = assert_cmd::Command::cargo_bin("mgitlog").unwrap();
  // Keep host hook configuration out of the tests.
  cmd.env_remove("MGITLOG_BEFORE_CMD");
  cmd.env_remove("MGITLOG_AFTER_CMD");
  cmd
}
