use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use anyhow::{Result, bail};

use crate::daterange::DateWindow;
use crate::model::{CommitRecord, FileChange};
use crate::util::run_with_timeout;

pub const GIT_TIMEOUT: Duration = Duration::from_secs(30);

pub fn run_git(repo: &Path, args: &[String]) -> Result<String> {
  let mut cmd = Command::new("git");
  cmd.args(args).current_dir(repo);
  let out = run_with_timeout(&mut cmd, GIT_TIMEOUT)?;
  if out.success() {
    Ok(out.stdout)
  } else {
    bail!("git {:?} failed: {}", args, out.stderr.trim())
  }
}

fn window_args(window: &DateWindow) -> Vec<String> {
  vec![
    format!("--since={} 00:00:00", window.start),
    format!("--until={} 23:59:59", window.end),
  ]
}

fn author_args(authors: &[String]) -> Vec<String> {
  // Multiple --author flags OR together on the git side.
  authors.iter().map(|a| format!("--author={}", a)).collect()
}

/// Run one `git log` for the text report. `Ok(None)` means no commits fell
/// inside the window (the expected common case, not an error).
pub fn log_text(
  repo: &Path,
  window: &DateWindow,
  authors: &[String],
  extra: &[String],
) -> Result<Option<String>> {
  let mut args: Vec<String> = vec!["-c".into(), "log.showSignature=false".into(), "log".into()];
  args.extend(window_args(window));
  args.extend(author_args(authors));
  args.extend(extra.iter().cloned());

  let out = run_git(repo, &args)?;
  if out.trim().is_empty() { Ok(None) } else { Ok(Some(out)) }
}

pub fn rev_list(repo: &Path, window: &DateWindow, authors: &[String]) -> Result<Vec<String>> {
  let mut args: Vec<String> = vec![
    "-c".into(),
    "log.showSignature=false".into(),
    "rev-list".into(),
    "--date-order".into(),
    "--reverse".into(),
  ];
  args.extend(window_args(window));
  args.extend(author_args(authors));
  args.push("HEAD".into());

  let out = run_git(repo, &args)?;
  Ok(
    out
      .lines()
      .map(|l| l.trim())
      .filter(|s| !s.is_empty())
      .map(|s| s.to_string())
      .collect(),
  )
}

pub struct Meta {
  pub hash: String,
  pub author_name: String,
  pub author_email: String,
  pub author_date: String,
  pub subject: String,
  pub body: String,
}

pub(crate) fn parse_meta(out: &str) -> Meta {
  let parts: Vec<&str> = out.split('\u{0}').collect();
  let get = |i: usize| -> String { parts.get(i).unwrap_or(&"").to_string() };
  Meta {
    hash: get(0),
    author_name: get(1),
    author_email: get(2),
    author_date: get(3),
    subject: get(4),
    body: get(5).trim_end().to_string(),
  }
}

pub fn commit_meta(repo: &Path, sha: &str) -> Result<Meta> {
  let fmt = "%H%x00%an%x00%ae%x00%aI%x00%s%x00%b";
  let args: Vec<String> = vec![
    "show".into(),
    "--no-patch".into(),
    format!("--pretty=format:{}", fmt),
    sha.into(),
  ];
  let out = run_git(repo, &args)?;
  Ok(parse_meta(&out))
}

pub(crate) fn parse_numstat(out: &str) -> BTreeMap<String, FileChange> {
  let mut map = BTreeMap::new();
  for line in out.lines() {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() != 3 {
      continue;
    }
    // Binary files report "-" for both counts; coerce to zero.
    let additions = parts[0].parse::<i64>().unwrap_or(0);
    let deletions = parts[1].parse::<i64>().unwrap_or(0);
    map.insert(parts[2].to_string(), FileChange { additions, deletions });
  }
  map
}

pub fn commit_changes(repo: &Path, sha: &str) -> Result<BTreeMap<String, FileChange>> {
  let args: Vec<String> = vec![
    "show".into(),
    "--numstat".into(),
    "--format=".into(),
    "--no-color".into(),
    sha.into(),
  ];
  let out = run_git(repo, &args)?;
  Ok(parse_numstat(&out))
}

/// Collect structured commit records for the JSON report. An empty result
/// means no matches.
pub fn log_commits(
  repo: &Path,
  window: &DateWindow,
  authors: &[String],
  include_files: bool,
) -> Result<Vec<CommitRecord>> {
  let shas = rev_list(repo, window, authors)?;
  let mut commits: Vec<CommitRecord> = Vec::with_capacity(shas.len());
  for sha in shas.iter() {
    let meta = commit_meta(repo, sha)?;
    let changes = if include_files { Some(commit_changes(repo, sha)?) } else { None };
    commits.push(CommitRecord {
      commit: meta.hash,
      author: meta.author_name,
      author_email: meta.author_email,
      author_date: meta.author_date,
      subject: meta.subject,
      body: meta.body,
      changes,
    });
  }
  Ok(commits)
}

/// The locally configured identity, used as the default author filter.
pub fn local_identity() -> Option<String> {
  let mut cmd = Command::new("git");
  cmd.args(["config", "--get", "user.name"]);
  let out = run_with_timeout(&mut cmd, GIT_TIMEOUT).ok()?;
  if !out.success() {
    return None;
  }
  let name = out.stdout.trim().to_string();
  if name.is_empty() { None } else { Some(name) }
}
