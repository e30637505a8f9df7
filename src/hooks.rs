use std::path::Path;
use std::process::Command;
use std::time::Duration;

use anyhow::Result;

use crate::util::run_with_timeout;

pub const BEFORE_ENV: &str = "MGITLOG_BEFORE_CMD";
pub const AFTER_ENV: &str = "MGITLOG_AFTER_CMD";

const HOOK_TIMEOUT: Duration = Duration::from_secs(60);

/// Optional user-supplied commands bracketing each repository's log step.
/// Unset or empty hooks are no-ops: nothing is spawned.
#[derive(Debug, Clone, Default)]
pub struct Hooks {
  before: Option<String>,
  after: Option<String>,
}

fn non_empty(v: Option<String>) -> Option<String> {
  v.filter(|s| !s.trim().is_empty())
}

impl Hooks {
  pub fn new(before: Option<String>, after: Option<String>) -> Self {
    Hooks { before: non_empty(before), after: non_empty(after) }
  }

  pub fn from_env() -> Self {
    Hooks::new(std::env::var(BEFORE_ENV).ok(), std::env::var(AFTER_ENV).ok())
  }

  /// Returns false when the repository must be skipped (before-hook failed).
  pub fn run_before(&self, repo: &Path) -> bool {
    let Some(cmdline) = &self.before else {
      return true;
    };
    match run_hook(cmdline, repo) {
      Ok(true) => true,
      Ok(false) => {
        eprintln!("[hook] before-hook failed in {}, skipping repository", repo.display());
        false
      }
      Err(err) => {
        eprintln!("[hook] before-hook error in {}: {:#}, skipping repository", repo.display(), err);
        false
      }
    }
  }

  /// After-hook failures are warnings; output already produced stands.
  pub fn run_after(&self, repo: &Path) {
    let Some(cmdline) = &self.after else {
      return;
    };
    match run_hook(cmdline, repo) {
      Ok(true) => {}
      Ok(false) => eprintln!("[hook] after-hook failed in {}", repo.display()),
      Err(err) => eprintln!("[hook] after-hook error in {}: {:#}", repo.display(), err),
    }
  }
}

fn run_hook(cmdline: &str, repo: &Path) -> Result<bool> {
  let mut cmd = Command::new("sh");
  cmd.args(["-c", cmdline]).current_dir(repo);
  let out = run_with_timeout(&mut cmd, HOOK_TIMEOUT)?;
  Ok(out.success())
}
