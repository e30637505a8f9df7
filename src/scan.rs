// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Discover git repositories under the configured roots, honoring excludes and scan depth
// role: discovery/scanner
// inputs: root paths, substring exclude patterns, max scan depth
// outputs: Vec<RepoRef> in filesystem enumeration order (not sorted)
// side_effects: reads directories; warns to stderr for unusable roots
// invariants:
// - a root that is itself a repository yields exactly itself; no descent into it
// - hidden directories and dependency caches are never descended into
// - a missing root is a warning, never a process failure; zero usable roots fall back to the cwd
// errors: only an unobtainable current directory is fatal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::canonicalize_lossy;

/// One discovered repository: absolute path plus the upper-cased final path
/// segment used as its display name in text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
  pub path: PathBuf,
  pub display_name: String,
}

impl RepoRef {
  fn new(path: &Path) -> Self {
    let display_name = path
      .file_name()
      .and_then(|n| n.to_str())
      .unwrap_or("repo")
      .to_uppercase();
    RepoRef { path: PathBuf::from(canonicalize_lossy(path)), display_name }
  }
}

const SKIP_SCAN_DIRS: &[&str] = &[
  "node_modules",
  "vendor",
  "target",
  "dist",
  "build",
  "__pycache__",
  ".npm",
  ".yarn",
];

fn is_repo(path: &Path) -> bool {
  path.join(".git").exists()
}

fn is_excluded(path: &Path, excludes: &[String]) -> bool {
  let text = path.to_string_lossy();
  excludes.iter().any(|pat| !pat.is_empty() && text.contains(pat.as_str()))
}

fn scan_children(dir: &Path, excludes: &[String], depth: usize, max_depth: usize, found: &mut Vec<RepoRef>) {
  if depth > max_depth {
    return;
  }
  let Ok(entries) = std::fs::read_dir(dir) else {
    return;
  };
  for entry in entries.flatten() {
    let path = entry.path();
    if !path.is_dir() {
      continue;
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name.starts_with('.') || SKIP_SCAN_DIRS.contains(&name) {
      continue;
    }
    if is_repo(&path) {
      if !is_excluded(&path, excludes) {
        found.push(RepoRef::new(&path));
      }
      // No descent into a found repository.
    } else {
      scan_children(&path, excludes, depth + 1, max_depth, found);
    }
  }
}

/// Scan the given roots for repositories. Roots that do not exist are warned
/// about and skipped; when none survive, the current working directory is
/// scanned instead.
pub fn scan(roots: &[PathBuf], excludes: &[String], max_depth: usize) -> Result<Vec<RepoRef>> {
  let mut usable: Vec<PathBuf> = Vec::new();
  for root in roots {
    if root.is_dir() {
      usable.push(root.clone());
    } else {
      eprintln!("[scan] root not found, skipping: {}", root.display());
    }
  }

  if usable.is_empty() {
    let cwd = std::env::current_dir().context("determining current directory")?;
    if !roots.is_empty() {
      eprintln!("[scan] no usable roots, falling back to {}", cwd.display());
    }
    usable.push(cwd);
  }

  let mut found: Vec<RepoRef> = Vec::new();
  for root in &usable {
    if is_repo(root) {
      if !is_excluded(root, excludes) {
        found.push(RepoRef::new(root));
      }
    } else {
      scan_children(root, excludes, 1, max_depth, &mut found);
    }
  }
  Ok(found)
}
