// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drive the per-repository log invocations and merge results into the text or JSON report
// role: aggregation/orchestrator
// inputs: EffectiveConfig, DateWindow, discovered RepoRefs, Hooks, an output writer
// outputs: rendered report on the writer; warnings on stderr
// side_effects: runs git and hook subprocesses per repository
// invariants:
// - a repository with no matches, a skipped repository, or a failed one contributes no output at all
// - text blocks are atomic: under parallel execution two workers' lines never interleave
// - the JSON document is built whole and serialized once; it parses for zero, one, or many repositories
// errors: per-repository failures downgrade to warnings; only writer/pool failures propagate
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::cli::EffectiveConfig;
use crate::daterange::DateWindow;
use crate::gitio;
use crate::hooks::Hooks;
use crate::model::{RepoActivity, Report};
use crate::scan::RepoRef;

const RULE_WIDTH: usize = 60;
const NO_COMMITS_MSG: &str = "No commits found.";

pub fn run(
  cfg: &EffectiveConfig,
  window: &DateWindow,
  repos: &[RepoRef],
  hooks: &Hooks,
  out: &mut (impl Write + Send),
) -> Result<()> {
  if cfg.json {
    return run_json(cfg, window, repos, hooks, out);
  }

  if cfg.headers {
    writeln!(out, "Date range: {}", window.label())?;
  }
  match cfg.parallel {
    Some(workers) => run_text_parallel(cfg, window, repos, hooks, out, workers),
    None => run_text_sequential(cfg, window, repos, hooks, out),
  }
}

/// Separator and fallback-message bookkeeping for the text report.
#[derive(Debug, Default)]
struct TextState {
  found_any: bool,
  last_had_output: bool,
}

impl TextState {
  fn emit(&mut self, out: &mut impl Write, block: &str) -> std::io::Result<()> {
    if self.last_had_output {
      writeln!(out)?;
    }
    out.write_all(block.as_bytes())?;
    self.found_any = true;
    self.last_had_output = true;
    Ok(())
  }

  fn skip(&mut self) {
    self.last_had_output = false;
  }
}

fn render_block(repo: &RepoRef, body: &str, headers: bool) -> String {
  let mut block = String::new();
  if headers {
    block.push_str(&format!("{} [{}]\n", repo.display_name, repo.path.display()));
    block.push_str(&"-".repeat(RULE_WIDTH));
    block.push('\n');
  }
  block.push_str(body);
  if !block.ends_with('\n') {
    block.push('\n');
  }
  // Trailing blank line closes the block.
  block.push('\n');
  block
}

fn run_text_sequential(
  cfg: &EffectiveConfig,
  window: &DateWindow,
  repos: &[RepoRef],
  hooks: &Hooks,
  out: &mut impl Write,
) -> Result<()> {
  let mut state = TextState::default();
  for repo in repos {
    if !hooks.run_before(&repo.path) {
      state.skip();
      continue;
    }
    match gitio::log_text(&repo.path, window, &cfg.authors, &cfg.log_args) {
      Ok(Some(body)) => state.emit(out, &render_block(repo, &body, cfg.headers))?,
      Ok(None) => state.skip(),
      Err(err) => {
        eprintln!("[git] {}: {:#}", repo.path.display(), err);
        state.skip();
      }
    }
    hooks.run_after(&repo.path);
  }

  if !state.found_any {
    writeln!(out, "{}", NO_COMMITS_MSG)?;
  }
  Ok(())
}

struct Sink<'a, W: Write> {
  out: &'a mut W,
  wrote_any: bool,
}

fn run_text_parallel(
  cfg: &EffectiveConfig,
  window: &DateWindow,
  repos: &[RepoRef],
  hooks: &Hooks,
  out: &mut (impl Write + Send),
  workers: usize,
) -> Result<()> {
  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(workers)
    .build()
    .context("building worker pool")?;

  let sink = Mutex::new(Sink { out, wrote_any: false });

  pool.install(|| {
    repos.par_iter().for_each(|repo| {
      if !hooks.run_before(&repo.path) {
        return;
      }
      // Render the whole block off to the side; the lock is only held to
      // flush it, so blocks land atomically in completion order.
      let rendered = match gitio::log_text(&repo.path, window, &cfg.authors, &cfg.log_args) {
        Ok(Some(body)) => Some(render_block(repo, &body, cfg.headers)),
        Ok(None) => None,
        Err(err) => {
          eprintln!("[git] {}: {:#}", repo.path.display(), err);
          None
        }
      };
      if let Some(block) = rendered {
        let mut sink = sink.lock().unwrap_or_else(|e| e.into_inner());
        let mut write_result = Ok(());
        if sink.wrote_any {
          write_result = writeln!(sink.out);
        }
        if write_result.is_ok() {
          write_result = sink.out.write_all(block.as_bytes());
        }
        if let Err(err) = write_result {
          eprintln!("[output] write failed: {}", err);
        }
        sink.wrote_any = true;
      }
      hooks.run_after(&repo.path);
    });
  });

  let sink = sink.into_inner().unwrap_or_else(|e| e.into_inner());
  if !sink.wrote_any {
    writeln!(sink.out, "{}", NO_COMMITS_MSG)?;
  }
  Ok(())
}

fn run_json(
  cfg: &EffectiveConfig,
  window: &DateWindow,
  repos: &[RepoRef],
  hooks: &Hooks,
  out: &mut impl Write,
) -> Result<()> {
  let mut report = Report {
    date_range: window.label(),
    authors: cfg.authors.clone(),
    repositories: Vec::new(),
  };

  for repo in repos {
    if !hooks.run_before(&repo.path) {
      continue;
    }
    match gitio::log_commits(&repo.path, window, &cfg.authors, cfg.files) {
      Ok(commits) if commits.is_empty() => {}
      Ok(commits) => report.repositories.push(RepoActivity {
        repository: repo.path.to_string_lossy().to_string(),
        commits,
      }),
      Err(err) => eprintln!("[git] {}: {:#}", repo.path.display(), err),
    }
    hooks.run_after(&repo.path);
  }

  writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
  Ok(())
}
