// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, bounded subprocess execution, and man page rendering
// role: utilities/helpers
// inputs: Paths; std::process::Command; clap CommandFactory
// outputs: Canonicalized paths, captured subprocess output, man page text
// side_effects: run_with_timeout spawns subprocesses and kills them on expiry
// invariants:
// - run_with_timeout never blocks past its limit; an expired child is killed and reaped
// - stdout/stderr are drained concurrently, so a chatty child cannot deadlock on a full pipe
// errors: run_with_timeout surfaces spawn failures and timeouts with the command attached
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use wait_timeout::ChildExt;

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> String {
  let p = p.as_ref();
  let pb: PathBuf = match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  };
  pb.to_string_lossy().to_string()
}

#[derive(Debug)]
pub struct CommandOutput {
  pub status: ExitStatus,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.status.success()
  }
}

fn drain(mut pipe: impl Read + Send + 'static) -> std::thread::JoinHandle<Vec<u8>> {
  std::thread::spawn(move || {
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf);
    buf
  })
}

/// Run a command to completion, capturing stdout/stderr, killing it when the
/// limit elapses. A timeout is an `Err` like any other spawn failure; callers
/// decide whether it is fatal.
pub fn run_with_timeout(cmd: &mut Command, limit: Duration) -> Result<CommandOutput> {
  cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());

  let mut child = cmd.spawn().with_context(|| format!("spawning {:?}", cmd.get_program()))?;
  let out_pipe = child.stdout.take().context("child stdout not captured")?;
  let err_pipe = child.stderr.take().context("child stderr not captured")?;
  let out_thread = drain(out_pipe);
  let err_thread = drain(err_pipe);

  let status = match child.wait_timeout(limit)? {
    Some(status) => status,
    None => {
      let _ = child.kill();
      let _ = child.wait();
      bail!("{:?} timed out after {}s", cmd.get_program(), limit.as_secs());
    }
  };

  let stdout = out_thread.join().unwrap_or_default();
  let stderr = err_thread.join().unwrap_or_default();

  Ok(CommandOutput {
    status,
    stdout: String::from_utf8_lossy(&stdout).to_string(),
    stderr: String::from_utf8_lossy(&stderr).to_string(),
  })
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
