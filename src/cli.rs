use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mgitlog",
    version,
    about = "Aggregate git log across multiple repositories (text or JSON)",
    long_about = None
)]
pub struct Cli {
  /// Root directory to scan for repositories (repeatable; default: current dir)
  #[arg(short = 'r', long = "repo", value_name = "PATH")]
  pub repos: Vec<PathBuf>,

  /// Skip repositories whose path contains this substring (repeatable)
  #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
  pub excludes: Vec<String>,

  /// Date window: YYYY-MM-DD, FROM..TO, FROM.., today, yesterday, week, lastweek
  #[arg(short = 'd', long = "date", value_name = "SPEC", default_value = "today")]
  pub date: String,

  /// Only commits by this author (repeatable, OR semantics; default: git config user.name)
  #[arg(short = 'a', long = "author", value_name = "NAME")]
  pub authors: Vec<String>,

  /// Verbatim option string handed to git log in text mode
  #[arg(long, value_name = "STRING", allow_hyphen_values = true)]
  pub log: Option<String>,

  /// Emit one JSON document instead of text (overrides --log)
  #[arg(long)]
  pub json: bool,

  /// Include per-file addition/deletion counts
  #[arg(long)]
  pub files: bool,

  /// Query repositories in parallel (text mode only); optional worker count
  #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "4")]
  pub parallel: Option<usize>,

  /// How many directory levels below each root to scan
  #[arg(long, value_name = "N", default_value_t = 2)]
  pub scan_depth: usize,

  /// Suppress the date-range banner and per-repository headers
  #[arg(long)]
  pub no_header: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override "today" for date resolution (hidden; tests only)
  #[arg(long = "now-override", hide = true, value_name = "YYYY-MM-DD")]
  pub now_override: Option<String>,

  /// Extra arguments forwarded verbatim to git log, after `--`
  #[arg(last = true, value_name = "GIT_ARGS")]
  pub git_args: Vec<String>,
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub roots: Vec<PathBuf>,
  pub excludes: Vec<String>,
  pub date_spec: String,
  pub authors: Vec<String>,
  pub log_args: Vec<String>,
  pub json: bool,
  pub files: bool,
  pub headers: bool,
  pub parallel: Option<usize>,
  pub scan_depth: usize,
  pub today_override: Option<NaiveDate>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  if cli.json && cli.log.is_some() {
    eprintln!("[cli] --json overrides --log; ignoring --log");
  }

  // JSON assembly needs a single sequencing point; parallel stays text-only.
  let parallel = if cli.json && cli.parallel.is_some() {
    eprintln!("[cli] --parallel applies to text mode only; running sequentially");
    None
  } else {
    cli.parallel
  };
  if parallel == Some(0) {
    bail!("--parallel requires at least one worker");
  }

  let mut log_args: Vec<String> = Vec::new();
  if !cli.json {
    match &cli.log {
      Some(s) => log_args.extend(s.split_whitespace().map(String::from)),
      None if cli.git_args.is_empty() => log_args.push("--shortstat".into()),
      None => {}
    }
    if cli.files {
      log_args.push("--numstat".into());
    }
    log_args.extend(cli.git_args.iter().cloned());
  }

  let today_override = match cli.now_override.as_deref() {
    Some(raw) => Some(
      NaiveDate::parse_from_str(raw, "%Y-%m-%d").context("parsing --now-override")?,
    ),
    None => None,
  };

  Ok(EffectiveConfig {
    roots: cli.repos,
    excludes: cli.excludes,
    date_spec: cli.date,
    authors: cli.authors,
    log_args,
    json: cli.json,
    files: cli.files,
    headers: !cli.no_header,
    parallel,
    scan_depth: cli.scan_depth,
    today_override,
  })
}
