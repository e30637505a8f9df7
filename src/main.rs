use anyhow::Result;
use clap::Parser;

mod aggregate;
mod cli;
mod daterange;
mod gitio;
mod hooks;
mod model;
mod scan;
mod util;

use crate::cli::{Cli, normalize};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let mut cfg = normalize(cli)?;

  // Phase 2: resolve the date window and the repository set
  let today = cfg.today_override.unwrap_or_else(|| chrono::Local::now().date_naive());
  let window = daterange::resolve(&cfg.date_spec, today)?;
  let repos = scan::scan(&cfg.roots, &cfg.excludes, cfg.scan_depth)?;

  // Default author filter: the locally configured identity. When none is
  // configured the run is unfiltered.
  if cfg.authors.is_empty() {
    if let Some(name) = gitio::local_identity() {
      cfg.authors.push(name);
    }
  }

  // Phase 3: aggregate per-repository results into one stream
  let hooks = hooks::Hooks::from_env();
  let mut out = std::io::stdout();
  aggregate::run(&cfg, &window, &repos, &hooks, &mut out)
}
