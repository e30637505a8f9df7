use anyhow::{Result, bail};
use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

// Date-window resolution lives here to keep main focused.

static SINGLE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static CLOSED_RANGE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})\.\.(\d{4}-\d{2}-\d{2})$").unwrap());
static OPEN_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})\.\.$").unwrap());

/// Inclusive `[start, end]` calendar window. Endpoints are kept as strings:
/// unrecognized bare tokens flow through to git's own date parsing verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
  pub start: String,
  pub end: String,
}

impl DateWindow {
  fn days(start: NaiveDate, end: NaiveDate) -> Self {
    DateWindow { start: iso_date(start), end: iso_date(end) }
  }

  fn single_day(d: NaiveDate) -> Self {
    Self::days(d, d)
  }

  pub fn label(&self) -> String {
    format!("{}..{}", self.start, self.end)
  }
}

fn iso_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

fn start_of_week(d: NaiveDate) -> NaiveDate {
  let weekday = d.weekday().num_days_from_monday() as i64;
  d - Duration::days(weekday)
}

fn this_week(today: NaiveDate) -> DateWindow {
  let monday = start_of_week(today);
  DateWindow::days(monday, monday + Duration::days(6))
}

fn last_week(today: NaiveDate) -> DateWindow {
  // Shift both endpoints of the current Monday-Sunday week back 7 days;
  // the week is never re-anchored to "today" within the week.
  let monday = start_of_week(today) - Duration::days(7);
  DateWindow::days(monday, monday + Duration::days(6))
}

/// Resolve a date specification to a window.
///
/// Grammar, in priority order: empty (today), a single `YYYY-MM-DD`, a closed
/// `A..B` range (verbatim, no ordering check), an open `A..` range ending
/// today, one of the symbolic tokens, and finally any other bare token passed
/// through unresolved as `[spec, spec]`. Only malformed `..` expressions are
/// rejected.
pub fn resolve(spec: &str, today: NaiveDate) -> Result<DateWindow> {
  let spec = spec.trim();

  if spec.is_empty() {
    return Ok(DateWindow::single_day(today));
  }

  if SINGLE_DATE.is_match(spec) {
    return Ok(DateWindow { start: spec.to_string(), end: spec.to_string() });
  }

  if let Some(caps) = CLOSED_RANGE.captures(spec) {
    return Ok(DateWindow { start: caps[1].to_string(), end: caps[2].to_string() });
  }

  if let Some(caps) = OPEN_RANGE.captures(spec) {
    return Ok(DateWindow { start: caps[1].to_string(), end: iso_date(today) });
  }

  match spec {
    "today" => return Ok(DateWindow::single_day(today)),
    "yesterday" => return Ok(DateWindow::single_day(today - Duration::days(1))),
    "week" => return Ok(this_week(today)),
    "lastweek" => return Ok(last_week(today)),
    _ => {}
  }

  if spec.contains("..") {
    bail!("invalid date spec {:?}: expected YYYY-MM-DD..YYYY-MM-DD or YYYY-MM-DD..", spec);
  }

  // Unrecognized bare token: pass through as a literal date string.
  Ok(DateWindow { start: spec.to_string(), end: spec.to_string() })
}
