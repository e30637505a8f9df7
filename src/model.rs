// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the JSON report model (commits, per-file changes, per-repository activity)
// role: model/types
// outputs: Serializable structs with stable field names
// invariants: the Report document is valid JSON for zero, one, or many repositories; `changes` appears only in detailed-file mode
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileChange {
  pub additions: i64,
  pub deletions: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CommitRecord {
  pub commit: String,
  pub author: String,
  pub author_email: String,
  pub author_date: String,
  pub subject: String,
  pub body: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub changes: Option<BTreeMap<String, FileChange>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepoActivity {
  pub repository: String,
  pub commits: Vec<CommitRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
  pub date_range: String,
  pub authors: Vec<String>,
  pub repositories: Vec<RepoActivity>,
}
