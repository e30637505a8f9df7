mod common;

use common::{
  FIXTURE_AUTHOR, IN_WINDOW_DATE, OUT_WINDOW_DATE, WINDOW_SPEC, commit_file, mgitlog,
  repo_with_commit, run,
};

fn parse(stdout: &[u8]) -> serde_json::Value {
  serde_json::from_slice(stdout).expect("stdout is valid JSON")
}

#[test]
fn zero_matching_repos_is_a_valid_empty_document() {
  let td = tempfile::TempDir::new().unwrap();
  repo_with_commit(td.path(), "alpha", OUT_WINDOW_DATE);

  let out = mgitlog()
    .args(["-r", td.path().to_str().unwrap(), "-a", FIXTURE_AUTHOR, "-d", WINDOW_SPEC, "--json"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v = parse(&out.stdout);
  assert_eq!(v["date_range"], WINDOW_SPEC);
  assert_eq!(v["authors"][0], FIXTURE_AUTHOR);
  assert_eq!(v["repositories"].as_array().unwrap().len(), 0);
}

#[test]
fn one_matching_repo_document() {
  let td = tempfile::TempDir::new().unwrap();
  let alpha = repo_with_commit(td.path(), "alpha", IN_WINDOW_DATE);
  repo_with_commit(td.path(), "beta", OUT_WINDOW_DATE);

  let out = mgitlog()
    .args(["-r", td.path().to_str().unwrap(), "-a", FIXTURE_AUTHOR, "-d", WINDOW_SPEC, "--json"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v = parse(&out.stdout);
  let repos = v["repositories"].as_array().unwrap();
  assert_eq!(repos.len(), 1);
  assert!(repos[0]["repository"].as_str().unwrap().ends_with("alpha"));
  assert_eq!(repos[0]["repository"], alpha.canonicalize().unwrap().to_str().unwrap());

  let commits = repos[0]["commits"].as_array().unwrap();
  assert_eq!(commits.len(), 1);
  let c = &commits[0];
  assert!(c["commit"].as_str().unwrap().len() >= 40);
  assert_eq!(c["author"], FIXTURE_AUTHOR);
  assert_eq!(c["author_email"], "fixture@example.com");
  assert!(c["author_date"].as_str().unwrap().starts_with("2025-08-12"));
  assert_eq!(c["subject"], "alpha work");
  assert!(c.get("changes").is_none());
}

#[test]
fn many_matching_repos_document() {
  let td = tempfile::TempDir::new().unwrap();
  repo_with_commit(td.path(), "alpha", IN_WINDOW_DATE);
  repo_with_commit(td.path(), "gamma", IN_WINDOW_DATE);
  repo_with_commit(td.path(), "zeta", IN_WINDOW_DATE);

  let out = mgitlog()
    .args(["-r", td.path().to_str().unwrap(), "-a", FIXTURE_AUTHOR, "-d", WINDOW_SPEC, "--json"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v = parse(&out.stdout);
  assert_eq!(v["repositories"].as_array().unwrap().len(), 3);
}

#[test]
fn files_flag_adds_per_file_changes() {
  let td = tempfile::TempDir::new().unwrap();
  let alpha = td.path().join("alpha");
  std::fs::create_dir_all(&alpha).unwrap();
  common::init_repo(&alpha);
  commit_file(&alpha, "src/lib.rs", b"fn one() {}\nfn two() {}\n", "add lib", IN_WINDOW_DATE);

  let out = mgitlog()
    .args([
      "-r",
      td.path().to_str().unwrap(),
      "-a",
      FIXTURE_AUTHOR,
      "-d",
      WINDOW_SPEC,
      "--json",
      "--files",
    ])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v = parse(&out.stdout);
  let changes = &v["repositories"][0]["commits"][0]["changes"];
  assert_eq!(changes["src/lib.rs"]["additions"], 2);
  assert_eq!(changes["src/lib.rs"]["deletions"], 0);
}

#[test]
fn binary_file_reports_zero_zero() {
  let td = tempfile::TempDir::new().unwrap();
  let alpha = td.path().join("alpha");
  std::fs::create_dir_all(&alpha).unwrap();
  common::init_repo(&alpha);
  commit_file(&alpha, "blob.bin", &[0u8, 159, 146, 150, 0, 7], "add blob", IN_WINDOW_DATE);

  let out = mgitlog()
    .args([
      "-r",
      td.path().to_str().unwrap(),
      "-a",
      FIXTURE_AUTHOR,
      "-d",
      WINDOW_SPEC,
      "--json",
      "--files",
    ])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v = parse(&out.stdout);
  let changes = &v["repositories"][0]["commits"][0]["changes"];
  assert_eq!(changes["blob.bin"]["additions"], 0);
  assert_eq!(changes["blob.bin"]["deletions"], 0);
}

#[test]
fn author_filter_uses_or_semantics() {
  let td = tempfile::TempDir::new().unwrap();
  repo_with_commit(td.path(), "alpha", IN_WINDOW_DATE);
  let other = td.path().join("other");
  std::fs::create_dir_all(&other).unwrap();
  common::init_repo(&other);
  run(&other, &["config", "user.name", "Other Dev"]);
  run(&other, &["config", "user.email", "other@example.com"]);
  commit_file(&other, "notes.txt", b"hi\n", "other work", IN_WINDOW_DATE);

  // Single author: only alpha matches.
  let out = mgitlog()
    .args(["-r", td.path().to_str().unwrap(), "-a", FIXTURE_AUTHOR, "-d", WINDOW_SPEC, "--json"])
    .output()
    .unwrap();
  assert_eq!(parse(&out.stdout)["repositories"].as_array().unwrap().len(), 1);

  // Two authors OR together.
  let out = mgitlog()
    .args([
      "-r",
      td.path().to_str().unwrap(),
      "-a",
      FIXTURE_AUTHOR,
      "-a",
      "Other Dev",
      "-d",
      WINDOW_SPEC,
      "--json",
    ])
    .output()
    .unwrap();
  let v = parse(&out.stdout);
  assert_eq!(v["repositories"].as_array().unwrap().len(), 2);
  assert_eq!(v["authors"].as_array().unwrap().len(), 2);
}

#[test]
fn json_with_parallel_falls_back_to_sequential() {
  let td = tempfile::TempDir::new().unwrap();
  repo_with_commit(td.path(), "alpha", IN_WINDOW_DATE);

  let out = mgitlog()
    .args([
      "-r",
      td.path().to_str().unwrap(),
      "-a",
      FIXTURE_AUTHOR,
      "-d",
      WINDOW_SPEC,
      "--json",
      "--parallel",
      "4",
    ])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v = parse(&out.stdout);
  assert_eq!(v["repositories"].as_array().unwrap().len(), 1);
  assert!(String::from_utf8_lossy(&out.stderr).contains("text mode only"));
}

#[test]
fn multi_commit_repo_lists_commits_oldest_first() {
  let td = tempfile::TempDir::new().unwrap();
  let alpha = td.path().join("alpha");
  std::fs::create_dir_all(&alpha).unwrap();
  common::init_repo(&alpha);
  commit_file(&alpha, "a.txt", b"a\n", "first change", "2025-08-10T10:00:00");
  commit_file(&alpha, "b.txt", b"b\n", "second change", "2025-08-11T10:00:00");

  let out = mgitlog()
    .args(["-r", td.path().to_str().unwrap(), "-a", FIXTURE_AUTHOR, "-d", WINDOW_SPEC, "--json"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v = parse(&out.stdout);
  let commits = v["repositories"][0]["commits"].as_array().unwrap();
  assert_eq!(commits.len(), 2);
  assert_eq!(commits[0]["subject"], "first change");
  assert_eq!(commits[1]["subject"], "second change");
}
