#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{
  fs,
  path::{Path, PathBuf},
};

use tempfile::tempdir;
use walkdir::WalkDir;
use wikidex::{commands, payload::load_session};
use wikidex_config::{Config, ExportConfig};
use wikidex_core::WikiSession;

const SAMPLE_PAYLOAD: &str = r##"{
  "github_url": "https://github.com/acme/handbook",
  "pages": {
    "Home Overview": "# Home\nWelcome.",
    "guide": {
      "setup": "# Setup\nRun it.\n## Install\nSteps.",
      "advanced": { "tuning": "# Tuning" }
    },
    "FAQ.md": "# FAQ"
  }
}"##;

fn sample_session(dir: &Path) -> WikiSession {
  let path = dir.join("wiki.json");
  fs::write(&path, SAMPLE_PAYLOAD).expect("Failed to write payload in test");
  load_session(&path).expect("Failed to load payload in test")
}

fn bundle_files(dir: &Path) -> Vec<String> {
  let mut files: Vec<String> = WalkDir::new(dir)
    .into_iter()
    .filter_map(Result::ok)
    .filter(|entry| entry.file_type().is_file())
    .map(|entry| {
      entry
        .path()
        .strip_prefix(dir)
        .expect("Entry outside bundle dir in test")
        .to_string_lossy()
        .into_owned()
    })
    .collect();
  files.sort();
  files
}

#[test]
fn test_export_writes_the_bundle_tree() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let session = sample_session(temp_dir.path());
  let bundle = temp_dir.path().join("bundle");

  let mut out = Vec::new();
  commands::export(&session, &Config::default(), Some(&bundle), false, &mut out)
    .expect("Export failed in test");

  assert_eq!(bundle_files(&bundle), [
    "FAQ.md",
    "Home Overview.md",
    "guide/advanced/tuning.md",
    "guide/setup.md",
  ]);

  // Page content lands byte for byte, no trailing-newline fixup
  let setup = fs::read_to_string(bundle.join("guide/setup.md"))
    .expect("Failed to read exported page in test");
  assert_eq!(setup, "# Setup\nRun it.\n## Install\nSteps.");

  let summary = String::from_utf8(out).expect("Non-UTF8 output in test");
  assert!(summary.contains("exported 4 pages to"));
}

#[test]
fn test_export_refuses_populated_directory_without_force() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let session = sample_session(temp_dir.path());
  let bundle = temp_dir.path().join("bundle");
  let config = Config::default();

  let mut out = Vec::new();
  commands::export(&session, &config, Some(&bundle), false, &mut out)
    .expect("First export failed in test");

  let refused =
    commands::export(&session, &config, Some(&bundle), false, &mut out);
  assert!(refused.is_err());
  assert!(
    refused
      .expect_err("Expected a refusal in test")
      .to_string()
      .contains("--force")
  );

  commands::export(&session, &config, Some(&bundle), true, &mut out)
    .expect("Forced export failed in test");
}

#[test]
fn test_export_force_can_come_from_config() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let session = sample_session(temp_dir.path());
  let bundle = temp_dir.path().join("bundle");

  let config = Config {
    export: ExportConfig { force: true },
    ..Config::default()
  };

  let mut out = Vec::new();
  commands::export(&session, &config, Some(&bundle), false, &mut out)
    .expect("First export failed in test");
  commands::export(&session, &config, Some(&bundle), false, &mut out)
    .expect("Config-forced export failed in test");
}

#[test]
fn test_export_destination_precedence() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let session = sample_session(temp_dir.path());
  let config = Config::default();

  // Explicit flag wins
  let flag = PathBuf::from("elsewhere");
  assert_eq!(
    commands::export_destination(&session, &config, Some(&flag)),
    flag
  );

  // Repository URL from the payload names the bundle
  assert_eq!(
    commands::export_destination(&session, &config, None),
    PathBuf::from("handbook-wiki")
  );

  // Configured project name overrides the payload
  let named = Config {
    project_name: Some("custom".to_string()),
    ..Config::default()
  };
  assert_eq!(
    commands::export_destination(&session, &named, None),
    PathBuf::from("custom-wiki")
  );

  // No project name anywhere falls back to the configured directory
  let payload = temp_dir.path().join("bare.json");
  fs::write(&payload, r##"{"pages": {"a": "# A"}}"##)
    .expect("Failed to write payload in test");
  let nameless =
    load_session(&payload).expect("Failed to load payload in test");
  assert_eq!(
    commands::export_destination(&nameless, &config, None),
    PathBuf::from("wiki-export")
  );
}

#[test]
fn test_tree_renders_the_hierarchy() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let session = sample_session(temp_dir.path());

  let mut out = Vec::new();
  commands::tree(&session, None, &mut out).expect("Tree failed in test");

  let rendered = String::from_utf8(out).expect("Non-UTF8 output in test");
  let expected = concat!(
    "handbook\n",
    "├── Home Overview\n",
    "├── guide\n",
    "│   ├── setup\n",
    "│   └── advanced\n",
    "│       └── tuning\n",
    "└── FAQ.md\n",
  );
  assert_eq!(rendered, expected);
}

#[test]
fn test_tree_filter_keeps_matching_subtrees() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let session = sample_session(temp_dir.path());

  let mut out = Vec::new();
  commands::tree(&session, Some("setup"), &mut out)
    .expect("Tree failed in test");
  let rendered = String::from_utf8(out).expect("Non-UTF8 output in test");
  let expected = concat!(
    "handbook\n",
    "└── guide\n",
    "    └── setup\n",
  );
  assert_eq!(rendered, expected);

  // A matching section name keeps everything underneath it
  let mut out = Vec::new();
  commands::tree(&session, Some("guide"), &mut out)
    .expect("Tree failed in test");
  let rendered = String::from_utf8(out).expect("Non-UTF8 output in test");
  assert!(rendered.contains("tuning"));

  let mut out = Vec::new();
  commands::tree(&session, Some("zzz"), &mut out)
    .expect("Tree failed in test");
  let rendered = String::from_utf8(out).expect("Non-UTF8 output in test");
  assert_eq!(rendered, "handbook\n(no pages match \"zzz\")\n");
}
