#![allow(clippy::expect_used, reason = "Fine in tests")]
use serde_json::json;
use wikidex_core::{ExportPlan, SidebarNode, WikiIndex, coerce};

/// A payload with every body shape the decoder recognizes.
fn mixed_payload() -> serde_json::Value {
  json!({
    "pages": {
      "Overview": "# Welcome\n",
      "guide": {
        "intro": {"content": "# Intro"},
        "setup": {"data": {"markdown": "# Setup"}},
        "fragments": ["line one", "line two"],
        "numbers": 42
      },
      "empty-ish": {"content": ""},
      "dropped": null
    }
  })
}

#[test]
fn pipeline_flattens_every_recognized_shape() {
  let index = WikiIndex::from_payload(&mixed_payload());

  let paths: Vec<&str> = index.paths().collect();
  assert_eq!(paths, [
    "Overview",
    "guide/intro",
    "guide/setup",
    "guide/fragments",
    "guide/numbers",
    "empty-ish",
  ]);

  assert_eq!(index.get("guide/intro"), Some("# Intro"));
  assert_eq!(index.get("guide/setup"), Some("# Setup"));
  assert_eq!(index.get("guide/fragments"), Some("line one\nline two"));
  assert_eq!(index.get("guide/numbers"), Some("42"));
  assert_eq!(index.get("empty-ish"), Some(""));
}

#[test]
fn coercion_is_total_over_hostile_shapes() {
  for value in [
    json!(null),
    json!({}),
    json!({"surprise": {"deeply": ["nested"]}}),
    json!({"data": 7}),
    json!([[], [[]], null]),
  ] {
    // Whatever the shape, coercion yields a string and never panics
    let _text: String = coerce(&value);
  }

  assert_eq!(coerce(&json!({"data": {"content": null}})), "");
  assert_eq!(coerce(&json!([null, null])), "\n");
}

#[test]
fn sidebar_round_trips_the_flat_index() {
  let index = WikiIndex::from_payload(&mixed_payload());
  let tree = SidebarNode::build(&index);

  let mut leaves = tree.leaf_paths();
  let mut keys: Vec<String> = index.paths().map(str::to_string).collect();
  leaves.sort();
  keys.sort();
  assert_eq!(leaves, keys);
}

#[test]
fn filtering_never_leaves_empty_sections() {
  let index = WikiIndex::from_payload(&mixed_payload());
  let tree = SidebarNode::build(&index);

  let filtered = tree.filter("intro");
  let children = filtered.children().expect("root section");
  assert_eq!(children.len(), 1);

  let guide = children
    .get("guide")
    .and_then(SidebarNode::children)
    .expect("guide survives with a match inside");
  assert_eq!(guide.len(), 1);
  assert!(guide.contains_key("intro"));
}

#[test]
fn export_plan_matches_the_index_exactly() {
  let index = WikiIndex::from_payload(&json!({
    "pages": {
      "Overview.md": "# Already suffixed",
      "guide": {"setup": "# Setup\n"}
    }
  }));
  let plan = ExportPlan::new(&index);

  let files: Vec<&str> =
    plan.entries().iter().map(|e| e.file.as_str()).collect();
  assert_eq!(files, ["Overview.md", "guide/setup.md"]);
  assert_eq!(plan.entries()[0].content, "# Already suffixed");
  assert_eq!(plan.entries()[1].content, "# Setup\n");
}

#[test]
fn exported_bundle_lands_on_disk_intact() {
  let index = WikiIndex::from_payload(&mixed_payload());
  let plan = ExportPlan::new(&index);

  let dir = tempfile::tempdir().expect("tempdir");
  plan.write_to(dir.path()).expect("bundle written");

  let setup = std::fs::read_to_string(dir.path().join("guide/setup.md"))
    .expect("nested file exists");
  assert_eq!(setup, "# Setup");

  let empty = std::fs::read_to_string(dir.path().join("empty-ish.md"))
    .expect("empty page still exported");
  assert_eq!(empty, "");
}
