//! Sidebar tree assembly and filtering.

use indexmap::IndexMap;

use crate::{index::WikiIndex, path::normalize};

/// One entry in the sidebar hierarchy.
///
/// Containers win on collision: when one page path is a proper prefix of
/// another, the shared name is a [`SidebarNode::Section`] even if it was
/// first seen as a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarNode {
  /// A page entry.
  Page,
  /// A named container with ordered children.
  Section(IndexMap<String, SidebarNode>),
}

impl SidebarNode {
  /// Build the sidebar tree for an index.
  ///
  /// Paths are split on `/` with empty segments discarded; intermediate
  /// segments become sections, the terminal segment becomes a page unless
  /// something already lives there. The result depends only on the index
  /// contents and order.
  #[must_use]
  pub fn build(index: &WikiIndex) -> Self {
    let mut root = IndexMap::new();
    for path in index.paths() {
      let normalized = normalize(path);
      let segments: Vec<&str> =
        normalized.split('/').filter(|s| !s.is_empty()).collect();
      insert_segments(&mut root, &segments);
    }
    Self::Section(root)
  }

  #[must_use]
  pub const fn is_page(&self) -> bool {
    matches!(self, Self::Page)
  }

  /// Ordered children of a section, `None` for a page.
  #[must_use]
  pub const fn children(&self) -> Option<&IndexMap<String, Self>> {
    match self {
      Self::Page => None,
      Self::Section(children) => Some(children),
    }
  }

  /// Paths to every page in the tree, `/`-joined, depth-first.
  ///
  /// For a tree built from an index in which no path is a proper prefix
  /// of another, this is exactly the index's key set.
  #[must_use]
  pub fn leaf_paths(&self) -> Vec<String> {
    let mut paths = Vec::new();
    if let Self::Section(children) = self {
      collect_leaves(children, "", &mut paths);
    }
    paths
  }

  /// Retain entries matching a search term.
  ///
  /// A blank or whitespace-only term returns a tree equal to the input.
  /// Otherwise the match is a case-insensitive substring test on the
  /// entry name: a matching entry keeps its entire subtree, a
  /// non-matching section is recursed into and kept only when something
  /// below it survived, and a non-matching page is dropped. The input is
  /// never mutated.
  #[must_use]
  pub fn filter(&self, term: &str) -> Self {
    if term.trim().is_empty() {
      return self.clone();
    }

    let needle = term.to_lowercase();
    match self {
      Self::Page => Self::Page,
      Self::Section(children) => {
        Self::Section(filter_children(children, &needle))
      },
    }
  }
}

fn insert_segments(
  children: &mut IndexMap<String, SidebarNode>,
  segments: &[&str],
) {
  let [head, rest @ ..] = segments else {
    return;
  };

  if rest.is_empty() {
    children.entry((*head).to_string()).or_insert(SidebarNode::Page);
    return;
  }

  let entry = children
    .entry((*head).to_string())
    .or_insert_with(|| SidebarNode::Section(IndexMap::new()));
  if entry.is_page() {
    // A deeper path converts what looked like a page into a section
    *entry = SidebarNode::Section(IndexMap::new());
  }
  if let SidebarNode::Section(grandchildren) = entry {
    insert_segments(grandchildren, rest);
  }
}

fn collect_leaves(
  children: &IndexMap<String, SidebarNode>,
  prefix: &str,
  out: &mut Vec<String>,
) {
  for (name, node) in children {
    let path = if prefix.is_empty() {
      name.clone()
    } else {
      format!("{prefix}/{name}")
    };
    match node {
      SidebarNode::Page => out.push(path),
      SidebarNode::Section(grandchildren) => {
        collect_leaves(grandchildren, &path, out);
      },
    }
  }
}

fn filter_children(
  children: &IndexMap<String, SidebarNode>,
  needle: &str,
) -> IndexMap<String, SidebarNode> {
  let mut kept = IndexMap::new();
  for (name, node) in children {
    if name.to_lowercase().contains(needle) {
      kept.insert(name.clone(), node.clone());
      continue;
    }
    if let SidebarNode::Section(grandchildren) = node {
      let filtered = filter_children(grandchildren, needle);
      if !filtered.is_empty() {
        kept.insert(name.clone(), SidebarNode::Section(filtered));
      }
    }
  }
  kept
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use serde_json::json;

  use super::*;
  use crate::index::WikiIndex;

  fn tree_from(value: serde_json::Value) -> SidebarNode {
    SidebarNode::build(&WikiIndex::from_value(&value))
  }

  #[test]
  fn build_nests_by_segment() {
    let tree = tree_from(json!({
      "Overview": "o",
      "guide": {"intro": "i", "setup": "s"}
    }));

    let children = tree.children().expect("root is a section");
    assert!(children.get("Overview").is_some_and(SidebarNode::is_page));

    let guide = children
      .get("guide")
      .and_then(SidebarNode::children)
      .expect("guide is a section");
    assert_eq!(guide.len(), 2);
    assert!(guide.get("intro").is_some_and(SidebarNode::is_page));
  }

  #[test]
  fn container_wins_collisions_in_either_order() {
    let leaf_first = tree_from(json!({"a": "x", "a/b": "y"}));
    let container_first = tree_from(json!({"a/b": "y", "a": "x"}));

    for tree in [&leaf_first, &container_first] {
      let a = tree
        .children()
        .and_then(|children| children.get("a"))
        .expect("a exists");
      let inner = a.children().expect("a is a section");
      assert!(inner.get("b").is_some_and(SidebarNode::is_page));
    }
  }

  #[test]
  fn leaf_paths_round_trip_the_index() {
    let index = WikiIndex::from_value(&json!({
      "Overview": "o",
      "guide": {"intro": "i", "deep": {"nested": "n"}},
      "api": "a"
    }));
    let tree = SidebarNode::build(&index);

    let mut leaves = tree.leaf_paths();
    let mut keys: Vec<String> = index.paths().map(str::to_string).collect();
    leaves.sort();
    keys.sort();
    assert_eq!(leaves, keys);
  }

  #[test]
  fn filter_blank_term_returns_equal_tree() {
    let tree = tree_from(json!({"a": "x", "b": {"c": "y"}}));
    assert_eq!(tree.filter(""), tree);
    assert_eq!(tree.filter("   "), tree);
  }

  #[test]
  fn filter_matches_names_case_insensitively() {
    let tree = tree_from(json!({
      "guide": {"Setup": "s", "intro": "i"},
      "api": {"auth": "a"}
    }));

    let filtered = tree.filter("setup");
    let children = filtered.children().expect("section");
    assert_eq!(children.len(), 1);
    let guide = children
      .get("guide")
      .and_then(SidebarNode::children)
      .expect("guide kept as section");
    assert_eq!(guide.len(), 1);
    assert!(guide.contains_key("Setup"));
  }

  #[test]
  fn filter_keeps_whole_subtree_of_matching_name() {
    let tree = tree_from(json!({
      "guide": {"Setup": "s", "intro": "i"}
    }));

    let filtered = tree.filter("guide");
    let guide = filtered
      .children()
      .and_then(|children| children.get("guide"))
      .and_then(SidebarNode::children)
      .expect("guide kept");
    // Name match retains children unfiltered
    assert_eq!(guide.len(), 2);
  }

  #[test]
  fn filter_matches_entry_names_not_joined_paths() {
    let tree = tree_from(json!({
      "guide": {"Setup": "s"}
    }));

    // Names are tested one at a time, so a slashed term never matches
    let filtered = tree.filter("guide/set");
    assert!(filtered.children().is_some_and(IndexMap::is_empty));
  }

  #[test]
  fn filter_drops_empty_sections() {
    let tree = tree_from(json!({
      "guide": {"intro": "i"},
      "api": {"auth": "a"}
    }));

    let filtered = tree.filter("auth");
    let children = filtered.children().expect("section");
    assert!(!children.contains_key("guide"));
    assert!(children.contains_key("api"));
  }
}
