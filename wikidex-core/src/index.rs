//! Flat page index built from a nested payload.
//!
//! The index is the source of truth for navigation: its insertion order
//! (a depth-first walk of the payload, following payload field order) is
//! the canonical page order used for the start page, next-page
//! navigation, link-resolution tie breaking, and export.

use indexmap::IndexMap;
use serde_json::Value;

use crate::{
  error::{WikiError, WikiResult},
  path::normalize,
  payload::{coerce, is_content_leaf, select_pages_root},
};

/// Ordered map from normalized page path to markdown text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiIndex {
  pages: IndexMap<String, String>,
}

impl WikiIndex {
  /// Flatten a pages root into an index.
  ///
  /// Descends depth-first, extending the path with `/`-joined field
  /// names. `null` nodes are skipped; primitives, arrays, and content
  /// leaves are recorded at their accumulated path (when that path is
  /// non-empty) and end the descent. Content fields take priority over
  /// sibling nesting.
  #[must_use]
  pub fn from_value(root: &Value) -> Self {
    let mut pages = IndexMap::new();
    flatten_into(&mut pages, root, "");
    Self { pages }
  }

  /// Flatten a whole payload, unwrapping its envelope first.
  #[must_use]
  pub fn from_payload(payload: &Value) -> Self {
    Self::from_value(select_pages_root(payload))
  }

  #[must_use]
  pub fn get(&self, path: &str) -> Option<&str> {
    self.pages.get(path).map(String::as_str)
  }

  /// Like [`WikiIndex::get`], but a missing page is a typed error.
  ///
  /// # Errors
  ///
  /// Returns [`WikiError::PageNotFound`] when `path` is not in the index.
  pub fn page(&self, path: &str) -> WikiResult<&str> {
    self
      .get(path)
      .ok_or_else(|| WikiError::PageNotFound(path.to_string()))
  }

  #[must_use]
  pub fn contains(&self, path: &str) -> bool {
    self.pages.contains_key(path)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.pages.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.pages.is_empty()
  }

  /// Guard for commands that need at least one page.
  ///
  /// # Errors
  ///
  /// Returns [`WikiError::EmptyIndex`] when nothing flattened to a page.
  pub fn require_pages(&self) -> WikiResult<()> {
    if self.is_empty() {
      Err(WikiError::EmptyIndex)
    } else {
      Ok(())
    }
  }

  /// Page paths in traversal order.
  pub fn paths(&self) -> impl Iterator<Item = &str> {
    self.pages.keys().map(String::as_str)
  }

  /// `(path, markdown)` pairs in traversal order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .pages
      .iter()
      .map(|(path, content)| (path.as_str(), content.as_str()))
  }

  /// The page a freshly loaded wiki should open on.
  ///
  /// The first path whose lowercased form ends with `overview` wins,
  /// otherwise the first page in traversal order, otherwise `None`.
  #[must_use]
  pub fn initial_selection(&self) -> Option<&str> {
    self
      .paths()
      .find(|path| path.to_lowercase().ends_with("overview"))
      .or_else(|| self.paths().next())
  }

  /// Zero-based position of a page in traversal order.
  #[must_use]
  pub fn position(&self, path: &str) -> Option<usize> {
    self.pages.get_index_of(path)
  }

  /// The page after `path` in traversal order, `None` at the end or when
  /// `path` is absent.
  #[must_use]
  pub fn next_after(&self, path: &str) -> Option<&str> {
    let idx = self.pages.get_index_of(path)?;
    self.pages.get_index(idx + 1).map(|(next, _)| next.as_str())
  }
}

fn flatten_into(
  pages: &mut IndexMap<String, String>,
  node: &Value,
  base: &str,
) {
  match node {
    Value::Null => {},
    Value::Object(map) if !is_content_leaf(map) => {
      for (key, child) in map {
        let child_base = if base.is_empty() {
          key.clone()
        } else {
          format!("{base}/{key}")
        };
        flatten_into(pages, child, &child_base);
      }
    },
    leaf => {
      let page_path = normalize(base);
      if !page_path.is_empty() {
        pages.insert(page_path, coerce(leaf));
      }
    },
  }
}
