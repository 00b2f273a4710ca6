//! Heading outlines scanned straight from markdown text.
//!
//! The scan is deliberately line-oriented rather than a full markdown
//! parse: page anchors in the wild were produced by exactly this rule,
//! so the ids must come out character-for-character identical. Setext
//! headings and headings inside fenced code blocks are out of scope.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::util::never_matching_regex;

/// ATX heading: one to six hashes, at least one whitespace, then text.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(#{1,6})\s+(.*)").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile HEADING_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
});

/// Runs of characters outside the ASCII word class `[A-Za-z0-9_]`.
static NON_WORD_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"[^[:word:]]+").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile NON_WORD_RUN_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
});

/// One ATX heading occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
  pub level: u8,
  pub text:  String,
  pub id:    String,
  pub line:  usize,
}

/// Anchor id for a heading text.
///
/// Lowercases, then replaces every run of characters outside
/// `[A-Za-z0-9_]` with a single hyphen. Runs at the boundaries still
/// become hyphens, and colliding ids between headings are preserved
/// as-is, so an id is a stable function of the text alone.
#[must_use]
pub fn heading_id(text: &str) -> String {
  NON_WORD_RUN_RE
    .replace_all(&text.to_lowercase(), "-")
    .into_owned()
}

/// Lazy scanner over the ATX headings of a markdown document.
///
/// Yields headings in source order; rescanning the same text yields the
/// same sequence.
pub struct Headings<'a> {
  lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl Iterator for Headings<'_> {
  type Item = Heading;

  fn next(&mut self) -> Option<Self::Item> {
    for (line, candidate) in self.lines.by_ref() {
      if let Some(caps) = HEADING_RE.captures(candidate) {
        let hashes = caps.get(1).map_or("", |m| m.as_str());
        let text = caps.get(2).map_or("", |m| m.as_str());
        return Some(Heading {
          level: u8::try_from(hashes.len()).unwrap_or(6),
          text:  text.to_string(),
          id:    heading_id(text),
          line,
        });
      }
    }
    None
  }
}

/// Scan `markdown` for ATX headings.
#[must_use]
pub fn headings(markdown: &str) -> Headings<'_> {
  Headings {
    lines: markdown.lines().enumerate(),
  }
}

/// Collect the full outline of a document.
#[must_use]
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
  headings(markdown).collect()
}
