//! Markdown export: pure planning plus a parallel bundle writer.

use std::{fs, path::Path};

use rayon::prelude::*;

use crate::{error::WikiResult, index::WikiIndex};

/// One file in an export bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
  /// Bundle-relative file path, `/`-separated.
  pub file:    String,
  /// Markdown exactly as stored in the index.
  pub content: String,
}

/// Everything needed to materialize a wiki as a tree of markdown files.
///
/// Planning is pure and deterministic: entries follow the index's
/// traversal order, file names are derived only from page paths, and the
/// content is byte-identical to the index text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportPlan {
  entries: Vec<ExportEntry>,
}

impl ExportPlan {
  #[must_use]
  pub fn new(index: &WikiIndex) -> Self {
    let entries = index
      .iter()
      .map(|(path, content)| ExportEntry {
        file:    bundle_file_name(path),
        content: content.to_string(),
      })
      .collect();
    Self { entries }
  }

  #[must_use]
  pub fn entries(&self) -> &[ExportEntry] {
    &self.entries
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Write every entry under `dir`, creating directories as needed.
  ///
  /// Entries are written in parallel. Page paths with `..` segments are
  /// skipped with a warning; the bundle must stay inside `dir`.
  ///
  /// # Errors
  ///
  /// Returns the first I/O failure encountered.
  pub fn write_to(&self, dir: &Path) -> WikiResult<()> {
    fs::create_dir_all(dir)?;

    self.entries.par_iter().try_for_each(|entry| -> WikiResult<()> {
      if entry.file.split('/').any(|segment| segment == "..") {
        log::warn!("skipping page outside the bundle root: {}", entry.file);
        return Ok(());
      }

      let dest = dir.join(&entry.file);
      if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
      }
      fs::write(&dest, entry.content.as_bytes())?;
      Ok(())
    })
  }
}

/// Bundle-relative file name for a page path.
///
/// `.md` is appended unless the path already ends with it. The check is
/// case-sensitive, so `notes.MD` still gains a lowercase suffix.
#[must_use]
pub fn bundle_file_name(page_path: &str) -> String {
  if page_path.ends_with(".md") {
    page_path.to_string()
  } else {
    format!("{page_path}.md")
  }
}
