//! Mutable navigation state over a loaded wiki.
//!
//! Everything underneath the session is synchronous and pure; the one
//! asynchronous edge an application has (fetching payload bytes) stays on
//! the host side. The session only needs to know which load attempt is
//! the newest one, which is what [`LoadTicket`] encodes: tickets from
//! superseded attempts can no longer mutate anything, so a slow response
//! that arrives after the user switched projects is simply dropped.

use serde_json::Value;

use crate::{
  error::{WikiError, WikiResult},
  index::WikiIndex,
  payload::RepoMeta,
  resolver::{LinkTarget, resolve_href},
};

/// Ticket handed out by [`WikiSession::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
  generation: u64,
}

/// Index, selection, and repository metadata for one loaded wiki.
#[derive(Debug, Default)]
pub struct WikiSession {
  index:      WikiIndex,
  selected:   Option<String>,
  repo:       RepoMeta,
  generation: u64,
}

impl WikiSession {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Start a load attempt, superseding any attempt still in flight.
  pub fn begin_load(&mut self) -> LoadTicket {
    self.generation += 1;
    LoadTicket {
      generation: self.generation,
    }
  }

  /// Install a fetched payload if `ticket` is still the newest one.
  ///
  /// Returns whether the payload was applied. On apply, the selection
  /// moves to the index's initial page; a payload that flattens to
  /// nothing leaves the selection empty.
  pub fn apply(&mut self, ticket: LoadTicket, payload: &Value) -> bool {
    if ticket.generation != self.generation {
      log::debug!(
        "discarding stale payload (ticket {} superseded by {})",
        ticket.generation,
        self.generation
      );
      return false;
    }

    self.index = WikiIndex::from_payload(payload);
    self.repo = RepoMeta::from_payload(payload);
    self.selected = self.index.initial_selection().map(str::to_string);
    if self.index.is_empty() {
      log::warn!("payload flattened to no readable pages");
    } else {
      log::info!("loaded {} pages", self.index.len());
    }
    true
  }

  /// Record a failed load if `ticket` is still the newest one.
  ///
  /// A current failure clears the index, the selection, and the
  /// repository metadata; a stale one is ignored. Returns whether the
  /// failure was recorded.
  pub fn fail(&mut self, ticket: LoadTicket) -> bool {
    if ticket.generation != self.generation {
      log::debug!("ignoring stale load failure");
      return false;
    }

    self.index = WikiIndex::default();
    self.selected = None;
    self.repo = RepoMeta::default();
    true
  }

  #[must_use]
  pub const fn index(&self) -> &WikiIndex {
    &self.index
  }

  #[must_use]
  pub fn selected(&self) -> Option<&str> {
    self.selected.as_deref()
  }

  #[must_use]
  pub const fn repo(&self) -> &RepoMeta {
    &self.repo
  }

  /// The index, or a typed error when nothing is loaded.
  ///
  /// # Errors
  ///
  /// Returns [`WikiError::EmptyIndex`] when the session holds no pages.
  pub fn ensure_loaded(&self) -> WikiResult<&WikiIndex> {
    self.index.require_pages()?;
    Ok(&self.index)
  }

  /// Select a page by its index path.
  ///
  /// # Errors
  ///
  /// Returns [`WikiError::PageNotFound`] for paths outside the index;
  /// the selection is unchanged in that case.
  pub fn select(&mut self, path: &str) -> WikiResult<()> {
    if self.index.contains(path) {
      self.selected = Some(path.to_string());
      Ok(())
    } else {
      Err(WikiError::PageNotFound(path.to_string()))
    }
  }

  /// Resolve an href against the current selection.
  ///
  /// A [`LinkTarget::Page`] hit moves the selection; `External` and
  /// `Unresolved` leave the session untouched.
  pub fn follow_link(&mut self, href: &str) -> LinkTarget {
    let target = resolve_href(&self.index, self.selected.as_deref(), href);
    if let LinkTarget::Page { path, .. } = &target {
      self.selected = Some(path.clone());
    }
    target
  }

  /// The page after the current selection in traversal order.
  #[must_use]
  pub fn next_page(&self) -> Option<&str> {
    self.index.next_after(self.selected.as_deref()?)
  }
}
