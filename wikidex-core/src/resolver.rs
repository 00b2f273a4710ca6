//! Relative markdown link resolution against the flat index.
//!
//! Pages link to each other the way their authors' editors spelled the
//! target: with or without extensions, with `./` or `..` prefixes, percent
//! escapes, different separator conventions, or bare page names. The
//! resolver maps an href to an index path without touching any state;
//! deciding what to do with the outcome is the caller's business.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
  index::WikiIndex,
  path::{
    comparison_key,
    last_segment,
    parent_dir,
    percent_decode,
    resolve_relative,
  },
  util::never_matching_regex,
};

/// Scheme-prefixed absolute URL. Requires `://`, so `mailto:` style
/// links are not bypassed here; they simply fail to match any page and
/// come back [`LinkTarget::Unresolved`].
static ABSOLUTE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^[a-z][a-z0-9+.-]*://").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile ABSOLUTE_URL_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
});

/// Outcome of resolving an href found inside a wiki page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
  /// Not ours to handle: absolute URLs, host-absolute paths, in-page
  /// anchors, and empty hrefs. The host lets these through untouched.
  External,
  /// A page in the index, with an optional heading anchor to scroll to.
  Page {
    path:   String,
    anchor: Option<String>,
  },
  /// Nothing in the index matched. Callers should leave their state
  /// unchanged.
  Unresolved,
}

/// Resolve an href relative to the currently selected page.
///
/// The href's path part is percent-decoded (tolerantly), resolved
/// segment-wise against the current page's directory, and then matched
/// against the index in three tiers of decreasing precision: full path,
/// full path against the target's file name, and file name against file
/// name. Within a tier, the first page in traversal order wins.
#[must_use]
pub fn resolve_href(
  index: &WikiIndex,
  current_page: Option<&str>,
  href: &str,
) -> LinkTarget {
  if href.is_empty()
    || href.starts_with('#')
    || href.starts_with('/')
    || ABSOLUTE_URL_RE.is_match(href)
  {
    return LinkTarget::External;
  }

  let mut parts = href.split('#');
  let raw_path = parts.next().unwrap_or(href);
  let anchor = parts
    .next()
    .map(str::trim)
    .filter(|a| !a.is_empty())
    .map(str::to_string);

  let decoded = percent_decode(raw_path);
  let base_dir = current_page.map(parent_dir).unwrap_or_default();
  let resolved = resolve_relative(&base_dir, &decoded);

  match find_page(index, &resolved) {
    Some(path) => LinkTarget::Page {
      path: path.to_string(),
      anchor,
    },
    None => {
      log::debug!("link {href:?} resolved to {resolved:?}, matching no page");
      LinkTarget::Unresolved
    },
  }
}

fn find_page<'a>(index: &'a WikiIndex, resolved: &str) -> Option<&'a str> {
  let target = comparison_key(resolved);
  let target_name = comparison_key(last_segment(resolved));

  index
    .paths()
    .find(|path| comparison_key(path) == target)
    .or_else(|| {
      index.paths().find(|path| comparison_key(path) == target_name)
    })
    .or_else(|| {
      index
        .paths()
        .find(|path| comparison_key(last_segment(path)) == target_name)
    })
}
