//! Small shared helpers for the core crate.

use regex::Regex;

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a static regex fails to
/// compile. It will never match any input, which is safer than using a
/// trivial pattern like `^$` which would match empty strings.
///
/// # Panics
///
/// Panics if the fallback pattern `r"^\b$"` fails to compile, which
/// should never happen.
#[must_use]
pub(crate) fn never_matching_regex() -> Regex {
  // The pattern asserts something impossible (a character that is neither
  // whitespace nor non-whitespace) and is guaranteed to be valid
  #[allow(clippy::unwrap_used, reason = "Both patterns are hardcoded")]
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| Regex::new(r"^\b$").unwrap())
}
