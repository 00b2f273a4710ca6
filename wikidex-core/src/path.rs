//! Path algebra for wiki page identifiers.
//!
//! Payloads address pages with loose, slash-separated paths that may carry
//! Windows separators, a leading `./`, leading slashes, percent escapes, or
//! an arbitrary file extension. Every function here is total: malformed
//! input degrades to a best-effort string instead of an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::util::never_matching_regex;

/// One trailing `.ext` suffix of one to six alphanumerics.
static TRAILING_EXT_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\.[a-zA-Z0-9]{1,6}$").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile TRAILING_EXT_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
});

/// Runs of dots, whitespace, and underscores, which all read as word
/// separators when matching page names.
static SEPARATOR_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"[.\s_]+").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile SEPARATOR_RUN_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
});

static HYPHEN_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"-+").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile HYPHEN_RUN_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    never_matching_regex()
  })
});

/// Canonicalize a page path.
///
/// Backslashes become forward slashes, a single leading `./` is dropped,
/// and all leading slashes are stripped. Interior structure is kept
/// untouched, so `a//b` stays `a//b`.
#[must_use]
pub fn normalize(path: &str) -> String {
  let slashed = path.replace('\\', "/");
  let trimmed = slashed.strip_prefix("./").unwrap_or(&slashed);
  trimmed.trim_start_matches('/').to_string()
}

/// Normalize `path` and drop one trailing extension if present.
///
/// Only a final `.` followed by one to six ASCII alphanumerics counts as
/// an extension, and only one such suffix is removed. `notes.md` becomes
/// `notes`; `archive.tar.gz` becomes `archive.tar`.
#[must_use]
pub fn strip_extension(path: &str) -> String {
  let normalized = normalize(path);
  TRAILING_EXT_RE.replace(&normalized, "").into_owned()
}

/// Reduce a path to the form used for fuzzy page matching.
///
/// Two paths refer to the same page when their comparison keys are equal:
/// the extension is stripped, case is folded, trailing slashes go away,
/// and runs of dots, whitespace, underscores, and hyphens all collapse to
/// a single hyphen.
#[must_use]
pub fn comparison_key(path: &str) -> String {
  let stripped = strip_extension(path).to_lowercase().replace('\\', "/");
  let trimmed = stripped.trim_end_matches('/');
  let dashed = SEPARATOR_RUN_RE.replace_all(trimmed, "-");
  HYPHEN_RUN_RE.replace_all(&dashed, "-").into_owned()
}

/// Resolve `relative` against a base directory, segment by segment.
///
/// The relative part goes through [`normalize`] first, so backslash
/// separators and a leading `./` are tolerated. Empty segments on either
/// side are discarded. `..` pops the segment stack (with no effect when
/// it is empty) and `.` is skipped. The result never escapes above the
/// implicit root and carries no leading slash.
#[must_use]
pub fn resolve_relative(base_dir: &str, relative: &str) -> String {
  let relative = normalize(relative);

  let mut stack: Vec<&str> = base_dir
    .split('/')
    .filter(|segment| !segment.is_empty())
    .collect();

  for segment in relative.split('/') {
    match segment {
      "" | "." => {},
      ".." => {
        stack.pop();
      },
      other => stack.push(other),
    }
  }

  stack.join("/")
}

/// Directory portion of a normalized page path.
///
/// Everything before the final slash; the empty string when the path has
/// no directory component.
#[must_use]
pub fn parent_dir(path: &str) -> String {
  let normalized = normalize(path);
  match normalized.rfind('/') {
    Some(idx) => normalized[..idx].to_string(),
    None => String::new(),
  }
}

/// Text after the final `/`, or the whole string when there is none.
#[must_use]
pub fn last_segment(path: &str) -> &str {
  path.rsplit('/').next().unwrap_or(path)
}

/// Decode `%XX` escapes, tolerating broken input.
///
/// Links copied out of browsers are often percent-encoded, but payload
/// authors also write literal `%` signs. Any malformed escape or invalid
/// UTF-8 in the decoded bytes means the original string is returned
/// unchanged. `+` is not treated as a space.
#[must_use]
pub fn percent_decode(input: &str) -> String {
  decode_escapes(input).unwrap_or_else(|| input.to_string())
}

fn decode_escapes(input: &str) -> Option<String> {
  if !input.contains('%') {
    return Some(input.to_string());
  }

  let bytes = input.as_bytes();
  let mut decoded = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'%' {
      let hi = hex_digit(*bytes.get(i + 1)?)?;
      let lo = hex_digit(*bytes.get(i + 2)?)?;
      decoded.push((hi << 4) | lo);
      i += 3;
    } else {
      decoded.push(bytes[i]);
      i += 1;
    }
  }

  String::from_utf8(decoded).ok()
}

const fn hex_digit(byte: u8) -> Option<u8> {
  match byte {
    b'0'..=b'9' => Some(byte - b'0'),
    b'a'..=b'f' => Some(byte - b'a' + 10),
    b'A'..=b'F' => Some(byte - b'A' + 10),
    _ => None,
  }
}
