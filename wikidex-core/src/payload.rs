//! Shape-tolerant decoding of wiki payloads.
//!
//! Exports from different wiki tools disagree on how a page body is
//! spelled: a bare string, an array of fragments, an object with a
//! `content`/`markdown`/`text`/`body` field, or the same fields tucked one
//! level under `data`. [`PageBody`] is the single authority on those
//! shapes; everything else in the crate asks it instead of poking at raw
//! JSON.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{error::WikiResult, util::never_matching_regex};

/// Body fields recognized on a page object, in priority order.
pub const BODY_FIELDS: [&str; 4] = ["content", "markdown", "text", "body"];

static GITHUB_PROJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"github\.com/[^/]+/([^/]+)").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile GITHUB_PROJECT_RE regex: {e}\n Falling back to \
       never matching regex."
    );
    never_matching_regex()
  })
});

/// Decoded shape of a single payload node.
///
/// Decoding is total: unrecognized shapes land in [`PageBody::Opaque`]
/// and coerce to the empty string rather than erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
  /// `null`.
  Empty,
  /// A bare string, used as-is.
  Text(String),
  /// A number or boolean, rendered with its display form.
  Scalar(String),
  /// An array; fragments are coerced individually and joined with
  /// newlines.
  Fragments(Vec<PageBody>),
  /// An object owning at least one of the [`BODY_FIELDS`], resolved to
  /// its markdown text. Such objects are content leaves: the flattener
  /// stops descending at them even when the resolved text is empty.
  Document(String),
  /// An object with no direct body field whose `data` object carried
  /// one. Not a content leaf, but still coercible.
  Nested(String),
  /// Anything else. Coerces to the empty string.
  Opaque,
}

impl PageBody {
  /// Decode a JSON node into its page-body shape.
  #[must_use]
  pub fn decode(value: &Value) -> Self {
    match value {
      Value::Null => Self::Empty,
      Value::String(s) => Self::Text(s.clone()),
      Value::Number(n) => Self::Scalar(n.to_string()),
      Value::Bool(b) => Self::Scalar(b.to_string()),
      Value::Array(items) => {
        Self::Fragments(items.iter().map(Self::decode).collect())
      },
      Value::Object(map) => {
        if is_content_leaf(map) {
          Self::Document(document_text(map))
        } else if let Some(text) = nested_data_text(map) {
          Self::Nested(text)
        } else {
          Self::Opaque
        }
      },
    }
  }

  /// The markdown text this body carries. Always a string, possibly
  /// empty.
  #[must_use]
  pub fn text(&self) -> String {
    match self {
      Self::Empty | Self::Opaque => String::new(),
      Self::Text(s) | Self::Scalar(s) | Self::Document(s) | Self::Nested(s) => {
        s.clone()
      },
      Self::Fragments(parts) => {
        parts.iter().map(Self::text).collect::<Vec<_>>().join("\n")
      },
    }
  }
}

/// Coerce any JSON node to markdown text.
///
/// Shorthand for decoding followed by [`PageBody::text`]. Never fails;
/// every anomaly maps to the empty string.
#[must_use]
pub fn coerce(value: &Value) -> String {
  PageBody::decode(value).text()
}

/// Whether an object owns any of the recognized body fields.
///
/// Presence is what counts, not emptiness: `{"content": ""}` is still a
/// leaf and shadows any sibling nesting under it.
#[must_use]
pub fn is_content_leaf(map: &Map<String, Value>) -> bool {
  BODY_FIELDS.iter().any(|field| map.contains_key(*field))
}

/// Resolve the text of a content leaf.
///
/// Direct fields are tried in priority order until one coerces to a
/// non-empty string. The `data` fallback is stricter: only the first
/// present, non-null field gets a single coercion attempt.
fn document_text(map: &Map<String, Value>) -> String {
  for field in BODY_FIELDS {
    if let Some(value) = map.get(field) {
      let text = coerce(value);
      if !text.is_empty() {
        return text;
      }
    }
  }

  nested_data_text(map).unwrap_or_default()
}

fn nested_data_text(map: &Map<String, Value>) -> Option<String> {
  let Some(Value::Object(data)) = map.get("data") else {
    return None;
  };

  let candidate = BODY_FIELDS
    .iter()
    .find_map(|field| data.get(*field).filter(|value| !value.is_null()))?;

  let text = coerce(candidate);
  if text.is_empty() { None } else { Some(text) }
}

/// Parse payload text into JSON.
///
/// # Errors
///
/// Returns [`crate::WikiError::Payload`] when the text is not valid JSON.
pub fn parse_payload(text: &str) -> WikiResult<Value> {
  Ok(serde_json::from_str(text)?)
}

/// Locate the object that actually holds the pages.
///
/// Payloads arrive bare or wrapped in an envelope; the first usable value
/// among `pages`, `data.pages`, `files`, and `data` wins, falling back to
/// the payload itself. "Usable" mirrors JS truthiness, since that is what
/// the upstream exporters were written against: `null`, `""`, `0`, and
/// `false` are passed over.
#[must_use]
pub fn select_pages_root(payload: &Value) -> &Value {
  let candidates = [
    payload.get("pages"),
    payload.get("data").and_then(|data| data.get("pages")),
    payload.get("files"),
    payload.get("data"),
  ];

  for candidate in candidates.into_iter().flatten() {
    if is_usable(candidate) {
      return candidate;
    }
  }

  payload
}

fn is_usable(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// Repository metadata carried alongside the pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoMeta {
  pub url:   Option<String>,
  pub owner: Option<String>,
  pub name:  Option<String>,
}

impl RepoMeta {
  /// Extract repository metadata from a payload.
  ///
  /// The URL is the first non-empty string among `github_url`,
  /// `repo.url`, `data.github_url`, and `data.repo.url`. Owner and name
  /// come from the first two path segments of that URL; anything that
  /// does not parse degrades to `None`.
  #[must_use]
  pub fn from_payload(payload: &Value) -> Self {
    let url = [
      payload.get("github_url"),
      payload.get("repo").and_then(|repo| repo.get("url")),
      payload.get("data").and_then(|data| data.get("github_url")),
      payload
        .get("data")
        .and_then(|data| data.get("repo"))
        .and_then(|repo| repo.get("url")),
    ]
    .into_iter()
    .flatten()
    .find_map(|value| match value {
      Value::String(s) if !s.is_empty() => Some(s.clone()),
      _ => None,
    });

    let (owner, name) = url.as_deref().map_or((None, None), repo_segments);
    Self { url, owner, name }
  }
}

/// First two path segments of a URL, scheme and host stripped.
fn repo_segments(url: &str) -> (Option<String>, Option<String>) {
  let Some((_, rest)) = url.split_once("://") else {
    return (None, None);
  };

  let path = rest.split_once('/').map_or("", |(_, path)| path);
  let path = path.split(['?', '#']).next().unwrap_or(path);

  let mut segments = path.split('/').filter(|s| !s.is_empty());
  let owner = segments.next().map(str::to_string);
  let name = segments.next().map(str::to_string);
  (owner, name)
}

/// Project name from a GitHub URL, for default bundle naming.
///
/// `None` when the URL does not contain a `github.com/<owner>/<name>`
/// section.
#[must_use]
pub fn project_name_from_url(url: &str) -> Option<String> {
  GITHUB_PROJECT_RE
    .captures(url)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use serde_json::json;

  use super::*;

  #[test]
  fn coerce_handles_scalars() {
    assert_eq!(coerce(&Value::Null), "");
    assert_eq!(coerce(&json!("# Title")), "# Title");
    assert_eq!(coerce(&json!(42)), "42");
    assert_eq!(coerce(&json!(true)), "true");
  }

  #[test]
  fn coerce_joins_arrays_with_newlines() {
    assert_eq!(coerce(&json!(["a", "b"])), "a\nb");
    assert_eq!(coerce(&json!(["a", null, "c"])), "a\n\nc");
    assert_eq!(coerce(&json!([["x", "y"], "z"])), "x\ny\nz");
    assert_eq!(coerce(&json!([])), "");
  }

  #[test]
  fn coerce_reads_body_fields_in_order() {
    assert_eq!(coerce(&json!({"content": "c"})), "c");
    assert_eq!(coerce(&json!({"markdown": "m", "text": "t"})), "m");
    // Empty direct fields are skipped in favor of later ones
    assert_eq!(coerce(&json!({"content": "", "text": "t"})), "t");
    assert_eq!(coerce(&json!({"body": ["x", "y"]})), "x\ny");
  }

  #[test]
  fn coerce_falls_back_to_nested_data() {
    assert_eq!(coerce(&json!({"data": {"markdown": "m"}})), "m");
    assert_eq!(coerce(&json!({"content": "", "data": {"text": "t"}})), "t");
    // The data fallback takes the first non-null field only
    assert_eq!(coerce(&json!({"data": {"content": null, "text": "t"}})), "t");
    assert_eq!(coerce(&json!({"data": {"content": "", "text": "t"}})), "");
  }

  #[test]
  fn coerce_maps_anomalies_to_empty() {
    assert_eq!(coerce(&json!({})), "");
    assert_eq!(coerce(&json!({"unrelated": 1})), "");
    assert_eq!(coerce(&json!({"data": "not an object"})), "");
    assert_eq!(coerce(&json!({"data": ["not", "an", "object"]})), "");
  }

  #[test]
  fn leaf_detection_cares_about_presence_not_emptiness() {
    let leaf = json!({"content": ""});
    assert!(is_content_leaf(leaf.as_object().expect("object literal")));

    let not_leaf = json!({"data": {"content": "x"}});
    assert!(!is_content_leaf(not_leaf.as_object().expect("object literal")));
  }

  #[test]
  fn decode_tags_shapes() {
    assert_eq!(PageBody::decode(&Value::Null), PageBody::Empty);
    assert_eq!(
      PageBody::decode(&json!({"content": "c"})),
      PageBody::Document("c".into())
    );
    assert_eq!(
      PageBody::decode(&json!({"data": {"body": "b"}})),
      PageBody::Nested("b".into())
    );
    assert_eq!(PageBody::decode(&json!({"other": 1})), PageBody::Opaque);
  }

  #[test]
  fn pages_root_unwraps_envelopes() {
    let wrapped = json!({"data": {"pages": {"a": "x"}}});
    assert_eq!(select_pages_root(&wrapped), &json!({"a": "x"}));

    let files = json!({"files": {"a": "x"}});
    assert_eq!(select_pages_root(&files), &json!({"a": "x"}));

    let bare = json!({"a": "x"});
    assert_eq!(select_pages_root(&bare), &bare);

    // Falsy candidates are passed over
    let falsy = json!({"pages": "", "files": {"a": "x"}});
    assert_eq!(select_pages_root(&falsy), &json!({"a": "x"}));
  }

  #[test]
  fn repo_meta_prefers_direct_url() {
    let payload = json!({
      "github_url": "https://github.com/acme/widget",
      "data": {"repo": {"url": "https://github.com/other/thing"}}
    });
    let meta = RepoMeta::from_payload(&payload);
    assert_eq!(meta.url.as_deref(), Some("https://github.com/acme/widget"));
    assert_eq!(meta.owner.as_deref(), Some("acme"));
    assert_eq!(meta.name.as_deref(), Some("widget"));
  }

  #[test]
  fn repo_meta_degrades_on_unparsable_url() {
    let payload = json!({"github_url": "not a url"});
    let meta = RepoMeta::from_payload(&payload);
    assert_eq!(meta.url.as_deref(), Some("not a url"));
    assert_eq!(meta.owner, None);
    assert_eq!(meta.name, None);

    assert_eq!(RepoMeta::from_payload(&json!({})), RepoMeta::default());
  }

  #[test]
  fn project_name_comes_from_github_path() {
    assert_eq!(
      project_name_from_url("https://github.com/acme/widget"),
      Some("widget".into())
    );
    assert_eq!(
      project_name_from_url("https://github.com/acme/widget/wiki"),
      Some("widget".into())
    );
    assert_eq!(project_name_from_url("https://example.com/acme"), None);
  }
}
