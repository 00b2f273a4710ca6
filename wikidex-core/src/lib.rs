//! # wikidex-core
//!
//! Shape-tolerant model for project wiki payloads: a flat page index with
//! a canonical traversal order, sidebar trees with filtering, heading
//! outlines, relative link resolution, and markdown export plans.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use wikidex_core::{LinkTarget, SidebarNode, WikiIndex, resolve_href};
//!
//! let payload = json!({
//!   "pages": {
//!     "Overview": "# Welcome",
//!     "guide": { "setup": "# Setup" }
//!   }
//! });
//!
//! let index = WikiIndex::from_payload(&payload);
//! assert_eq!(index.initial_selection(), Some("Overview"));
//!
//! let tree = SidebarNode::build(&index);
//! assert_eq!(tree.leaf_paths(), ["Overview", "guide/setup"]);
//!
//! let target = resolve_href(&index, Some("guide/setup"), "../overview.md");
//! assert!(matches!(target, LinkTarget::Page { .. }));
//! ```
//!
//! ## Design
//!
//! - **Total coercion**: any JSON shape coerces to markdown text; every
//!   anomaly maps to the empty string instead of an error.
//! - **Order is meaning**: payload field order (preserved by
//!   `serde_json`'s ordered maps) defines the traversal order used for
//!   the start page, next-page navigation, tie breaking, and export.
//! - **Pure core, thin edges**: everything here is synchronous; the one
//!   asynchronous edge an application has lives behind
//!   [`WikiSession`]'s load tickets.

pub mod error;
pub mod export;
pub mod index;
pub mod outline;
pub mod path;
pub mod payload;
pub mod resolver;
pub mod session;
pub mod sidebar;

mod util;

pub use error::{WikiError, WikiResult};
pub use export::{ExportEntry, ExportPlan, bundle_file_name};
pub use index::WikiIndex;
pub use outline::{Heading, Headings, extract_headings, heading_id, headings};
pub use path::{
  comparison_key,
  normalize,
  percent_decode,
  resolve_relative,
};
pub use payload::{
  PageBody,
  RepoMeta,
  coerce,
  parse_payload,
  project_name_from_url,
  select_pages_root,
};
pub use resolver::{LinkTarget, resolve_href};
pub use session::{LoadTicket, WikiSession};
pub use sidebar::SidebarNode;
