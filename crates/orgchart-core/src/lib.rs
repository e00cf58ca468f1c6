//! Org chart tree engine
//!
//! Turns a flat list of employee rows (one row per employee, each carrying a
//! manager reference) into a rooted reporting tree, and supports two
//! independent view transformations over that tree:
//!
//! ```text
//!   raw rows ──► Record (normalize) ──► RecordSet (indexed)
//!                                           │
//!                   root id (zoom) ────────►│ build
//!                                           ▼
//!                                   Node tree (fresh)
//!                                           │ annotate   (has_children, descendant_count)
//!                                           ▼
//!                   collapse set ─────────► project      (prune collapsed children)
//!                                           │
//!                                           ▼
//!                                       renderer
//! ```
//!
//! Every state change (new data, collapse toggle, zoom) rebuilds the tree from
//! scratch. No `Node` survives a rebuild; callers re-resolve nodes by id.
//!
//! View state lives with the caller ([`ViewState`]); the pipeline itself is a
//! pure function of `(records, collapse set, root id)`.

pub mod builder;
pub mod collapse;
pub mod config;
pub mod derive;
pub mod error;
pub mod node;
pub mod record;
pub mod session;
pub mod zoom;

pub use builder::{build, BuiltTree};
pub use collapse::{project, CollapseSet};
pub use config::ChartConfig;
pub use derive::annotate;
pub use error::{Anomaly, BuildError};
pub use node::{Attribute, Node};
pub use record::{normalize, ManagerRef, RawRow, Record, RecordSet, Scalar};
pub use session::{rebuild, NodeControls, OrgChart, ViewState};
pub use zoom::ZoomState;
