//! Field-overlay resolution engine.
//!
//! Maps sparse sheet rows, each naming a dotted/indexed field path, into a
//! fully merged per-character document tree: selectors resolve through the
//! alias registry, `$` rows reuse stored content, `!` rows clear inherited
//! defaults, and literal rows run through the text pipeline before landing
//! in the tree.

pub mod alias;
pub mod context;
pub mod engine;
pub mod error;
pub mod path;
pub mod refs;
pub mod row;
pub mod text;

pub use alias::AliasRegistry;
pub use context::{DEFAULT_ASSETS_ROOT, RunContext};
pub use engine::{BuiltDocument, EngineConfig, OverlayEngine, SheetVersioner};
pub use error::{OverlayError, Result};
pub use path::{Applied, POSITION_KEY, PathSelector, Traversal, rewrite_selector};
pub use refs::ReferenceStore;
pub use row::{NOTES_KEY, RowOutcome, resolve_row};
pub use text::{
    TextRule, WARNING_MARKER, apply_rules, collapse_paragraphs, escape_html, render_cell,
    warning_wrap,
};
