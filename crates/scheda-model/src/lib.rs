pub mod content;
pub mod sheet;
pub mod version;

pub use content::{CellValue, FieldContent};
pub use sheet::{
    COL_ALIAS_CAMPO, COL_ATTIVO, COL_CSS, COL_CSS_CLASS, COL_EVIDENZIA, COL_FIELD,
    COL_INCLUSIONE_FILE, COL_NOTE_REGIA, COL_PATTERN, COL_RIFERIMENTO, COL_SOSTITUZIONE,
    COL_TESTO, COL_TITOLO, Sheet, SheetKind, SheetRow,
};
pub use version::{Version, VersionParseError, VersionRecord};

/// The per-character document tree handed to templating collaborators.
pub type Document = serde_json::Value;
