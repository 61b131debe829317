//! Workbook sheets as ordered header/row tables.
//!
//! Column order matters: the first column is the field selector and drives
//! the keys hash, so rows keep their cell vectors instead of collapsing into
//! maps.

/// Field selector column. Always the first column of a character sheet.
pub const COL_FIELD: &str = "field";
pub const COL_TITOLO: &str = "titolo";
pub const COL_TESTO: &str = "testo";
pub const COL_EVIDENZIA: &str = "evidenzia";
pub const COL_NOTE_REGIA: &str = "note_regia";
pub const COL_CSS: &str = "css";
pub const COL_CSS_CLASS: &str = "css_class";
pub const COL_INCLUSIONE_FILE: &str = "inclusione_file";
pub const COL_RIFERIMENTO: &str = "riferimento";

/// Columns of the reference-alias configuration sheet.
pub const COL_ALIAS_CAMPO: &str = "campo";

/// Columns of the pattern-substitution configuration sheet.
pub const COL_PATTERN: &str = "pattern";
pub const COL_SOSTITUZIONE: &str = "sostituzione";
pub const COL_ATTIVO: &str = "attivo";

/// How a sheet participates in a run, decided by its name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    /// Configuration-only sheet, never turned into a document.
    Config,
    /// Lightweight handout built from an empty tree instead of the template.
    Handout,
    /// Regular character sheet overlaid onto the default template.
    Character,
}

/// One sheet of the workbook: ordered headers plus data rows in sheet order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn kind(&self, hidden_prefix: &str, handout_prefix: &str) -> SheetKind {
        if !hidden_prefix.is_empty() && self.name.starts_with(hidden_prefix) {
            SheetKind::Config
        } else if !handout_prefix.is_empty() && self.name.starts_with(handout_prefix) {
            SheetKind::Handout
        } else {
            SheetKind::Character
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Borrowing view of one data row with header-keyed access.
    pub fn row(&self, index: usize) -> SheetRow<'_> {
        SheetRow {
            headers: &self.headers,
            cells: &self.rows[index],
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = SheetRow<'_>> {
        self.rows.iter().map(|cells| SheetRow {
            headers: &self.headers,
            cells,
        })
    }
}

/// View of a single row; missing trailing cells read as empty.
#[derive(Debug, Clone, Copy)]
pub struct SheetRow<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> SheetRow<'a> {
    pub fn new(headers: &'a [String], cells: &'a [String]) -> Self {
        Self { headers, cells }
    }

    pub fn cell(&self, header: &str) -> &'a str {
        self.headers
            .iter()
            .position(|h| h == header)
            .and_then(|idx| self.cells.get(idx))
            .map_or("", |value| value.as_str())
    }

    pub fn field(&self) -> &'a str {
        self.cell(COL_FIELD)
    }

    pub fn titolo(&self) -> &'a str {
        self.cell(COL_TITOLO)
    }

    pub fn testo(&self) -> &'a str {
        self.cell(COL_TESTO)
    }

    pub fn evidenzia(&self) -> &'a str {
        self.cell(COL_EVIDENZIA)
    }

    pub fn note_regia(&self) -> &'a str {
        self.cell(COL_NOTE_REGIA)
    }

    pub fn css(&self) -> &'a str {
        self.cell(COL_CSS)
    }

    pub fn css_class(&self) -> &'a str {
        self.cell(COL_CSS_CLASS)
    }

    pub fn inclusione_file(&self) -> &'a str {
        self.cell(COL_INCLUSIONE_FILE)
    }

    pub fn riferimento(&self) -> &'a str {
        self.cell(COL_RIFERIMENTO)
    }

    /// True when the row has no field selector and drives nothing.
    pub fn is_empty(&self) -> bool {
        self.field().trim().is_empty()
    }
}
