//! Field content values as authored in a character sheet row.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One cell of a sheet row, classified once at row-resolution entry.
///
/// A leading `$` marks a reference to previously stored content; everything
/// else is literal text. Whitespace-only cells count as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Empty,
    Text(String),
    Reference(String),
}

impl CellValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else if let Some(ref_id) = trimmed.strip_prefix('$') {
            Self::Reference(ref_id.to_string())
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Resolved content of one sheet row, before it is written into the
/// character document.
///
/// Slot names follow the workbook headers (`titolo` = title, `testo` = body,
/// `evidenzia` = highlight, `note_regia` = director notes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldContent {
    pub titolo: String,
    pub testo: String,
    pub evidenzia: String,
    pub note_regia: String,
    pub css: String,
    pub css_class: String,
    /// Asset path under the configured assets root, if the row included a file.
    pub file: Option<String>,
    /// The raw field selector the row was authored under.
    pub campo: String,
    /// Unique reference id, when the row declared one.
    pub riferimento: Option<String>,
}

impl FieldContent {
    /// True when none of the collapsible slots carry a value.
    pub fn is_blank(&self) -> bool {
        self.titolo.is_empty()
            && self.testo.is_empty()
            && self.evidenzia.is_empty()
            && self.file.is_none()
    }

    /// Convert to the document-tree node this content produces.
    ///
    /// Collapsing rule: exactly one non-empty slot among
    /// {titolo, testo, evidenzia, file} collapses to that bare value; all
    /// empty yields `null`; two or more keep the full record.
    pub fn to_value(&self) -> Value {
        let mut filled: Vec<&str> = Vec::new();
        if !self.titolo.is_empty() {
            filled.push(&self.titolo);
        }
        if !self.testo.is_empty() {
            filled.push(&self.testo);
        }
        if !self.evidenzia.is_empty() {
            filled.push(&self.evidenzia);
        }
        if let Some(file) = &self.file {
            filled.push(file);
        }
        match filled.as_slice() {
            [] => Value::Null,
            [single] => Value::String((*single).to_string()),
            _ => {
                let mut map = Map::new();
                if !self.titolo.is_empty() {
                    map.insert("titolo".to_string(), Value::String(self.titolo.clone()));
                }
                if !self.testo.is_empty() {
                    map.insert("testo".to_string(), Value::String(self.testo.clone()));
                }
                if !self.evidenzia.is_empty() {
                    map.insert(
                        "evidenzia".to_string(),
                        Value::String(self.evidenzia.clone()),
                    );
                }
                if let Some(file) = &self.file {
                    map.insert("file".to_string(), Value::String(file.clone()));
                }
                if !self.css.is_empty() {
                    map.insert("css".to_string(), Value::String(self.css.clone()));
                }
                if !self.css_class.is_empty() {
                    map.insert(
                        "css_class".to_string(),
                        Value::String(self.css_class.clone()),
                    );
                }
                if !self.note_regia.is_empty() {
                    map.insert(
                        "note_regia".to_string(),
                        Value::String(self.note_regia.clone()),
                    );
                }
                Value::Object(map)
            }
        }
    }
}
