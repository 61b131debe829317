//! Orchestrates row resolution across whole sheets.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use scheda_model::{
    COL_ALIAS_CAMPO, COL_ATTIVO, COL_CSS_CLASS, COL_PATTERN, COL_RIFERIMENTO, COL_SOSTITUZIONE,
    Document, Sheet, SheetKind, VersionRecord,
};

use crate::context::RunContext;
use crate::error::{OverlayError, Result};
use crate::row::{NOTES_KEY, RowOutcome, resolve_row};
use crate::text::TextRule;

/// Seam to the content versioner: stamps (and persists) a sheet's version
/// before any of its rows are merged.
pub trait SheetVersioner {
    fn next_version(&mut self, sheet: &Sheet) -> Result<VersionRecord>;
}

/// Sheet-name prefixes driving how each sheet participates in the run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Configuration-only sheets, never turned into documents.
    pub hidden_prefix: String,
    /// Handout sheets that start from an empty tree instead of the template.
    pub handout_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hidden_prefix: ".".to_string(),
            handout_prefix: "PNG".to_string(),
        }
    }
}

/// One fully built character document plus its run bookkeeping.
#[derive(Debug, Clone)]
pub struct BuiltDocument {
    pub name: String,
    pub version: VersionRecord,
    pub document: Document,
    pub rows_applied: usize,
    pub rows_skipped: usize,
}

impl BuiltDocument {
    /// Number of director notes the sheet accumulated.
    pub fn note_count(&self) -> usize {
        self.document
            .get(NOTES_KEY)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

/// Folds sheets into documents through the row resolver, carrying the
/// shared run context.
pub struct OverlayEngine {
    pub ctx: RunContext,
    config: EngineConfig,
}

impl OverlayEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            ctx: RunContext::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sheet_kind(&self, sheet: &Sheet) -> SheetKind {
        sheet.kind(&self.config.hidden_prefix, &self.config.handout_prefix)
    }

    /// Seed the alias registry from the reference-alias configuration sheet
    /// (columns `riferimento`, `campo`).
    pub fn load_aliases(&mut self, sheet: &Sheet) {
        let mut loaded = 0usize;
        for row in sheet.iter_rows() {
            let alias = row.cell(COL_RIFERIMENTO).trim();
            let campo = row.cell(COL_ALIAS_CAMPO).trim();
            if alias.is_empty() || campo.is_empty() {
                continue;
            }
            self.ctx.aliases.register(alias, campo);
            loaded += 1;
        }
        debug!(sheet = %sheet.name, aliases = loaded, "loaded reference aliases");
    }

    /// Compile the ordered substitution list from the pattern sheet
    /// (columns `pattern`, `sostituzione`, `css_class`, `attivo`).
    pub fn load_rules(&mut self, sheet: &Sheet) -> Result<()> {
        for row in sheet.iter_rows() {
            let pattern = row.cell(COL_PATTERN).trim();
            if pattern.is_empty() || !flag_enabled(row.cell(COL_ATTIVO)) {
                continue;
            }
            let replacement = row.cell(COL_SOSTITUZIONE);
            let class = row.cell(COL_CSS_CLASS).trim();
            let rule =
                TextRule::compile(pattern, replacement, (!class.is_empty()).then_some(class))?;
            self.ctx.rules.push(rule);
        }
        debug!(sheet = %sheet.name, rules = self.ctx.rules.len(), "loaded substitution rules");
        Ok(())
    }

    /// Build the shared default template by folding the template sheet's
    /// rows into an empty tree through the same row machinery.
    pub fn build_template(&mut self, sheet: &Sheet) -> Result<Document> {
        let mut document = Value::Object(Map::new());
        self.apply_rows(&mut document, sheet)?;
        Ok(document)
    }

    /// Overlay one character sheet onto the template. The version is
    /// stamped (and persisted) before row processing starts, so a crash
    /// mid-sheet still records that this sheet's version was considered.
    pub fn build_document<V: SheetVersioner>(
        &mut self,
        template: &Document,
        sheet: &Sheet,
        versioner: &mut V,
    ) -> Result<BuiltDocument> {
        let kind = self.sheet_kind(sheet);
        if kind == SheetKind::Config {
            return Err(OverlayError::Message(format!(
                "configuration sheet '{}' cannot become a document",
                sheet.name
            )));
        }
        let version = versioner.next_version(sheet)?;
        let mut document = match kind {
            SheetKind::Handout => Value::Object(Map::new()),
            _ => template.clone(),
        };
        let (rows_applied, rows_skipped) = self.apply_rows(&mut document, sheet)?;
        Ok(BuiltDocument {
            name: sheet.name.clone(),
            version,
            document,
            rows_applied,
            rows_skipped,
        })
    }

    /// Fold every data row in sheet order. Selector errors are structural
    /// template bugs and abort the run; anything else skips the row and
    /// keeps going, since malformed single rows are common authoring
    /// mistakes.
    fn apply_rows(&mut self, document: &mut Document, sheet: &Sheet) -> Result<(usize, usize)> {
        let mut applied = 0usize;
        let mut skipped = 0usize;
        for (idx, row) in sheet.iter_rows().enumerate() {
            match resolve_row(document, &mut self.ctx, &row) {
                Ok(RowOutcome::NotHandled) => {}
                Ok(RowOutcome::Deleted { canonical }) => {
                    debug!(sheet = %sheet.name, row = idx + 1, %canonical, "deleted field");
                    applied += 1;
                }
                Ok(RowOutcome::Applied { canonical }) => {
                    debug!(sheet = %sheet.name, row = idx + 1, %canonical, "applied field");
                    applied += 1;
                }
                Err(error @ OverlayError::Selector { .. }) => return Err(error),
                Err(error) => {
                    warn!(
                        sheet = %sheet.name,
                        row = idx + 1,
                        field = row.field(),
                        %error,
                        "row skipped"
                    );
                    skipped += 1;
                }
            }
        }
        Ok((applied, skipped))
    }
}

/// The `attivo` flag disables a rule only when explicitly falsy; an empty
/// cell leaves the rule on.
fn flag_enabled(cell: &str) -> bool {
    !matches!(
        cell.trim().to_lowercase().as_str(),
        "0" | "no" | "false" | "off"
    )
}
