//! Typed results handed from the pipeline to the summary printer.

use std::path::PathBuf;

/// Per-sheet outcome for the end-of-run summary.
#[derive(Debug, Clone)]
pub struct SheetSummary {
    pub name: String,
    pub version: String,
    pub handout: bool,
    pub rows_applied: usize,
    pub rows_skipped: usize,
    pub notes: usize,
}

/// Outcome of a whole build run.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub manifest: Option<PathBuf>,
    pub sheets: Vec<SheetSummary>,
    pub dry_run: bool,
}

impl RunResult {
    /// A run that skipped rows produced incomplete documents.
    pub fn has_errors(&self) -> bool {
        self.sheets.iter().any(|sheet| sheet.rows_skipped > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
