//! A workbook is a directory of CSV files, one per spreadsheet tab.
//! The file stem is the sheet name, so configuration sheets keep their
//! leading-dot names (`.riferimenti.csv` reads as sheet `.riferimenti`).

use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::debug;

use scheda_model::Sheet;

use crate::error::{IngestError, Result};

/// All sheets of one workbook, in file-name order.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// List the CSV files of a workbook directory, sorted by file name so
/// sheet order is stable across runs.
pub fn list_sheet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| IngestError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every sheet of the workbook.
pub fn load_workbook(dir: &Path) -> Result<Workbook> {
    let mut sheets = Vec::new();
    for path in list_sheet_files(dir)? {
        let sheet = read_sheet(&path)?;
        debug!(sheet = %sheet.name, rows = sheet.row_count(), "loaded sheet");
        sheets.push(sheet);
    }
    Ok(Workbook { sheets })
}

/// Read one CSV file into a sheet, keeping column order. Values are
/// trimmed; a BOM on the first header is stripped.
pub fn read_sheet(path: &Path) -> Result<Sheet> {
    let name = sheet_name(path);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| csv_error(path, &source))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| csv_error(path, &source))?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim().to_string())
        .collect();
    if headers.is_empty() {
        return Err(IngestError::MissingHeaders {
            path: path.to_path_buf(),
        });
    }

    let mut sheet = Sheet::new(name, headers);
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(path, &source))?;
        let cells: Vec<String> = record.iter().map(|cell| cell.trim().to_string()).collect();
        sheet.rows.push(cells);
    }
    Ok(sheet)
}

fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn csv_error(path: &Path, source: &csv::Error) -> IngestError {
    IngestError::Csv {
        path: path.to_path_buf(),
        message: source.to_string(),
    }
}
