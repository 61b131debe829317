//! Archival output consumed by the external templating/PDF stages.
//!
//! Each character document is written as `<name>.json`; the run manifest
//! lists the {title, version} info record handed to templating alongside
//! every document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use scheda_model::{Document, Version};

/// Info record for one produced document, keyed by sheet name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Document title: the sheet name.
    pub title: String,
    pub version: Version,
    /// Archive file the document was written to, relative to the output dir.
    pub file: String,
}

/// Make sure the output directory exists and return it.
pub fn prepare_output_dir(dir: &Path) -> Result<&Path> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create output directory {}", dir.display()))?;
    Ok(dir)
}

/// Write one character document as pretty JSON under the output dir.
pub fn write_document(output_dir: &Path, name: &str, document: &Document) -> Result<PathBuf> {
    let path = output_dir.join(format!("{}.json", sanitize_file_name(name)));
    let raw = serde_json::to_string_pretty(document)
        .with_context(|| format!("serialize document '{name}'"))?;
    fs::write(&path, raw).with_context(|| format!("write document {}", path.display()))?;
    debug!(document = name, path = %path.display(), "archived document");
    Ok(path)
}

/// Write the run manifest listing every produced document.
pub fn write_manifest(output_dir: &Path, entries: &[ManifestEntry]) -> Result<PathBuf> {
    let path = output_dir.join("manifest.json");
    let raw = serde_json::to_string_pretty(entries).context("serialize manifest")?;
    fs::write(&path, raw).with_context(|| format!("write manifest {}", path.display()))?;
    Ok(path)
}

/// Sheet names come from human-authored tabs; keep them filesystem-safe.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, '-' | '_' | ' ' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}
