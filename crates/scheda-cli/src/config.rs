//! TOML run configuration with CLI-overridable paths and prefixes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default config file looked up next to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "scheda.toml";

/// Everything a run needs to know that is not on the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Workbook directory holding one CSV file per sheet.
    pub workbook_dir: PathBuf,
    /// Where documents and the manifest land.
    pub output_dir: PathBuf,
    /// Persisted version cache.
    pub cache_path: PathBuf,
    /// Root folder asset references resolve under.
    pub assets_root: String,
    /// Sheet-name prefix marking configuration-only sheets.
    pub hidden_prefix: String,
    /// Sheet-name prefix marking handout sheets.
    pub handout_prefix: String,
    /// Name of the default-template sheet.
    pub template_sheet: String,
    /// Name of the reference-alias sheet.
    pub aliases_sheet: String,
    /// Name of the pattern-substitution sheet.
    pub rules_sheet: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workbook_dir: PathBuf::from("workbook"),
            output_dir: PathBuf::from("build"),
            cache_path: PathBuf::from("build/versions.json"),
            assets_root: "assets/images".to_string(),
            hidden_prefix: ".".to_string(),
            handout_prefix: "PNG".to_string(),
            template_sheet: ".default".to_string(),
            aliases_sheet: ".riferimenti".to_string(),
            rules_sheet: ".sostituzioni".to_string(),
        }
    }
}

impl RunConfig {
    /// Load from an explicit config file, or from `scheda.toml` when it
    /// exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parse config {}", path.display()))
    }
}
