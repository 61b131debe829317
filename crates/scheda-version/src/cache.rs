//! On-disk version cache, written through after every sheet decision.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use scheda_model::VersionRecord;

use crate::error::{Result, VersionError};

/// Per-sheet-name persisted version records. A missing cache file is an
/// empty cache, not an error: it marks the first-ever run.
#[derive(Debug, Clone)]
pub struct VersionCache {
    path: PathBuf,
    records: BTreeMap<String, VersionRecord>,
}

impl VersionCache {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| VersionError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(VersionError::Read {
                    path: path.clone(),
                    source,
                });
            }
        };
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, sheet_name: &str) -> Option<&VersionRecord> {
        self.records.get(sheet_name)
    }

    pub fn insert(&mut self, sheet_name: impl Into<String>, record: VersionRecord) {
        self.records.insert(sheet_name.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flush the whole cache to disk. Called after each sheet's version
    /// decision so a crash partway through a run keeps committed bumps.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| VersionError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let raw = serde_json::to_string_pretty(&self.records).map_err(|source| {
            VersionError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, raw).map_err(|source| VersionError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
