//! Semantic version advancement driven by structural row hashes.

use std::path::Path;

use tracing::{debug, info};

use scheda_model::{Sheet, Version, VersionRecord};
use scheda_overlay::{OverlayError, SheetVersioner};

use crate::cache::VersionCache;
use crate::error::{Result, VersionError};
use crate::hash::sha256_hex;

/// Stamps each sheet with a version derived from two structural hashes:
/// the keys hash over the first column of every row, and the content hash
/// over everything else. A keys change bumps minor and resets patch; a
/// content-only change bumps patch; a sheet never seen before starts at
/// the baseline without bumping.
#[derive(Debug)]
pub struct ContentVersioner {
    cache: VersionCache,
    write_through: bool,
}

impl ContentVersioner {
    pub fn open(cache_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            cache: VersionCache::load(cache_path.as_ref())?,
            write_through: true,
        })
    }

    /// Disable persistence; version decisions stay in memory. Used by
    /// dry runs so previewing a workbook never advances versions on disk.
    #[must_use]
    pub fn with_write_through(mut self, enabled: bool) -> Self {
        self.write_through = enabled;
        self
    }

    pub fn cache(&self) -> &VersionCache {
        &self.cache
    }

    pub fn advance(&mut self, sheet: &Sheet) -> Result<VersionRecord> {
        let (content_hash, keys_hash) = sheet_hashes(sheet)?;
        let record = match self.cache.get(&sheet.name) {
            None => {
                debug!(sheet = %sheet.name, "first run, baseline version");
                VersionRecord::baseline(content_hash, keys_hash)
            }
            Some(previous) => {
                let version = next_version(previous, &content_hash, &keys_hash);
                if version != previous.version {
                    info!(
                        sheet = %sheet.name,
                        from = %previous.version,
                        to = %version,
                        "version bumped"
                    );
                }
                VersionRecord {
                    version,
                    content_hash,
                    keys_hash,
                }
            }
        };
        self.cache.insert(sheet.name.clone(), record.clone());
        if self.write_through {
            self.cache.save()?;
        }
        Ok(record)
    }
}

impl SheetVersioner for ContentVersioner {
    fn next_version(
        &mut self,
        sheet: &Sheet,
    ) -> scheda_overlay::Result<VersionRecord> {
        self.advance(sheet)
            .map_err(|error| OverlayError::Version(error.to_string()))
    }
}

fn next_version(previous: &VersionRecord, content_hash: &str, keys_hash: &str) -> Version {
    if previous.keys_hash != keys_hash {
        previous.version.bump_minor()
    } else if previous.content_hash != content_hash {
        previous.version.bump_patch()
    } else {
        previous.version
    }
}

/// Hash a sheet's rows at the two granularities: content excludes the
/// first column, keys is the first column alone, both in row order.
pub fn sheet_hashes(sheet: &Sheet) -> Result<(String, String)> {
    let content: Vec<Vec<&str>> = sheet
        .rows
        .iter()
        .map(|cells| cells.iter().skip(1).map(String::as_str).collect())
        .collect();
    let keys: Vec<&str> = sheet
        .rows
        .iter()
        .map(|cells| cells.first().map_or("", String::as_str))
        .collect();
    let content_bytes =
        serde_json::to_vec(&content).map_err(|source| VersionError::Serialize {
            sheet: sheet.name.clone(),
            source,
        })?;
    let keys_bytes = serde_json::to_vec(&keys).map_err(|source| VersionError::Serialize {
        sheet: sheet.name.clone(),
        source,
    })?;
    Ok((sha256_hex(&content_bytes), sha256_hex(&keys_bytes)))
}
