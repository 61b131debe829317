//! Store of resolved content blocks keyed by unique reference id.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{OverlayError, Result};

/// Holds the last-resolved document node for every unique reference, so
/// later rows can include a previously defined block instead of
/// re-specifying it. Stored values may legitimately be `null`.
#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    contents: BTreeMap<String, Value>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, ref_id: impl Into<String>, content: Value) {
        self.contents.insert(ref_id.into(), content);
    }

    pub fn get(&self, ref_id: &str) -> Result<&Value> {
        self.contents
            .get(ref_id)
            .ok_or_else(|| OverlayError::UnknownReference(ref_id.to_string()))
    }

    pub fn contains(&self, ref_id: &str) -> bool {
        self.contents.contains_key(ref_id)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
