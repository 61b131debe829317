//! Bidirectional alias lookup between short ids and canonical field paths.

use std::collections::BTreeMap;

/// Maps human-assigned short ids to canonical selector fragments and back.
///
/// Seeded from the reference-alias configuration sheet, then extended at run
/// time: every unique reference that resolves successfully is registered
/// against the fully materialized canonical path it landed on.
/// Last-write-wins on redefinition; entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    forward: BTreeMap<String, String>,
    reverse: BTreeMap<String, String>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        let alias = alias.into();
        let canonical = canonical.into();
        self.reverse.insert(canonical.clone(), alias.clone());
        self.forward.insert(alias, canonical);
    }

    /// Resolve a selector token. Unknown tokens come back unchanged:
    /// aliases are optional shorthand, not mandatory.
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        self.forward.get(token).map_or(token, String::as_str)
    }

    pub fn alias_for(&self, canonical: &str) -> Option<&str> {
        self.reverse.get(canonical).map(String::as_str)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.forward.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
