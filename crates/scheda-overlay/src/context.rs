//! Shared mutable state spanning one full run.

use crate::alias::AliasRegistry;
use crate::refs::ReferenceStore;
use crate::text::TextRule;

/// Root directory under which `inclusione_file` assets resolve.
pub const DEFAULT_ASSETS_ROOT: &str = "assets/images";

/// Aliases, stored references and the ordered substitution list, built once
/// from the configuration sheets and then read-mutated across every
/// character sheet. Constructed at run start, discarded at run end; later
/// sheets may legitimately reference content registered by earlier ones.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub aliases: AliasRegistry,
    pub refs: ReferenceStore,
    pub rules: Vec<TextRule>,
    pub assets_root: String,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            aliases: AliasRegistry::new(),
            refs: ReferenceStore::new(),
            rules: Vec::new(),
            assets_root: DEFAULT_ASSETS_ROOT.to_string(),
        }
    }
}
