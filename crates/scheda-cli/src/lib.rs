//! CLI library components for the character-sheet generator.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
