pub mod cache;
pub mod error;
pub mod hash;
pub mod versioner;

pub use cache::VersionCache;
pub use error::{Result, VersionError};
pub use hash::sha256_hex;
pub use versioner::{ContentVersioner, sheet_hashes};
