use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    /// A `$`-include targeted an id that was never stored.
    #[error("unknown reference '{0}'")]
    UnknownReference(String),

    /// Selector traversal hit a type mismatch or an out-of-range index.
    /// These indicate a structural template bug and abort the run.
    #[error("cannot resolve selector '{selector}' at '{token}': {message}")]
    Selector {
        selector: String,
        token: String,
        message: String,
    },

    #[error("invalid substitution pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Failure from the version store behind the `SheetVersioner` seam.
    #[error("version store: {0}")]
    Version(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
