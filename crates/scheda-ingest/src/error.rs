use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read workbook directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read sheet {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("sheet {path} has no header row")]
    MissingHeaders { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, IngestError>;
