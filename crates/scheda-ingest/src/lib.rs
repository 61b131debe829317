pub mod error;
pub mod workbook;

pub use error::{IngestError, Result};
pub use workbook::{Workbook, list_sheet_files, load_workbook, read_sheet};
