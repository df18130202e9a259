use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the failures that abort an export run. Recoverable
/// per-record problems (bad dates, duplicate rows) never surface here; they
/// are downgraded to diagnostic entries by the flattening walk.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the input document is not well-formed XML.
    #[error("failed to parse XML document: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Errors bubbled up from the CSV writer.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when neither the command line nor the prompts produced a path.
    #[error("no XML file selected")]
    NoInputSelected,

    /// Raised when the resolved input path does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
