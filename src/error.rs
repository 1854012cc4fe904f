use std::path::PathBuf;

use thiserror::Error;

/// Failure modes when reading the student workbook.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("sheet has no header row")]
    EmptySheet,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error(transparent)]
    Workbook(#[from] calamine::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
