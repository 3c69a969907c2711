//! Export error types

use crate::export::ExportFormat;

/// Errors raised while producing a download artifact.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The spreadsheet writer failed.
    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The PDF writer failed.
    #[error("PDF write error: {0}")]
    Pdf(#[from] printpdf::Error),

    /// The format is switched off in the table's print options.
    #[error("{0} export is disabled for this table")]
    FormatDisabled(ExportFormat),
}
