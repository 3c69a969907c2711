//! Download artifacts of a table page.
//!
//! Each format turns the given columns and rows into a file named
//! `<file_name>.<ext>` inside the exporter's output directory.

mod csv;
mod excel;
mod options;
mod pdf;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use log::info;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

pub use options::*;
pub use pdf::PdfLayout;

use crate::error::ExportError;
use crate::table::ColumnDef;
use crate::table::Row;

/// A download format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Excel,
    Csv,
    Pdf,
}

impl ExportFormat {
    /// Every format, in menu order.
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Excel, ExportFormat::Csv, ExportFormat::Pdf];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Excel => "xlsx",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Excel => "excel",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "excel" | "xlsx" => Ok(Self::Excel),
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// Text of the cell of `column` in `row`.
///
/// Missing and null values are empty, strings are verbatim, arrays and
/// objects are compact JSON.
pub fn cell_text(row: &Row, column: &ColumnDef) -> String {
    match row.get(&column.accessor_key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Writes export files into a directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    out_dir: PathBuf,
    pdf_options: Option<PdfOptions>,
}

impl Exporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            pdf_options: None,
        }
    }

    /// Overrides the computed PDF layout.
    pub fn pdf_options(mut self, options: Option<PdfOptions>) -> Self {
        self.pdf_options = options;
        self
    }

    /// Path the export of `file_name` in `format` is written to.
    pub fn path_for(&self, format: ExportFormat, file_name: &str) -> PathBuf {
        self.out_dir.join(format!("{}.{}", file_name, format.extension()))
    }

    /// Writes `rows` in `format` and returns the written file.
    pub fn export(
        &self,
        format: ExportFormat,
        columns: &[ColumnDef],
        rows: &[Row],
        file_name: &str,
    ) -> Result<PathBuf, ExportError> {
        let path = self.path_for(format, file_name);
        match format {
            ExportFormat::Excel => excel::write(columns, rows, &path)?,
            ExportFormat::Csv => std::fs::write(&path, csv::render(columns, rows))?,
            ExportFormat::Pdf => {
                let layout = PdfLayout::plan(columns.len(), self.pdf_options.as_ref());
                pdf::write(&layout, file_name, columns, rows, &path)?
            }
        }
        info!("exported {} rows as {} to {}", rows.len(), format, path.display());
        Ok(path)
    }
}
