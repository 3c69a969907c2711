//! Download options of a table.

use serde::Deserialize;
use serde::Serialize;

use super::ExportFormat;

/// Page orientation of a PDF export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Overrides for the computed PDF layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfOptions {
    /// Page size in points, `[width, height]` before orientation.
    #[serde(rename = "pdfDimensions", alias = "dimensions")]
    pub dimensions: Option<[f32; 2]>,
    #[serde(rename = "pdfFontSize", alias = "fontSize")]
    pub font_size: Option<f32>,
    #[serde(rename = "pdfOrientation", alias = "orientation")]
    pub orientation: Option<Orientation>,
}

impl PdfOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(mut self, width: f32, height: f32) -> Self {
        self.dimensions = Some([width, height]);
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }
}

/// Which downloads a table offers and how they are named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintOptions {
    /// Master switch for all downloads.
    pub enable_print: bool,
    pub enable_pdf: bool,
    pub enable_csv: bool,
    pub enable_excel: bool,
    /// File name without extension.
    pub file_name: String,
    pub pdf_options: Option<PdfOptions>,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            enable_print: true,
            enable_pdf: true,
            enable_csv: false,
            enable_excel: true,
            file_name: "table".to_string(),
            pdf_options: None,
        }
    }
}

impl PrintOptions {
    /// Options with every download switched off.
    pub fn disabled() -> Self {
        Self {
            enable_print: false,
            ..Default::default()
        }
    }

    pub fn enable_pdf(mut self, enabled: bool) -> Self {
        self.enable_pdf = enabled;
        self
    }

    pub fn enable_csv(mut self, enabled: bool) -> Self {
        self.enable_csv = enabled;
        self
    }

    pub fn enable_excel(mut self, enabled: bool) -> Self {
        self.enable_excel = enabled;
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    pub fn pdf_options(mut self, options: PdfOptions) -> Self {
        self.pdf_options = Some(options);
        self
    }

    pub fn is_enabled(&self, format: ExportFormat) -> bool {
        self.enable_print
            && match format {
                ExportFormat::Excel => self.enable_excel,
                ExportFormat::Csv => self.enable_csv,
                ExportFormat::Pdf => self.enable_pdf,
            }
    }

    /// Formats to offer, in menu order.
    pub fn enabled_formats(&self) -> Vec<ExportFormat> {
        ExportFormat::ALL
            .into_iter()
            .filter(|format| self.is_enabled(*format))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_formats() {
        let options = PrintOptions::default();
        assert_eq!(options.enabled_formats(), vec![ExportFormat::Excel, ExportFormat::Pdf]);
        assert_eq!(options.file_name, "table");
    }

    #[test]
    fn test_master_switch() {
        let options = PrintOptions::disabled().enable_csv(true);
        assert!(options.enabled_formats().is_empty());
        assert!(!options.is_enabled(ExportFormat::Csv));
    }

    #[test]
    fn test_deserialize_partial() {
        let options: PrintOptions = serde_json::from_str(
            r#"{"enableExcel": false, "pdfOptions": {"orientation": "landscape", "fontSize": 10}}"#,
        )
        .unwrap();
        assert_eq!(options.enabled_formats(), vec![ExportFormat::Pdf]);
        let pdf = options.pdf_options.unwrap();
        assert_eq!(pdf.orientation, Some(Orientation::Landscape));
        assert_eq!(pdf.font_size, Some(10.0));
        assert_eq!(pdf.dimensions, None);
    }

    #[test]
    fn test_pdf_options_prop_names() {
        let pdf: PdfOptions = serde_json::from_str(
            r#"{"pdfDimensions": [800, 600], "pdfFontSize": 11, "pdfOrientation": "portrait"}"#,
        )
        .unwrap();
        assert_eq!(pdf, PdfOptions::new().dimensions(800.0, 600.0).font_size(11.0).orientation(Orientation::Portrait));
        let json = serde_json::to_value(&pdf).unwrap();
        assert_eq!(json["pdfFontSize"], 11.0);
    }
}
