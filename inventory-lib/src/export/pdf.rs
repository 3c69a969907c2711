//! Paged PDF table.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::BuiltinFont;
use printpdf::IndirectFontRef;
use printpdf::Mm;
use printpdf::PdfDocument;
use printpdf::PdfLayerReference;
use printpdf::Pt;

use super::Orientation;
use super::PdfOptions;
use super::cell_text;
use crate::error::ExportError;
use crate::table::ColumnDef;
use crate::table::Row;

/// A4 in points.
const STANDARD_PAGE: [f32; 2] = [841.89, 595.28];
/// Page used for very wide tables.
const WIDE_PAGE: [f32; 2] = [3508.0, 2480.0];
/// Distance of the table from the top edge.
const TOP_MARGIN: f32 = 60.0;
/// Lowest baseline a row may sit on.
const BOTTOM_MARGIN: f32 = 40.0;
const SIDE_MARGIN: f32 = 40.0;
/// Preferred line height as a multiple of the font size.
const LINE_SPACING: f32 = 1.4;
/// Tightest line height before the text is scaled down.
const MIN_LINE_SPACING: f32 = 1.15;

/// Page geometry of a PDF export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfLayout {
    pub orientation: Orientation,
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    pub font_size: f32,
    pub rows_per_page: usize,
}

impl PdfLayout {
    /// Computes the layout for a table with `column_count` columns.
    ///
    /// Tables with more than 7 columns are landscape; more than 20 columns
    /// switch to a large page and a small font. Any value set in `options`
    /// wins.
    pub fn plan(column_count: usize, options: Option<&PdfOptions>) -> Self {
        let options = options.cloned().unwrap_or_default();
        let orientation = options.orientation.unwrap_or(if column_count > 7 {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        });
        let [a, b] = options
            .dimensions
            .unwrap_or(if column_count > 20 { WIDE_PAGE } else { STANDARD_PAGE });
        let (long, short) = if a >= b { (a, b) } else { (b, a) };
        let (width, height) = match orientation {
            Orientation::Landscape => (long, short),
            Orientation::Portrait => (short, long),
        };
        let font_size = options
            .font_size
            .unwrap_or(if column_count > 20 { 8.0 } else { 12.0 });
        let rows_per_page = if font_size > 8.0 { 50 } else { 100 };

        Self {
            orientation,
            width,
            height,
            font_size,
            rows_per_page,
        }
    }

    /// Number of pages `row_count` rows take. Never zero.
    pub fn page_count(&self, row_count: usize) -> usize {
        row_count.div_ceil(self.rows_per_page).max(1)
    }

    /// Distance between baselines. Shrinks so the header plus a full chunk
    /// of rows always stays above [`BOTTOM_MARGIN`].
    pub fn line_height(&self) -> f32 {
        let available = (self.height - TOP_MARGIN - BOTTOM_MARGIN).max(0.0);
        (self.font_size * LINE_SPACING).min(available / self.rows_per_page as f32)
    }

    /// Font size actually drawn: `font_size`, scaled down when the lines
    /// got too tight for it.
    pub fn text_size(&self) -> f32 {
        self.font_size.min(self.line_height() / MIN_LINE_SPACING)
    }

    /// Baseline of line `line` on a page, the header being line 0.
    pub fn baseline(&self, line: usize) -> f32 {
        self.height - TOP_MARGIN - line as f32 * self.line_height()
    }
}

pub(super) fn write(
    layout: &PdfLayout,
    title: &str,
    columns: &[ColumnDef],
    rows: &[Row],
    path: &Path,
) -> Result<(), ExportError> {
    let width = Mm::from(Pt(layout.width));
    let height = Mm::from(Pt(layout.height));
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Table");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut chunks: Vec<&[Row]> = rows.chunks(layout.rows_per_page).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }

    for (number, chunk) in chunks.into_iter().enumerate() {
        let layer = if number == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(width, height, "Table");
            doc.get_page(page).get_layer(layer)
        };
        draw_block(&layer, layout, columns, chunk, &font, &bold);
    }

    doc.save(&mut BufWriter::new(File::create(path)?))?;
    Ok(())
}

/// Header plus `rows`, starting [`TOP_MARGIN`] below the top edge.
fn draw_block(
    layer: &PdfLayerReference,
    layout: &PdfLayout,
    columns: &[ColumnDef],
    rows: &[Row],
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    if columns.is_empty() {
        return;
    }
    let column_width = (layout.width - 2.0 * SIDE_MARGIN) / columns.len() as f32;
    let size = layout.text_size();
    // Helvetica averages about half an em per glyph.
    let max_chars = ((column_width / (size * 0.5)) as usize).max(1);

    let y = layout.baseline(0);
    for (col, column) in columns.iter().enumerate() {
        let x = SIDE_MARGIN + col as f32 * column_width;
        layer.use_text(
            fit(column.header_text(), max_chars),
            size,
            Mm::from(Pt(x)),
            Mm::from(Pt(y)),
            bold,
        );
    }

    for (index, row) in rows.iter().enumerate() {
        let y = layout.baseline(index + 1);
        for (col, column) in columns.iter().enumerate() {
            let text = cell_text(row, column);
            if text.is_empty() {
                continue;
            }
            let x = SIDE_MARGIN + col as f32 * column_width;
            layer.use_text(
                fit(&text, max_chars),
                size,
                Mm::from(Pt(x)),
                Mm::from(Pt(y)),
                font,
            );
        }
    }
}

fn fit(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wide_table_layout() {
        let layout = PdfLayout::plan(25, None);
        assert_eq!(layout.orientation, Orientation::Landscape);
        assert_eq!((layout.width, layout.height), (3508.0, 2480.0));
        assert_eq!(layout.font_size, 8.0);
        assert_eq!(layout.rows_per_page, 100);
    }

    #[test]
    fn test_narrow_table_layout() {
        let layout = PdfLayout::plan(5, None);
        assert_eq!(layout.orientation, Orientation::Portrait);
        assert_eq!((layout.width, layout.height), (595.28, 841.89));
        assert_eq!(layout.font_size, 12.0);
        assert_eq!(layout.rows_per_page, 50);

        let layout = PdfLayout::plan(8, None);
        assert_eq!(layout.orientation, Orientation::Landscape);
        assert_eq!((layout.width, layout.height), (841.89, 595.28));
    }

    #[test]
    fn test_overrides_win() {
        let options = PdfOptions::new()
            .orientation(Orientation::Portrait)
            .font_size(10.0);
        let layout = PdfLayout::plan(25, Some(&options));
        assert_eq!((layout.width, layout.height), (2480.0, 3508.0));
        assert_eq!(layout.rows_per_page, 50);
    }

    #[test]
    fn test_page_count() {
        let layout = PdfLayout::plan(3, None);
        assert_eq!(layout.page_count(0), 1);
        assert_eq!(layout.page_count(50), 1);
        assert_eq!(layout.page_count(101), 3);
    }

    #[test]
    fn test_full_chunk_stays_on_page() {
        let landscape = PdfLayout::plan(8, None);
        let portrait = PdfLayout::plan(3, None);
        let larger_font = PdfLayout::plan(8, Some(&PdfOptions::new().font_size(10.0)));
        let wide = PdfLayout::plan(25, None);
        for layout in [landscape, portrait, larger_font, wide] {
            let last = layout.baseline(layout.rows_per_page);
            assert!(last >= BOTTOM_MARGIN - 0.01, "{:?} puts its last row at {}", layout, last);
            assert!(layout.text_size() > 0.0);
            assert!(layout.text_size() <= layout.font_size);
        }
    }

    #[test]
    fn test_roomy_page_keeps_font_size() {
        let layout = PdfLayout::plan(25, None);
        assert_eq!(layout.line_height(), 8.0 * LINE_SPACING);
        assert_eq!(layout.text_size(), 8.0);
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("abcdefgh", 5), "ab...");
    }

    #[test]
    fn test_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.pdf");
        let columns = vec![ColumnDef::new("name", "Name")];
        let rows: Vec<Row> = (0..120)
            .map(|i| json!({ "name": format!("row {}", i) }).as_object().cloned().unwrap())
            .collect();
        write(&PdfLayout::plan(1, None), "table", &columns, &rows, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
