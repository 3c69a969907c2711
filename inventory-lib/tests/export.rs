//! Downloads of a loaded table page.

use inventory_lib::error::ExportError;
use inventory_lib::export::ExportFormat;
use inventory_lib::export::PdfLayout;
use inventory_lib::export::PrintOptions;
use inventory_lib::table::ColumnDef;
use inventory_lib::table::DataTable;
use inventory_lib::table::Row;
use inventory_lib::table::TableConfig;
use serde_json::json;

fn rows() -> Vec<Row> {
    vec![
        json!({ "id": 1, "vendor": "Acme, Inc.", "qty": 4 }),
        json!({ "id": 2, "vendor": "Globex", "qty": null }),
        json!({ "id": 3, "vendor": "Initech", "qty": 9 }),
    ]
    .into_iter()
    .map(|value| value.as_object().cloned().unwrap())
    .collect()
}

async fn table(options: PrintOptions) -> DataTable {
    let config = TableConfig::local(
        vec![ColumnDef::new("vendor", "Vendor"), ColumnDef::key("qty")],
        rows(),
    )
    .page_size(2)
    .print_options(options);
    DataTable::mount(config).await.unwrap()
}

#[tokio::test]
async fn test_csv_exports_current_page_only() {
    let dir = tempfile::tempdir().unwrap();
    let table = table(PrintOptions::default().enable_csv(true).file_name("vendors")).await;

    let path = table.export(ExportFormat::Csv, dir.path()).unwrap();
    assert_eq!(path, dir.path().join("vendors.csv"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Vendor,qty\nAcme  Inc.,4\nGlobex,"
    );
}

#[tokio::test]
async fn test_excel_and_pdf_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = table(PrintOptions::default()).await;
    table.goto_page(1).await;

    let xlsx = table.export(ExportFormat::Excel, dir.path()).unwrap();
    assert_eq!(xlsx.file_name().unwrap(), "table.xlsx");
    assert!(std::fs::metadata(&xlsx).unwrap().len() > 0);

    let pdf = table.export(ExportFormat::Pdf, dir.path()).unwrap();
    assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_disabled_formats_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let table = table(PrintOptions::disabled()).await;
    for format in ExportFormat::ALL {
        let err = table.export(format, dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::FormatDisabled(f) if f == format));
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_wide_table_pdf_layout() {
    let layout = PdfLayout::plan(25, None);
    assert!(layout.width > layout.height);
    assert_eq!(layout.font_size, 8.0);
    assert_eq!(layout.page_count(250), 3);
}
