//! XLSX workbook with a single sheet.

use std::path::Path;

use rust_xlsxwriter::Format;
use rust_xlsxwriter::Workbook;
use serde_json::Value;

use super::cell_text;
use crate::error::ExportError;
use crate::table::ColumnDef;
use crate::table::Row;

pub(super) fn write(columns: &[ColumnDef], rows: &[Row], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")?;

    let bold = Format::new().set_bold();
    for (col, column) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column.header_text(), &bold)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;
        for (col, column) in columns.iter().enumerate() {
            let col = col as u16;
            match row.get(&column.accessor_key) {
                None | Some(Value::Null) => {}
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(n) => {
                        worksheet.write_number(line, col, n)?;
                    }
                    None => {
                        worksheet.write_string(line, col, &n.to_string())?;
                    }
                },
                Some(Value::Bool(b)) => {
                    worksheet.write_boolean(line, col, *b)?;
                }
                Some(_) => {
                    worksheet.write_string(line, col, &cell_text(row, column))?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.xlsx");
        let columns = vec![ColumnDef::new("name", "Name"), ColumnDef::key("qty"), ColumnDef::key("active")];
        let rows = vec![
            json!({ "name": "Bolt", "qty": 12, "active": true }).as_object().cloned().unwrap(),
            json!({ "name": "Nut" }).as_object().cloned().unwrap(),
        ];
        write(&columns, &rows, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // XLSX is a zip archive.
        assert_eq!(&bytes[..2], b"PK");
    }
}
