//! Comma separated text.
//!
//! Values are never quoted; commas inside them become spaces.

use super::cell_text;
use crate::table::ColumnDef;
use crate::table::Row;

fn clean(text: &str) -> String {
    text.replace(',', " ")
}

/// Header line followed by one line per row, joined with `\n`.
pub(super) fn render(columns: &[ColumnDef], rows: &[Row]) -> String {
    let header = columns
        .iter()
        .map(|column| clean(column.header_text()))
        .collect::<Vec<_>>()
        .join(",");

    std::iter::once(header)
        .chain(rows.iter().map(|row| {
            columns
                .iter()
                .map(|column| clean(&cell_text(row, column)))
                .collect::<Vec<_>>()
                .join(",")
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_commas_become_spaces() {
        let columns = vec![ColumnDef::new("name", "Vendor, name"), ColumnDef::key("qty")];
        let rows = vec![row(json!({ "name": "Acme, Inc.", "qty": 3 }))];
        assert_eq!(render(&columns, &rows), "Vendor  name,qty\nAcme  Inc.,3");
    }

    #[test]
    fn test_missing_values_are_empty() {
        let columns = vec![ColumnDef::key("a"), ColumnDef::key("b")];
        let rows = vec![row(json!({ "b": null })), row(json!({ "a": true }))];
        assert_eq!(render(&columns, &rows), "a,b\n,\ntrue,");
    }

    #[test]
    fn test_header_only() {
        assert_eq!(render(&[ColumnDef::key("id")], &[]), "id");
    }
}
