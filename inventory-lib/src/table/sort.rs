//! Client-side ordering of the loaded page.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Column the loaded page is ordered by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub accessor_key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortState {
    pub fn asc(accessor_key: impl Into<String>) -> Self {
        Self {
            accessor_key: accessor_key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(accessor_key: impl Into<String>) -> Self {
        Self {
            accessor_key: accessor_key.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Stable sort of `rows`. Missing and null values go last in either
    /// direction.
    pub fn apply(&self, rows: &mut [Row]) {
        rows.sort_by(|a, b| {
            let (a, b) = (value_of(a, &self.accessor_key), value_of(b, &self.accessor_key));
            match (a, b) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => {
                    let ordering = compare_values(a, b);
                    match self.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                }
            }
        });
    }
}

fn value_of<'a>(row: &'a Row, key: &str) -> Option<&'a Value> {
    row.get(key).filter(|value| !value.is_null())
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Orders numbers numerically and strings lexicographically; values of
/// different types are ordered by type.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
            a.total_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            a.to_string().cmp(&b.to_string())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
