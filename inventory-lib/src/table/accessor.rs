//! Dot-path extraction from JSON response bodies.

use std::fmt;

use serde_json::Value;

use super::Row;
use crate::error::ApiError;

/// A dot-delimited path into a JSON document, e.g. `results.content`.
///
/// Object members are looked up by name and array elements by numeric
/// index. A path that runs into a missing member or a JSON `null` resolves
/// to `None`. The empty path resolves to the document itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorPath {
    segments: Vec<String>,
}

impl AccessorPath {
    /// Parses a dotted path. Empty segments are ignored.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walks the path into `value`.
    pub fn extract<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let found = self.segments.iter().try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })?;
        (!found.is_null()).then_some(found)
    }

    /// Extracts an array of row objects.
    ///
    /// `Ok(None)` means the path did not resolve, which callers treat as an
    /// empty page. A resolved value that is not an array of objects is a
    /// parse error.
    pub fn extract_rows(&self, value: &Value) -> Result<Option<Vec<Row>>, ApiError> {
        let Some(found) = self.extract(value) else {
            return Ok(None);
        };
        let Value::Array(items) = found else {
            return Err(ApiError::parse(format!("'{}' is not an array", self)));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(row) => Ok(row.clone()),
                _ => Err(ApiError::parse(format!("'{}[{}]' is not an object", self, i))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Extracts a non-negative count. Numeric strings are accepted.
    pub fn extract_count(&self, value: &Value) -> Option<usize> {
        match self.extract(value)? {
            Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for AccessorPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for AccessorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
