//! Response envelope shared by every inventory endpoint.

use std::ops::Range;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Status codes accepted by read, update and delete operations.
pub const OK_RANGE: Range<u16> = 200..400;

/// Status codes accepted by create operations.
pub const CREATED_RANGE: Range<u16> = 201..400;

/// JSON envelope returned by the inventory backend.
///
/// ```json
/// { "status_code": 200, "message": "ok", "results": [...] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    /// Application status code. Falls back to the HTTP status when absent.
    #[serde(default, deserialize_with = "status_from_number_or_string")]
    pub status_code: Option<u16>,
    /// Human readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload of read operations.
    #[serde(default)]
    pub results: Option<Value>,
    /// Authenticated user (login only).
    #[serde(default)]
    pub user: Option<Value>,
    /// Bearer token (login only).
    #[serde(default)]
    pub token: Option<String>,
}

/// Status code and message returned by mutating operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub status_code: u16,
    pub message: String,
}

impl Envelope {
    /// Creates an empty envelope carrying only a status code.
    pub fn from_status(status: u16) -> Self {
        Self {
            status_code: Some(status),
            ..Default::default()
        }
    }

    /// Returns the status code, or 0 if none was recorded.
    pub fn status(&self) -> u16 {
        self.status_code.unwrap_or_default()
    }

    /// Fails with [`ApiError::Http`] unless the status lies in `accepted`.
    pub fn ensure(self, accepted: Range<u16>, fallback: &str) -> Result<Self, ApiError> {
        let status = self.status();
        if accepted.contains(&status) {
            Ok(self)
        } else {
            let message = self.message.unwrap_or_else(|| fallback.to_string());
            Err(ApiError::http(status, message))
        }
    }

    /// Deserializes the `results` payload.
    pub fn results<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let results = self
            .results
            .ok_or_else(|| ApiError::parse("response has no results"))?;
        serde_json::from_value(results).map_err(|e| ApiError::parse(e.to_string()))
    }

    /// Converts into a [`StatusMessage`], using `fallback` when the server
    /// sent no message.
    pub fn into_status_message(self, fallback: &str) -> StatusMessage {
        StatusMessage {
            status_code: self.status(),
            message: self.message.unwrap_or_else(|| fallback.to_string()),
        }
    }
}

fn status_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_status_accepts_string() {
        let envelope: Envelope = serde_json::from_value(json!({"status_code": "201"})).unwrap();
        assert_eq!(envelope.status_code, Some(201));
    }

    #[test]
    fn test_ensure_uses_fallback_message() {
        let err = Envelope::from_status(500)
            .ensure(OK_RANGE, "Failed to delete Inventory!")
            .unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert!(err.to_string().contains("Failed to delete Inventory!"));
    }

    #[test]
    fn test_create_range_rejects_200() {
        assert!(Envelope::from_status(200).ensure(CREATED_RANGE, "x").is_err());
        assert!(Envelope::from_status(201).ensure(CREATED_RANGE, "x").is_ok());
    }

    #[test]
    fn test_results_missing() {
        let err = Envelope::from_status(200).results::<Vec<Value>>().unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }));
    }
}
