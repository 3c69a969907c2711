//! Login and registration data contracts.

use reqwest::Method;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use super::OK_RANGE;
use super::StatusMessage;
use super::routes;
use crate::InventoryClient;
use crate::RequestBody;
use crate::error::AuthError;
use crate::error::Error;

/// Email/password pair sent to `auth/login` and `auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// The authenticated user as returned by the backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    /// Any other fields the backend includes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

impl InventoryClient {
    /// Logs in and returns the user with their bearer token.
    ///
    /// Use [`with_token`](Self::with_token) to get a client that
    /// authenticates with it.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, Error> {
        let body = serde_json::to_value(credentials).map_err(|e| AuthError::Parse(e.to_string()))?;
        let envelope = self
            .send(Method::POST, routes::LOGIN, RequestBody::Json(body), false)
            .await?;

        if !OK_RANGE.contains(&envelope.status()) {
            return Err(AuthError::InvalidCredentials {
                message: envelope.message.unwrap_or_else(|| "Login failed".to_string()),
            }
            .into());
        }

        let token = envelope.token.ok_or(AuthError::MissingToken)?;
        let user = envelope
            .user
            .ok_or_else(|| AuthError::Parse("login response has no user".to_string()))?;
        let user: User = serde_json::from_value(user).map_err(|e| AuthError::Parse(e.to_string()))?;

        Ok(LoginResponse { user, token })
    }

    /// Registers a new user.
    pub async fn register(&self, credentials: &Credentials) -> Result<StatusMessage, Error> {
        let body = serde_json::to_value(credentials).map_err(|e| AuthError::Parse(e.to_string()))?;
        let envelope = self
            .send(Method::POST, routes::REGISTER, RequestBody::Json(body), false)
            .await?;

        let status = envelope.status();
        if !(201..400).contains(&status) {
            return Err(AuthError::RegistrationFailed {
                status,
                message: envelope
                    .message
                    .unwrap_or_else(|| "Failed to Create Auth User".to_string()),
            }
            .into());
        }

        Ok(envelope.into_status_message("Registered"))
    }
}
