//! Authentication error types

/// Errors that can occur while logging in, registering or resolving a token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The server rejected the email/password pair.
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    /// Registration was refused by the server.
    #[error("Registration failed ({status}): {message}")]
    RegistrationFailed { status: u16, message: String },

    /// No access token is available: none was configured, it expired, or
    /// the login response did not carry one.
    #[error("No access token available")]
    MissingToken,

    /// Network error during authentication.
    #[error("Network error during auth: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to parse authentication response.
    #[error("Auth response parse error: {0}")]
    Parse(String),
}
