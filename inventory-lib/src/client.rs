//! Main InventoryClient

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use reqwest::Method;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use serde_json::Value;

use crate::api::Envelope;
use crate::auth::StaticTokenProvider;
use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::AuthError;
use crate::error::Error;
use crate::retry::RetryConfig;
use crate::transport;

/// Client for the inventory REST API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks.
///
/// # Example
///
/// ```ignore
/// use inventory_lib::{InventoryClient, auth::StaticTokenProvider};
///
/// let client = InventoryClient::builder()
///     .url("https://inventory.example.com/api")
///     .token_provider(StaticTokenProvider::new("my-token"))
///     .build()?;
///
/// let inventories = client.list_inventories(42).await?;
/// ```
#[derive(Clone)]
pub struct InventoryClient {
    inner: Arc<InventoryClientInner>,
}

struct InventoryClientInner {
    base_url: String,
    token_provider: Option<Arc<dyn TokenProvider>>,
    http_client: Client,
    timeout: Option<Duration>,
    retry_config: RetryConfig,
}

/// Body of an API request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON-encoded body.
    Json(Value),
    /// `multipart/form-data` body.
    Form(Vec<FormField>),
}

/// One field of a multipart form.
#[derive(Debug, Clone)]
pub struct FormField {
    /// Field name.
    pub name: String,
    /// Field content.
    pub value: FormValue,
}

/// Content of a multipart form field.
#[derive(Debug, Clone)]
pub enum FormValue {
    /// Plain text value.
    Text(String),
    /// File upload.
    File {
        /// File name reported to the server.
        file_name: String,
        /// Raw file contents.
        bytes: Vec<u8>,
    },
}

impl FormField {
    /// Creates a text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    /// Creates a file field.
    pub fn file(name: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File {
                file_name: file_name.into(),
                bytes,
            },
        }
    }
}

fn build_form(fields: &[FormField]) -> Form {
    fields.iter().fold(Form::new(), |form, field| match &field.value {
        FormValue::Text(text) => form.text(field.name.clone(), text.clone()),
        FormValue::File { file_name, bytes } => form.part(
            field.name.clone(),
            Part::bytes(bytes.clone()).file_name(file_name.clone()),
        ),
    })
}

impl InventoryClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> InventoryClientBuilder<Missing> {
        InventoryClientBuilder::new()
    }

    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns a client sharing this one's settings but authenticating with
    /// `token`.
    ///
    /// Typically used with the token returned by [`login`](Self::login).
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(InventoryClientInner {
                base_url: self.inner.base_url.clone(),
                token_provider: Some(Arc::new(StaticTokenProvider::new(token))),
                http_client: self.inner.http_client.clone(),
                timeout: self.inner.timeout,
                retry_config: self.inner.retry_config.clone(),
            }),
        }
    }

    /// Joins `path` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Sends a request and parses the JSON envelope.
    ///
    /// The envelope's `status_code` defaults to the HTTP status when the body
    /// does not carry one. Callers decide which status codes count as
    /// success; only transport and parse failures are errors here, plus 429
    /// after retries are exhausted.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        authenticated: bool,
    ) -> Result<Envelope, Error> {
        let url = self.endpoint(path);

        let bearer = if authenticated {
            let provider = self
                .inner
                .token_provider
                .as_ref()
                .ok_or(AuthError::MissingToken)?;
            Some(provider.get_token(&self.inner.base_url).await?.access_token)
        } else {
            None
        };

        debug!("{} {}", method, url);

        let response = transport::send_with_retry(
            &self.inner.http_client,
            &self.inner.retry_config,
            self.inner.timeout,
            |client| {
                let mut request = client.request(method.clone(), &url);
                if let Some(token) = &bearer {
                    request = request.bearer_auth(token);
                }
                match &body {
                    RequestBody::Empty => request,
                    RequestBody::Json(value) => request.json(value),
                    RequestBody::Form(fields) => request.multipart(build_form(fields)),
                }
            },
        )
        .await?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(Error::RateLimit {
                retry_after: transport::parse_retry_after(&response),
            });
        }

        let text = response.text().await.map_err(ApiError::from)?;
        if text.trim().is_empty() {
            return Ok(Envelope::from_status(status));
        }

        let mut envelope: Envelope = serde_json::from_str(&text)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), text.clone()))?;
        envelope.status_code.get_or_insert(status);
        Ok(envelope)
    }
}

impl std::fmt::Debug for InventoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryClient")
            .field("base_url", &self.inner.base_url)
            .field("authenticated", &self.inner.token_provider.is_some())
            .field("timeout", &self.inner.timeout)
            .field("retry_config", &self.inner.retry_config)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`InventoryClient`].
///
/// Uses the typestate pattern so `build` is only available once the base
/// URL is set.
///
/// # Example
///
/// ```ignore
/// let client = InventoryClient::builder()
///     .url("https://inventory.example.com/api")
///     .token_provider(my_provider)
///     .timeout(Duration::from_secs(30))
///     .retry_config(RetryConfig::default().max_retries(5))
///     .build()?;
/// ```
pub struct InventoryClientBuilder<Url> {
    url: Url,
    token_provider: Option<Arc<dyn TokenProvider>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry_config: RetryConfig,
    http_client: Option<Client>,
}

impl InventoryClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: None,
            timeout: None,
            connect_timeout: None,
            retry_config: RetryConfig::default(),
            http_client: None,
        }
    }

    /// Sets the API base URL.
    pub fn url(self, url: impl Into<String>) -> InventoryClientBuilder<Set<String>> {
        InventoryClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            retry_config: self.retry_config,
            http_client: self.http_client,
        }
    }
}

impl Default for InventoryClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> InventoryClientBuilder<U> {
    /// Sets the token provider for authenticated endpoints.
    ///
    /// Without one, only `login` and `register` can be called.
    pub fn token_provider<T: TokenProvider + 'static>(mut self, provider: T) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the retry behaviour.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl InventoryClientBuilder<Set<String>> {
    /// Builds the [`InventoryClient`].
    pub fn build(self) -> Result<InventoryClient, Error> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::from)?
            }
        };

        Ok(InventoryClient {
            inner: Arc::new(InventoryClientInner {
                base_url: self.url.0,
                token_provider: self.token_provider,
                http_client,
                timeout: self.timeout,
                retry_config: self.retry_config,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_slashes() {
        let client = InventoryClient::builder()
            .url("http://localhost:8080/api/")
            .build()
            .unwrap();
        assert_eq!(client.endpoint("/inventory/list"), "http://localhost:8080/api/inventory/list");
        assert_eq!(client.endpoint("auth/login"), "http://localhost:8080/api/auth/login");
    }

    #[tokio::test]
    async fn test_authenticated_call_without_token_fails() {
        let client = InventoryClient::builder()
            .url("http://127.0.0.1:9")
            .retry_config(RetryConfig::no_retry())
            .build()
            .unwrap();
        let err = client
            .send(Method::GET, "inventory/1", RequestBody::Empty, true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::MissingToken)));
    }
}
