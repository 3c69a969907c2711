//! Page resolution for local and remote tables.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use log::error;
use log::warn;
use reqwest::Client;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde_json::Value;
use url::Url;

use super::AccessorPath;
use super::ErrorAction;
use super::ErrorContext;
use super::HttpErrorPolicy;
use super::HttpMethod;
use super::Page;
use super::PaginationState;
use super::RedirectPolicy;
use super::ReportPolicy;
use super::TableConfig;
use crate::error::ApiError;
use crate::retry::RetryConfig;
use crate::transport;

/// A fully built page request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl FetchRequest {
    /// Builds the request for `pagination` from the table configuration.
    ///
    /// The page number path segment (one-based) is appended before the
    /// query parameters are set; existing parameters with the same names are
    /// replaced.
    pub fn build(config: &TableConfig, pagination: PaginationState) -> Result<Self, ApiError> {
        let source = config
            .url
            .as_ref()
            .ok_or_else(|| ApiError::InvalidUrl("table has no url".to_string()))?;
        let mut url = Url::parse(&source.api_url)?;

        if config.add_pagination_index_to_url {
            url.path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(source.api_url.clone()))?
                .pop_if_empty()
                .push(&(pagination.page_index + 1).to_string());
        }

        let start = config.effective_start_param().value(pagination);
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(name, _)| name != config.start_name.as_str() && name != config.size_name.as_str())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(&config.start_name, &start.to_string())
            .append_pair(&config.size_name, &pagination.page_size.to_string());

        Ok(Self {
            method: config.method,
            url,
            headers: source
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            body: config.body.clone(),
        })
    }
}

/// Status code and body of a page response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport used by remote tables.
///
/// Non-2xx answers are returned as responses, not errors, so the table's
/// [`HttpErrorPolicy`] can see them.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<RawResponse, ApiError>;
}

/// [`PageFetcher`] over reqwest with automatic retries.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    retry_config: RetryConfig,
    timeout: Option<Duration>,
}

impl HttpPageFetcher {
    /// Creates a fetcher with a default HTTP client and three retries.
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self::with_client(Client::builder().build()?))
    }

    /// Creates a fetcher around an existing HTTP client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            retry_config: RetryConfig::default(),
            timeout: None,
        }
    }

    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::parse(format!("invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::parse(format!("invalid value for header '{}': {}", name, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<RawResponse, ApiError> {
        let headers = header_map(&request.headers)?;
        let method = reqwest::Method::from(request.method);

        let response = transport::send_with_retry(&self.client, &self.retry_config, self.timeout, |client| {
            let builder = client
                .request(method.clone(), request.url.clone())
                .headers(headers.clone());
            match &request.body {
                Some(body) => builder.json(body),
                None => builder,
            }
        })
        .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

/// How a page resolution ended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// Rows were served (possibly none).
    #[default]
    Ok,
    /// The endpoint answered with a non-2xx status.
    HttpError(u16),
    /// Transport or parse failure; the page is empty.
    Failed(String),
}

/// Result of resolving a page. Never an error: failures are folded into
/// [`FetchStatus`] and an empty page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutcome {
    pub page: Page,
    pub status: FetchStatus,
    /// Route the error policy asked to navigate to.
    pub redirect: Option<String>,
}

impl PageOutcome {
    fn ok(page: Page) -> Self {
        Self {
            page,
            status: FetchStatus::Ok,
            redirect: None,
        }
    }

    fn failed(pagination: PaginationState, reason: impl Into<String>) -> Self {
        Self {
            page: Page::empty(pagination),
            status: FetchStatus::Failed(reason.into()),
            redirect: None,
        }
    }

    /// Returns `true` unless the page resolved cleanly.
    pub fn is_error(&self) -> bool {
        self.status != FetchStatus::Ok
    }
}

/// Slices a local-mode table.
///
/// With pagination disabled, or no rows at all, every row is returned.
pub fn resolve_local(config: &TableConfig, pagination: PaginationState) -> PageOutcome {
    let rows = &config.raw_data;
    let page_rows = if config.enable_pagination && !rows.is_empty() {
        rows[pagination.range(rows.len())].to_vec()
    } else {
        rows.clone()
    };
    PageOutcome::ok(Page::new(page_rows, pagination).with_total_count(rows.len()))
}

/// Resolves pages for a table: slices local data or fetches remote pages.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct DataSource {
    fetcher: Arc<dyn PageFetcher>,
    policy: Arc<dyn HttpErrorPolicy>,
}

impl DataSource {
    pub fn new(fetcher: impl PageFetcher + 'static, policy: impl HttpErrorPolicy + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            policy: Arc::new(policy),
        }
    }

    /// reqwest-backed source that only reports HTTP errors.
    pub fn http() -> Result<Self, ApiError> {
        Ok(Self::new(HttpPageFetcher::new()?, ReportPolicy))
    }

    /// reqwest-backed source for `config`: navigates per its redirect links
    /// when any are set, otherwise only reports.
    pub fn for_config(config: &TableConfig) -> Result<Self, ApiError> {
        let source = Self::http()?;
        if config.redirect_links.is_empty() {
            Ok(source)
        } else {
            Ok(source.with_policy(RedirectPolicy::new(config.redirect_links.clone())))
        }
    }

    /// Replaces the error policy.
    pub fn with_policy(mut self, policy: impl HttpErrorPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Resolves the page for `pagination`.
    pub async fn resolve(&self, config: &TableConfig, pagination: PaginationState) -> PageOutcome {
        if !config.is_remote() {
            return resolve_local(config, pagination);
        }

        let request = match FetchRequest::build(config, pagination) {
            Ok(request) => request,
            Err(e) => {
                warn!("could not build page request: {}", e);
                return PageOutcome::failed(pagination, e.to_string());
            }
        };

        debug!("fetching page {} ({} rows) from {}", pagination.page_index, pagination.page_size, request.url);

        let response = match self.fetcher.fetch(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("page fetch from {} failed: {}", request.url, e);
                return PageOutcome::failed(pagination, e.to_string());
            }
        };

        let mut status = FetchStatus::Ok;
        let mut redirect = None;
        if !response.is_success() {
            error!(
                "page response status {} from {}: {}",
                response.status, request.url, response.body
            );
            let context = ErrorContext {
                url: request.url.as_str(),
                pagination,
                body: &response.body,
            };
            if let ErrorAction::Navigate(route) = self.policy.on_http_error(response.status, &context) {
                redirect = Some(route);
            }
            status = FetchStatus::HttpError(response.status);
        }

        let page = match parse_page(config, pagination, &response.body) {
            Ok(page) => page,
            Err(e) => {
                warn!("page response from {} unusable: {}", request.url, e);
                if status == FetchStatus::Ok {
                    status = FetchStatus::Failed(e.to_string());
                }
                Page::empty(pagination)
            }
        };

        PageOutcome {
            page,
            status,
            redirect,
        }
    }
}

/// Extracts rows and total count from a response body.
fn parse_page(config: &TableConfig, pagination: PaginationState, body: &str) -> Result<Page, ApiError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))?;

    match AccessorPath::parse(&config.data_accessor_key).extract_rows(&json)? {
        Some(rows) => {
            let total = AccessorPath::parse(&config.total_row_name)
                .extract_count(&json)
                .unwrap_or(rows.len());
            Ok(Page::new(rows, pagination).with_total_count(total))
        }
        None => Ok(Page::empty(pagination)),
    }
}

impl std::fmt::Debug for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSource").finish_non_exhaustive()
    }
}
