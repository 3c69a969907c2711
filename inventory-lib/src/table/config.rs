//! Table configuration.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::PaginationState;
use super::RedirectLinks;
use super::Row;
use crate::error::Error;
use crate::export::PrintOptions;

/// Page sizes offered when row selection is off.
pub const DEFAULT_ROW_PER_PAGE_OPTIONS: [usize; 9] = [10, 20, 50, 100, 150, 200, 300, 500, 1000];

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    /// Key of the row value shown in this column.
    pub accessor_key: String,
    /// Column title. Falls back to the accessor key.
    #[serde(default)]
    pub header: Option<String>,
}

impl ColumnDef {
    pub fn new(accessor_key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            accessor_key: accessor_key.into(),
            header: Some(header.into()),
        }
    }

    /// A column titled by its accessor key.
    pub fn key(accessor_key: impl Into<String>) -> Self {
        Self {
            accessor_key: accessor_key.into(),
            header: None,
        }
    }

    /// Column title as displayed and exported.
    pub fn header_text(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.accessor_key)
    }
}

/// Remote endpoint of a table.
///
/// Deserialises from `{ "apiUrl", "headerOptions": { "headers": {..} } }`,
/// the request-init shape of the web component. A flat `headers` object is
/// accepted too and wins on conflicting names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "UrlSourceDef")]
pub struct UrlSource {
    /// Absolute endpoint URL, may already carry query parameters.
    pub api_url: String,
    /// Extra request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UrlSourceDef {
    api_url: String,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    header_options: Option<HeaderOptions>,
}

/// Request-init options. Only `headers` affects the page request.
#[derive(Deserialize)]
struct HeaderOptions {
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

impl From<UrlSourceDef> for UrlSource {
    fn from(def: UrlSourceDef) -> Self {
        let mut headers = def.header_options.map(|o| o.headers).unwrap_or_default();
        headers.extend(def.headers);
        Self {
            api_url: def.api_url,
            headers,
        }
    }
}

impl UrlSource {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            headers: BTreeMap::new(),
        }
    }

    /// Adds a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds an `Authorization: Bearer` header.
    pub fn bearer(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }
}

/// HTTP method of the page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// What the start query parameter carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StartParam {
    /// Offset of the first row: `page_index * page_size`.
    Offset,
    /// Zero-based page index.
    PageIndex,
}

impl StartParam {
    /// Infers the semantics from the parameter name: `start` is an offset,
    /// anything else a page index.
    pub fn infer(start_name: &str) -> Self {
        if start_name == "start" {
            Self::Offset
        } else {
            Self::PageIndex
        }
    }

    /// Value sent for `pagination`.
    pub fn value(self, pagination: PaginationState) -> usize {
        match self {
            Self::Offset => pagination.offset(),
            Self::PageIndex => pagination.page_index,
        }
    }
}

/// Everything a [`DataTable`](super::DataTable) needs to know about its
/// data and presentation.
///
/// Field names follow the camelCase props of the web component so JSON
/// table definitions can be loaded directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    #[serde(alias = "columnHeadersLabel")]
    pub columns: Vec<ColumnDef>,
    /// Remote endpoint. Absent means local mode over `raw_data`.
    pub url: Option<UrlSource>,
    pub method: HttpMethod,
    /// JSON body sent with every page request.
    pub body: Option<Value>,
    /// Rows of a local-mode table.
    pub raw_data: Vec<Row>,
    pub start_name: String,
    pub size_name: String,
    /// Dot path of the total row count in the response.
    pub total_row_name: String,
    /// Overrides the semantics inferred from `start_name`.
    pub start_param: Option<StartParam>,
    /// Appends the one-based page number as a trailing path segment.
    pub add_pagination_index_to_url: bool,
    pub page_size: usize,
    pub row_per_page_options: Vec<usize>,
    /// Dot path of the row array in the response.
    pub data_accessor_key: String,
    pub enable_pagination: bool,
    pub enable_row_selection: bool,
    /// Row field holding the stable row identity.
    pub row_id_key: String,
    pub print_options: PrintOptions,
    pub redirect_links: RedirectLinks,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            url: None,
            method: HttpMethod::Get,
            body: None,
            raw_data: Vec::new(),
            start_name: "start".to_string(),
            size_name: "size".to_string(),
            total_row_name: "total_row".to_string(),
            start_param: None,
            add_pagination_index_to_url: false,
            page_size: 10,
            row_per_page_options: DEFAULT_ROW_PER_PAGE_OPTIONS.to_vec(),
            data_accessor_key: "results".to_string(),
            enable_pagination: true,
            enable_row_selection: false,
            row_id_key: "id".to_string(),
            print_options: PrintOptions::default(),
            redirect_links: RedirectLinks::default(),
        }
    }
}

impl TableConfig {
    /// A local-mode table over `rows`.
    pub fn local(columns: Vec<ColumnDef>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            raw_data: rows,
            ..Default::default()
        }
    }

    /// A remote-mode table backed by `url`.
    pub fn remote(columns: Vec<ColumnDef>, url: UrlSource) -> Self {
        Self {
            columns,
            url: Some(url),
            ..Default::default()
        }
    }

    /// Parses a JSON table definition.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::config(format!("table definition: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn start_name(mut self, name: impl Into<String>) -> Self {
        self.start_name = name.into();
        self
    }

    pub fn size_name(mut self, name: impl Into<String>) -> Self {
        self.size_name = name.into();
        self
    }

    pub fn total_row_name(mut self, name: impl Into<String>) -> Self {
        self.total_row_name = name.into();
        self
    }

    pub fn start_param(mut self, param: StartParam) -> Self {
        self.start_param = Some(param);
        self
    }

    pub fn add_pagination_index_to_url(mut self, enabled: bool) -> Self {
        self.add_pagination_index_to_url = enabled;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn row_per_page_options(mut self, options: Vec<usize>) -> Self {
        self.row_per_page_options = options;
        self
    }

    pub fn data_accessor_key(mut self, path: impl Into<String>) -> Self {
        self.data_accessor_key = path.into();
        self
    }

    pub fn enable_pagination(mut self, enabled: bool) -> Self {
        self.enable_pagination = enabled;
        self
    }

    pub fn enable_row_selection(mut self, enabled: bool) -> Self {
        self.enable_row_selection = enabled;
        self
    }

    pub fn row_id_key(mut self, key: impl Into<String>) -> Self {
        self.row_id_key = key.into();
        self
    }

    pub fn print_options(mut self, options: PrintOptions) -> Self {
        self.print_options = options;
        self
    }

    pub fn redirect_links(mut self, links: RedirectLinks) -> Self {
        self.redirect_links = links;
        self
    }

    /// Returns `true` when rows come from a remote endpoint.
    pub fn is_remote(&self) -> bool {
        self.url.is_some()
    }

    /// Start parameter semantics, explicit or inferred from `start_name`.
    pub fn effective_start_param(&self) -> StartParam {
        self.start_param
            .unwrap_or_else(|| StartParam::infer(&self.start_name))
    }

    /// Page sizes to offer. Empty while row selection is enabled so row
    /// positions stay put under the user.
    pub fn page_size_options(&self) -> &[usize] {
        if self.enable_row_selection {
            &[]
        } else {
            &self.row_per_page_options
        }
    }

    /// Checks the configuration for values no request could be built from.
    pub fn validate(&self) -> Result<(), Error> {
        if self.page_size == 0 {
            return Err(Error::config("page size must be at least 1"));
        }
        if let Some(source) = &self.url {
            url::Url::parse(&source.api_url)
                .map_err(|e| Error::config(format!("invalid api url '{}': {}", source.api_url, e)))?;
        }
        if self.enable_row_selection && self.row_id_key.is_empty() {
            return Err(Error::config("row selection needs a row id key"));
        }
        Ok(())
    }
}
