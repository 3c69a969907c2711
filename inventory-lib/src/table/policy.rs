//! What a table does when its endpoint answers with an error status.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use super::PaginationState;
use crate::api::routes::links;

/// Details handed to an [`HttpErrorPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct ErrorContext<'a> {
    /// The request URL.
    pub url: &'a str,
    /// Pagination the request was made for.
    pub pagination: PaginationState,
    /// Raw response body.
    pub body: &'a str,
}

/// Reaction to a non-2xx page response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorAction {
    /// Navigate the user to this route.
    Navigate(String),
    /// Only report the error.
    Report,
}

/// Decides how a table reacts to an HTTP error status.
///
/// Closures `Fn(u16, &ErrorContext) -> ErrorAction` implement this trait.
pub trait HttpErrorPolicy: Send + Sync {
    fn on_http_error(&self, status: u16, context: &ErrorContext<'_>) -> ErrorAction;
}

impl<F> HttpErrorPolicy for F
where
    F: Fn(u16, &ErrorContext<'_>) -> ErrorAction + Send + Sync,
{
    fn on_http_error(&self, status: u16, context: &ErrorContext<'_>) -> ErrorAction {
        self(status, context)
    }
}

/// Logs and does nothing else. Suited to development builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPolicy;

impl HttpErrorPolicy for ReportPolicy {
    fn on_http_error(&self, _status: u16, _context: &ErrorContext<'_>) -> ErrorAction {
        ErrorAction::Report
    }
}

/// Navigates to the route configured for the status.
#[derive(Debug, Clone, Default)]
pub struct RedirectPolicy {
    links: RedirectLinks,
}

impl RedirectPolicy {
    pub fn new(links: RedirectLinks) -> Self {
        Self { links }
    }
}

impl HttpErrorPolicy for RedirectPolicy {
    fn on_http_error(&self, status: u16, _context: &ErrorContext<'_>) -> ErrorAction {
        ErrorAction::Navigate(self.links.route_for(status))
    }
}

/// Error routes keyed by HTTP status, with a catch-all default.
///
/// The JSON form is a flat object: `{ "default": "/oops", "401": "/login" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct RedirectLinks {
    /// Route used for statuses without an entry.
    pub default: Option<String>,
    /// Routes by status code.
    pub status: BTreeMap<u16, String>,
}

impl TryFrom<BTreeMap<String, String>> for RedirectLinks {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut links = Self::default();
        for (key, route) in map {
            if key == "default" {
                links.default = Some(route);
                continue;
            }
            let status = key
                .parse::<u16>()
                .map_err(|_| format!("redirect key '{}' is neither a status code nor 'default'", key))?;
            links.status.insert(status, route);
        }
        Ok(links)
    }
}

impl From<RedirectLinks> for BTreeMap<String, String> {
    fn from(links: RedirectLinks) -> Self {
        let mut map: BTreeMap<String, String> = links
            .status
            .into_iter()
            .map(|(status, route)| (status.to_string(), route))
            .collect();
        if let Some(route) = links.default {
            map.insert("default".to_string(), route);
        }
        map
    }
}

impl RedirectLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the route for `status`.
    pub fn on(mut self, status: u16, route: impl Into<String>) -> Self {
        self.status.insert(status, route.into());
        self
    }

    /// Sets the catch-all route.
    pub fn default_route(mut self, route: impl Into<String>) -> Self {
        self.default = Some(route.into());
        self
    }

    /// Returns `true` when no route is configured.
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.status.is_empty()
    }

    /// Route for `status`: its own entry, then the default, then
    /// `/error?code={status}`.
    pub fn route_for(&self, status: u16) -> String {
        self.status
            .get(&status)
            .or(self.default.as_ref())
            .cloned()
            .unwrap_or_else(|| links::error(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ErrorContext<'static> {
        ErrorContext {
            url: "http://localhost/items",
            pagination: PaginationState::new(10),
            body: "",
        }
    }

    #[test]
    fn test_route_fallbacks() {
        let links = RedirectLinks::new().on(401, "/login");
        assert_eq!(links.route_for(401), "/login");
        assert_eq!(links.route_for(500), "/error?code=500");
        let links = links.default_route("/oops");
        assert_eq!(links.route_for(500), "/oops");
        assert!(!links.is_empty());
        assert!(RedirectLinks::new().is_empty());
    }

    #[test]
    fn test_flat_json_form() {
        let links: RedirectLinks =
            serde_json::from_str(r#"{"default": "/oops", "401": "/login", "403": "/forbidden"}"#).unwrap();
        assert_eq!(links.route_for(401), "/login");
        assert_eq!(links.route_for(403), "/forbidden");
        assert_eq!(links.route_for(500), "/oops");

        let json = serde_json::to_value(&links).unwrap();
        assert_eq!(json["401"], "/login");
        assert_eq!(json["default"], "/oops");

        let err = serde_json::from_str::<RedirectLinks>(r#"{"unauthorized": "/login"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_policies() {
        let redirect = RedirectPolicy::new(RedirectLinks::new().on(403, "/forbidden"));
        assert_eq!(
            redirect.on_http_error(403, &context()),
            ErrorAction::Navigate("/forbidden".to_string())
        );
        assert_eq!(ReportPolicy.on_http_error(403, &context()), ErrorAction::Report);
    }

    #[test]
    fn test_closure_policy() {
        let policy = |status: u16, _: &ErrorContext<'_>| {
            if status == 401 {
                ErrorAction::Navigate("/".to_string())
            } else {
                ErrorAction::Report
            }
        };
        assert_eq!(policy.on_http_error(500, &context()), ErrorAction::Report);
        assert_eq!(policy.on_http_error(401, &context()), ErrorAction::Navigate("/".into()));
    }
}
