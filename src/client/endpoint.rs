//! Endpoint path templates on the lookup API.

use std::borrow::Cow;

const PLACEHOLDER: &str = "{query}";

/// A request path with one `{query}` placeholder.
///
/// The query is substituted verbatim; callers encode it first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate(Cow<'static, str>);

impl EndpointTemplate {
    pub fn new(template: impl Into<Cow<'static, str>>) -> Self {
        Self(template.into())
    }

    pub fn phone() -> Self {
        Self::new("/api/search/phone/{query}/")
    }

    pub fn people() -> Self {
        Self::new("/api/search/people/?{query}")
    }

    pub fn address() -> Self {
        Self::new("/api/search/address/?{query}")
    }

    pub fn background() -> Self {
        Self::new("/api/search/background/?{query}")
    }

    pub fn health() -> Self {
        Self::new("/api/health/")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path with `query` substituted.
    pub fn render(&self, query: &str) -> String {
        self.0.replace(PLACEHOLDER, query)
    }

    /// Full URL on `host`.
    pub fn url_for(&self, host: &str, query: &str) -> String {
        let base = host.trim_end_matches('/');
        let path = self.render(query);
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}
