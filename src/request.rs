//! Request context consumed by the rewrite engine.

use std::collections::HashMap;

use http::Method;
use url::form_urlencoded;

/// Route parameters bound by an outer router.
///
/// Hosts that resolve path parameters before the rewrite step can attach
/// this to the request (the tower adapter reads it from extensions) so
/// rules without a source pattern can substitute from it.
#[derive(Debug, Clone, Default)]
pub struct RouteParams(pub HashMap<String, String>);

/// Mutable view of one request as the engine sees it.
///
/// `url` holds the path plus optional query; `path` derives from it, and
/// the query map is recomputed whenever a rewrite commits so downstream
/// consumers observe consistent state. `params` is consulted only by
/// rules without a source pattern.
#[derive(Debug, Clone)]
pub struct RewriteRequest {
    method: Method,
    url: String,
    query: HashMap<String, String>,
    params: HashMap<String, String>,
}

impl RewriteRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        let url = url.into();
        let query = parse_query(&url);
        Self {
            method,
            url,
            query,
            params: HashMap::new(),
        }
    }

    /// Attach router-bound path parameters.
    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path plus optional query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path component of the url, query excluded.
    pub fn path(&self) -> &str {
        match self.url.find('?') {
            Some(at) => &self.url[..at],
            None => &self.url,
        }
    }

    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Replace the url and recompute the query map from it.
    pub(crate) fn set_url(&mut self, url: String) {
        self.query = parse_query(&url);
        self.url = url;
    }
}

fn parse_query(url: &str) -> HashMap<String, String> {
    let Some(at) = url.find('?') else {
        return HashMap::new();
    };
    form_urlencoded::parse(url[at + 1..].as_bytes())
        .into_owned()
        .collect()
}
