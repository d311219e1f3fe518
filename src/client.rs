//! HTTP access to the Apihub REST API.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, RequestBuilder, Url};

/// Header carrying the pre-obtained personal access token
pub const TOKEN_HEADER: &str = "X-Personal-Access-Token";

/// API type segment used in all package-scoped paths
pub const API_TYPE: &str = "rest";

/// Thin wrapper around `reqwest::Client` that knows the Apihub base URL and
/// attaches the access token to every request.
pub struct ApihubClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl ApihubClient {
    /// Creates a client for the given Apihub instance
    pub fn new(apihub_url: &str, token: &str) -> Result<Self> {
        let base_url = Url::parse(apihub_url)
            .with_context(|| format!("invalid Apihub URL: {apihub_url}"))?;

        Ok(Self {
            http: Client::new(),
            base_url,
            token: token.to_string(),
        })
    }

    /// Builds an endpoint URL from path segments; each segment is escaped, so
    /// group names with slashes or spaces stay a single segment
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Apihub URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url).header(TOKEN_HEADER, &self.token)
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.http.post(url).header(TOKEN_HEADER, &self.token)
    }

    pub(crate) fn patch(&self, url: Url) -> RequestBuilder {
        self.http.patch(url).header(TOKEN_HEADER, &self.token)
    }

    pub(crate) fn delete(&self, url: Url) -> RequestBuilder {
        self.http.delete(url).header(TOKEN_HEADER, &self.token)
    }
}
