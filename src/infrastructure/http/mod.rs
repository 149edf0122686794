//! Dashboard HTTP adapters
//!
//! Both adapters share one `DashboardClient`: the base URL, the session
//! cookie and a reqwest client with the configured timeout.

mod notifications;
mod tasks;

pub use notifications::HttpNotificationSource;
pub use tasks::HttpTaskClient;

use std::time::Duration as StdDuration;

use percent_encoding::percent_decode_str;
use reqwest::header::COOKIE;
use reqwest::RequestBuilder;

/// Name of the cookie carrying the anti-forgery token
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the token is sent back in
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Connection details for the dashboard backend
#[derive(Debug, Clone)]
pub struct DashboardClient {
    base_url: String,
    cookie: Option<String>,
    client: reqwest::Client,
}

impl DashboardClient {
    /// Create a client for `base_url` with a request timeout
    pub fn new(
        base_url: impl Into<String>,
        cookie: Option<String>,
        timeout: StdDuration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cookie: cookie.filter(|c| !c.trim().is_empty()),
            client,
        })
    }

    /// Absolute URL for an API path starting with '/'
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Anti-forgery token from the configured cookie
    pub fn csrf_token(&self) -> Option<String> {
        self.cookie
            .as_deref()
            .and_then(|c| cookie_value(c, CSRF_COOKIE))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.with_cookie(self.client.get(self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.with_cookie(self.client.post(self.url(path)))
    }

    fn with_cookie(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }
}

/// Look up a cookie by name in a `Cookie` header string and percent-decode it
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then_some(value)
        })
        .map(|value| percent_decode_str(value).decode_utf8_lossy().into_owned())
}
