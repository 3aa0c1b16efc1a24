//! Caller-supplied overlay applied on top of every computed request.
//!
//! The overlay is set once when the session is built. Each field that is
//! `Some` replaces the computed value outright, last write wins. Nothing is
//! checked: replacing `headers` drops the coordination header and the JSON
//! content type, replacing `url` ignores the descriptor path, and so on.

use crate::dispatch::{Credentials, RequestOptions};

use std::time::Duration;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::Value;
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct RequestOverrides {
    pub method: Option<Method>,
    pub url: Option<Url>,
    /// Replaces the entire computed header map.
    pub headers: Option<HeaderMap>,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
    pub credentials: Option<Credentials>,
    /// Read once when the HTTP client is built.
    pub strict_tls: Option<bool>,
}

impl RequestOverrides {
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_strict_tls(mut self, strict_tls: bool) -> Self {
        self.strict_tls = Some(strict_tls);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.method.is_none()
            && self.url.is_none()
            && self.headers.is_none()
            && self.body.is_none()
            && self.timeout.is_none()
            && self.credentials.is_none()
            && self.strict_tls.is_none()
    }

    pub fn apply(&self, options: &mut RequestOptions) {
        if let Some(method) = &self.method {
            options.method = method.clone();
        }
        if let Some(url) = &self.url {
            options.url = url.clone();
        }
        if let Some(headers) = &self.headers {
            options.headers = headers.clone();
        }
        if let Some(body) = &self.body {
            options.body = Some(body.clone());
        }
        if let Some(timeout) = self.timeout {
            options.timeout = timeout;
        }
        if let Some(credentials) = &self.credentials {
            options.credentials = credentials.clone();
        }
    }
}
