//! Building and executing a single authenticated call.
//!
//! Every request goes through [`dispatch`]: options are computed from the
//! session (Basic auth, JSON content type, fixed timeout, coordination header),
//! the session's [`RequestOverrides`] are laid on top, and the outcome is
//! classified by [`classify`].

pub mod classify;
pub mod overrides;

pub use overrides::RequestOverrides;

use crate::error::IControlError;
use crate::response::ResponseEnvelope;
use crate::transaction::TransactionId;

use common::{HttpStatusCode, RedactedSecret};

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use url::Url;

/// Header that scopes a request into a server-side transaction.
pub const COORDINATION_HEADER: &str = "x-f5-rest-coordination-id";

/// Applied to every call. There is no per-call timeout other than the overlay.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(2000);

const JSON_CONTENT_TYPE: &str = "application/json";

/// One call, relative to the session's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Appended verbatim to the base URL: leading slash and query string included.
    pub path: String,
    pub body: Option<Value>,
    /// Omit the coordination header even while a transaction is active.
    pub ignore_transaction: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            ignore_transaction: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn ignoring_transaction(mut self) -> Self {
        self.ignore_transaction = true;
        self
    }
}

/// Basic authentication pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: RedactedSecret,
}

/// Everything needed to send one request, after defaults and before the wire.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub timeout: Duration,
    pub credentials: Credentials,
}

impl RequestOptions {
    fn into_request(self, client: &Client) -> Result<RequestBuilder, IControlError> {
        let mut request = client
            .request(self.method, self.url)
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose()),
            )
            .headers(self.headers)
            .timeout(self.timeout);

        if let Some(body) = &self.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        Ok(request)
    }
}

/// The immutable half of a session: endpoint, credentials, HTTP client and overlay.
///
/// Shared behind an `Arc`; response envelopes hold a `Weak` to it.
#[derive(Debug)]
pub struct Connection {
    base_url: String,
    credentials: Credentials,
    client: Client,
    overrides: RequestOverrides,
}

impl Connection {
    /// Expects an already validated base URL and credentials.
    #[track_caller]
    pub(crate) fn new(
        base_url: String,
        credentials: Credentials,
        strict_tls: bool,
        overrides: RequestOverrides,
    ) -> Result<Self, IControlError> {
        let strict_tls = overrides.strict_tls.unwrap_or(strict_tls);
        let client = Client::builder()
            .danger_accept_invalid_certs(!strict_tls)
            .build()
            .map_err(|e| IControlError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            credentials,
            client,
            overrides,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Computes the options for `descriptor`, then applies the overlay.
    ///
    /// The coordination header is set only when `transaction` is present and the
    /// descriptor does not opt out.
    #[track_caller]
    pub fn build_options(
        &self,
        descriptor: &RequestDescriptor,
        transaction: Option<&TransactionId>,
    ) -> Result<RequestOptions, IControlError> {
        let url = Url::parse(&format!("{}{}", self.base_url, descriptor.path))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        if let Some(id) = transaction.filter(|_| !descriptor.ignore_transaction) {
            let value = HeaderValue::from_str(id.as_str()).map_err(|e| {
                IControlError::operation(format!("Transaction id {id} is not a valid header value: {e}"))
            })?;
            headers.insert(HeaderName::from_static(COORDINATION_HEADER), value);
        }

        let mut options = RequestOptions {
            method: descriptor.method.clone(),
            url,
            headers,
            body: descriptor.body.clone(),
            timeout: REQUEST_TIMEOUT,
            credentials: self.credentials.clone(),
        };
        self.overrides.apply(&mut options);

        Ok(options)
    }
}

/// Sends one request and classifies the outcome.
///
/// Status 200 is the only success; see [`classify`] for the failure shapes.
pub(crate) async fn dispatch(
    connection: &Arc<Connection>,
    descriptor: RequestDescriptor,
    transaction: Option<&TransactionId>,
) -> Result<ResponseEnvelope, IControlError> {
    let options = connection.build_options(&descriptor, transaction)?;
    let url = options.url.to_string();

    debug!(
        "{} {}{}",
        options.method,
        descriptor.path,
        match options.headers.get(COORDINATION_HEADER) {
            Some(_) => " [transaction]",
            None => "",
        }
    );

    let request = options.into_request(&connection.client)?;
    let response = request
        .send()
        .await
        .map_err(|e| classify::transport_failure(&e, &url))?;

    let status = HttpStatusCode(response.status().as_u16());
    let headers = response.headers().clone();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| classify::transport_failure(&e, &url))?;

    if !status.is_ok() {
        let error = classify::api_failure(status, &bytes, &url);
        warn!("{} {} failed with HTTP {status}", descriptor.method, descriptor.path);
        return Err(error);
    }

    let payload = classify::parse_payload(&bytes, &url)?;

    Ok(ResponseEnvelope::new(
        status,
        headers,
        payload,
        Arc::downgrade(connection),
    ))
}
