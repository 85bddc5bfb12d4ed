//! Request/response primitives, the transport seam, and the HTTP transport.

use std::fmt::{self, Debug, Formatter};
use std::io::{Cursor, Read};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;

use crate::error::{CommandError, CommandResult, TransportError};

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";

/// Default API base used when neither `--target` nor `APPDECK_TARGET` is set.
pub const DEFAULT_TARGET: &str = "http://127.0.0.1:8080";

/// Executes one prepared request and hands back the raw response.
pub trait Transport {
    /// Send `request` and return the status, headers, and body stream.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the exchange fails or the server
    /// answers with an error status.
    fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Configured remote endpoint that relative API paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    /// Wrap a base URL; no validation happens here.
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Base URL as configured.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Join `path` onto the base by plain concatenation.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        format!("{}{path}", self.base.trim_end_matches('/'))
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

/// Outbound request prepared by a command.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute target URL.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Optional encoded body.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Build a bodiless request for `path` relative to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::RequestConstruction`] when the resolved URL does not parse.
    pub fn new(method: Method, endpoint: &Endpoint, path: &str) -> CommandResult<Self> {
        let raw = endpoint.resolve(path);
        let url = Url::parse(&raw).map_err(|err| CommandError::RequestConstruction {
            url: raw.clone(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    /// Attach `payload` as a JSON body and mark the content type.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::RequestConstruction`] when the payload cannot be encoded.
    pub fn json<T: Serialize>(mut self, payload: &T) -> CommandResult<Self> {
        let body = serde_json::to_vec(payload).map_err(|err| CommandError::RequestConstruction {
            url: self.url.to_string(),
            reason: format!("invalid JSON body: {err}"),
        })?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        self.body = Some(body);
        Ok(self)
    }

    /// Request path, used in log events.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// Response handed back by a [`Transport`]. Dropping it releases the body.
pub struct ApiResponse {
    /// Status returned by the server.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body stream, read at most once.
    pub body: Box<dyn Read>,
}

impl ApiResponse {
    /// Build a response around an arbitrary body stream.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Read + 'static) -> Self {
        Self {
            status,
            headers,
            body: Box::new(body),
        }
    }

    /// Build a response with an in-memory body and no headers.
    pub fn from_bytes(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, HeaderMap::new(), Cursor::new(body.into()))
    }

    /// Whether the server answered `204 No Content`.
    #[must_use]
    pub fn is_no_content(&self) -> bool {
        self.status == StatusCode::NO_CONTENT
    }
}

impl Debug for ApiResponse {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// [`Transport`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client that tags every request with `trace_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Setup`] when the trace identifier is not a valid
    /// header value or the underlying client cannot be constructed.
    pub fn new(trace_id: &str) -> Result<Self, TransportError> {
        let mut default_headers = HeaderMap::new();
        let request_id =
            HeaderValue::from_str(trace_id).map_err(|err| TransportError::Setup {
                reason: "invalid request id header",
                source: Box::new(err),
            })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("appdeck/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(None::<Duration>)
            .build()
            .map_err(|err| TransportError::Setup {
                reason: "client construction failed",
                source: Box::new(err),
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = request.url.to_string();
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().map_err(|err| TransportError::Send {
            url,
            source: Box::new(err),
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(classify_failure(response));
        }

        let headers = response.headers().clone();
        Ok(ApiResponse::new(status, headers, response))
    }
}

/// Turn an error response into a [`TransportError::Status`] carrying the body text.
fn classify_failure(response: reqwest::blocking::Response) -> TransportError {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    let trimmed = body.trim();
    let message = if trimmed.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| "request failed".to_string(), str::to_string)
    } else {
        trimmed.to_string()
    };
    TransportError::Status { status, message }
}
