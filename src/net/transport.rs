//! Raw HTTP exchange beneath the API client.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`ApiClient`](super::api::ApiClient) builds a fully resolved
//! [`HttpRequest`] and hands it to a [`Transport`]. The hydrate build sends
//! it with `gloo-net`; tests substitute a scripted transport.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use async_trait::async_trait;

/// HTTP verbs used by the dashboard API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Fully resolved outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a received response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure before any HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, CORS rejection, and similar.
    #[error("network failure: {0}")]
    Network(String),

    /// The request was aborted (timeout or caller cancellation).
    #[error("request aborted: {0}")]
    Aborted(String),
}

/// Sends one request and returns the raw response.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =============================================================================
// GLOO
// =============================================================================

/// Browser `fetch` transport via `gloo-net`.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
fn classify_gloo_error(err: gloo_net::Error) -> TransportError {
    match err {
        gloo_net::Error::JsError(js) if js.name == "AbortError" => TransportError::Aborted(js.message),
        other => TransportError::Network(other.to_string()),
    }
}

#[cfg(feature = "hydrate")]
#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        use gloo_net::http::{Method as GlooMethod, RequestBuilder};

        let method = match request.method {
            Method::Get => GlooMethod::GET,
            Method::Post => GlooMethod::POST,
            Method::Put => GlooMethod::PUT,
            Method::Patch => GlooMethod::PATCH,
            Method::Delete => GlooMethod::DELETE,
        };

        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        let outbound = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(classify_gloo_error)?;

        let resp = outbound.send().await.map_err(classify_gloo_error)?;
        let status = resp.status();
        let body = if status == 204 {
            String::new()
        } else {
            resp.text().await.map_err(classify_gloo_error)?
        };
        Ok(HttpResponse { status, body })
    }
}

// =============================================================================
// UNAVAILABLE
// =============================================================================

/// Transport for builds without browser `fetch`. Every send fails as a
/// network error, so server-rendered pages never block on the API.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableTransport;

#[async_trait(?Send)]
impl Transport for UnavailableTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::Network(format!("no HTTP transport for {} {}", request.method.as_str(), request.url)))
    }
}
