//! REST API client for the dashboard backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every outbound call goes through [`ApiClient::request`]. It injects the
//! bearer token, resolves paths against the API base, and turns every
//! failure into an [`ApiError`] after surfacing it to the user.
//!
//! ERROR HANDLING
//! ==============
//! Status precedence, first match wins: 401, 403, 404, 422, >=500, 204,
//! other non-OK, OK. Notifications and the 401 redirect happen before the
//! error is returned, so callers never need to notify on their own.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::{
    ApiError, FieldErrors, MSG_FORBIDDEN, MSG_NETWORK, MSG_NOT_FOUND, MSG_REQUEST_FAILED, MSG_SERVER,
    MSG_TIMEOUT, MSG_UNAUTHORIZED, MSG_VALIDATION,
};
use super::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use crate::config::ClientConfig;
use crate::routing::Navigator;
use crate::state::session::SessionStore;
use crate::util::notify::Notifier;

/// Extra headers and query parameters for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// Shared handle to the HTTP layer. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
    session: Rc<SessionStore>,
    notifier: Rc<dyn Notifier>,
    navigator: Rc<dyn Navigator>,
    api_base: String,
    login_route: String,
}

impl ApiClient {
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        transport: Rc<dyn Transport>,
        session: Rc<SessionStore>,
        notifier: Rc<dyn Notifier>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            session,
            notifier,
            navigator,
            api_base: config.api_base.clone(),
            login_route: config.login_route.clone(),
        }
    }

    /// Absolute URLs pass through; anything else is prefixed with the API base.
    #[must_use]
    pub fn resolve_url(&self, path: &str) -> String {
        if is_absolute_url(path) {
            path.to_owned()
        } else if path.starts_with('/') {
            format!("{}{path}", self.api_base)
        } else {
            format!("{}/{path}", self.api_base)
        }
    }

    /// Send a request and return the parsed JSON body.
    ///
    /// 204 and empty 2xx bodies yield an empty JSON object.
    ///
    /// # Errors
    ///
    /// Returns a classified [`ApiError`]; the user has already been notified
    /// where the error kind calls for it.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        self.exchange(method, path, body, options).await.map(|(_, value)| value)
    }

    /// Like [`request`](Self::request), decoding the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`], or `RequestFailed` carrying the
    /// response status if the body does not decode as `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        let (status, value) = self.exchange(method, path, body, options).await?;
        serde_json::from_value(value).map_err(|e| ApiError::RequestFailed {
            status,
            message: format!("unexpected response shape: {e}"),
        })
    }

    /// Send, classify, and surface failures. Success keeps the status.
    async fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<(u16, Value), ApiError> {
        let request = self.build_request(method, path, body, options);
        let url = request.url.clone();

        let result = match self.transport.send(request).await {
            Ok(resp) => classify_response(&resp).map(|value| (resp.status, value)),
            Err(err) => Err(classify_transport_error(err)),
        };

        if let Err(err) = &result {
            leptos::logging::warn!(
                "api {} {url} failed: kind={} status={}",
                method.as_str(),
                err.kind(),
                err.status_code()
            );
            self.surface(err);
        }
        result
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get(&self, path: &str, options: &RequestOptions) -> Result<Value, ApiError> {
        self.request(Method::Get, path, None, options).await
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode_body(body)?;
        self.request(Method::Post, path, Some(body), &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode_body(body)?;
        self.request(Method::Put, path, Some(body), &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode_body(body)?;
        self.request(Method::Patch, path, Some(body), &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::Delete, path, None, &RequestOptions::default()).await
    }

    fn build_request(&self, method: Method, path: &str, body: Option<Value>, options: &RequestOptions) -> HttpRequest {
        let mut headers = options.headers.clone();
        set_header(&mut headers, "Accept", "application/json");
        if let Some(token) = self.session.current_token() {
            set_header(&mut headers, "Authorization", &format!("Bearer {token}"));
        }
        let body = body.map(|value| {
            set_header(&mut headers, "Content-Type", "application/json");
            value.to_string()
        });

        HttpRequest {
            method,
            url: self.resolve_url(path),
            headers,
            query: options.query.clone(),
            body,
        }
    }

    /// User-visible side effects for a failed request.
    fn surface(&self, err: &ApiError) {
        match err {
            ApiError::Unauthorized { .. } => {
                self.session.clear();
                self.notifier.error("Session Expired", Some("Please login again."));
                self.navigator.navigate(&self.login_route);
            }
            ApiError::Forbidden { .. } => {
                self.notifier.error("Access Denied", Some(MSG_FORBIDDEN));
            }
            ApiError::ValidationFailed { message, .. } => {
                let detail = if message == MSG_VALIDATION { "Please check your input." } else { message.as_str() };
                self.notifier.warning("Validation Error", Some(detail));
            }
            ApiError::ServerError { .. } => {
                self.notifier.error("Server Error", Some("Please try again later."));
            }
            ApiError::NetworkError { .. } => {
                self.notifier.error("Network Error", Some("Please check your connection."));
            }
            ApiError::Timeout { .. } => {
                self.notifier.error("Request Timeout", Some("Please try again."));
            }
            ApiError::NotFound { .. } | ApiError::RequestFailed { .. } => {}
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_base", &self.api_base)
            .field("login_route", &self.login_route)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    headers.push((name.to_owned(), value.to_owned()));
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::RequestFailed {
        status: 0,
        message: format!("request body could not be encoded: {e}"),
    })
}

/// Map a received response onto the error taxonomy.
pub(crate) fn classify_response(resp: &HttpResponse) -> Result<Value, ApiError> {
    let status = resp.status;
    match status {
        401 => Err(ApiError::Unauthorized { message: MSG_UNAUTHORIZED.to_owned() }),
        403 => Err(ApiError::Forbidden { message: MSG_FORBIDDEN.to_owned() }),
        404 => Err(ApiError::NotFound { message: MSG_NOT_FOUND.to_owned() }),
        422 => {
            let body = parse_body(&resp.body).unwrap_or(Value::Null);
            Err(ApiError::ValidationFailed {
                message: body_message(&body).unwrap_or(MSG_VALIDATION).to_owned(),
                field_errors: parse_field_errors(&body),
            })
        }
        s if s >= 500 => Err(ApiError::ServerError { status: s, message: MSG_SERVER.to_owned() }),
        204 => Ok(Value::Object(Map::new())),
        _ if !resp.ok() => {
            let body = parse_body(&resp.body).unwrap_or(Value::Null);
            Err(ApiError::RequestFailed {
                status,
                message: body_message(&body).unwrap_or(MSG_REQUEST_FAILED).to_owned(),
            })
        }
        _ => {
            if resp.body.trim().is_empty() {
                return Ok(Value::Object(Map::new()));
            }
            parse_body(&resp.body).ok_or_else(|| ApiError::RequestFailed {
                status,
                message: "invalid JSON in response body".to_owned(),
            })
        }
    }
}

pub(crate) fn classify_transport_error(err: TransportError) -> ApiError {
    match err {
        TransportError::Network(_) => ApiError::NetworkError { message: MSG_NETWORK.to_owned() },
        TransportError::Aborted(_) => ApiError::Timeout { message: MSG_TIMEOUT.to_owned() },
    }
}

fn parse_body(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

fn body_message(body: &Value) -> Option<&str> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
}

/// Read `errors` as `{field: [msg, ...]}`; a bare string becomes a single message.
fn parse_field_errors(body: &Value) -> FieldErrors {
    let Some(errors) = body.get("errors").and_then(Value::as_object) else {
        return FieldErrors::new();
    };
    errors
        .iter()
        .filter_map(|(field, value)| {
            let messages: Vec<String> = match value {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect(),
                _ => return None,
            };
            Some((field.clone(), messages))
        })
        .collect()
}
