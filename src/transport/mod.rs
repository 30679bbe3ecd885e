//! HTTP transport seam
//!
//! The ceremony core never talks to the network directly. It builds
//! [`HttpRequest`] values and hands them to an [`HttpTransport`]; a transport
//! either returns the status and body or a [`TransportError`] when no HTTP
//! exchange happened at all.

mod reqwest_transport;

use std::fmt;

use async_trait::async_trait;
use url::Url;

pub use reqwest_transport::ReqwestTransport;

/// Header names used by the relying party
pub mod headers {
    pub const USER_TOKEN: &str = "X-USER-TOKEN";
    pub const USER_ID: &str = "X-USER-ID";
    pub const USER_NAME: &str = "X-USER-NAME";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const REQUESTED_WITH: &str = "X-Requested-With";

    pub const APPLICATION_JSON: &str = "application/json";
    pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outgoing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST carrying a JSON body, with the content type already set
    #[must_use]
    pub fn post_json(url: Url, body: Vec<u8>) -> Self {
        Self {
            method: Method::Post,
            url,
            headers: vec![(headers::CONTENT_TYPE, headers::APPLICATION_JSON.to_string())],
            body: Some(body),
        }
    }

    #[must_use]
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Look up a header value by case-insensitive name
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP response (DNS, TLS, connect, timeout, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

impl TransportError {
    #[must_use]
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request to {} failed: {}", self.url, self.message)
    }
}

impl std::error::Error for TransportError {}

/// Request/response abstraction the ceremony runs on
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform one HTTP exchange
    ///
    /// # Errors
    ///
    /// Returns `TransportError` only when no HTTP response was obtained. A
    /// non-2xx status is a normal `Ok` response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_json_sets_content_type() {
        let url = Url::parse("https://rp.example/auth/fido2/login").unwrap();
        let request = HttpRequest::post_json(url, b"{}".to_vec()).header(headers::USER_ID, "7");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.header_value("content-type"), Some("application/json"));
        assert_eq!(request.header_value("x-user-id"), Some("7"));
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }
}
