//! `reqwest`-backed transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;

use crate::settings::HttpSettings;
use crate::transport::{headers, HttpRequest, HttpResponse, HttpTransport, Method, TransportError};

/// Production transport: one pooled `reqwest::Client` with timeouts and the
/// `X-Requested-With` header added to every call
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build the client from HTTP settings
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the TLS backend cannot be initialized.
    pub fn new(settings: &HttpSettings) -> Result<Self, TransportError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            headers::REQUESTED_WITH,
            HeaderValue::from_static(headers::XML_HTTP_REQUEST),
        );

        let client = Client::builder()
            .default_headers(default_headers)
            .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds))
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()
            .map_err(|e| {
                TransportError::new("<client>", format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }

    /// Wrap an already configured client
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let target = request.url.to_string();
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        log::debug!("Sending {:?} {target}", request.method);
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(target.as_str(), e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                TransportError::new(target.as_str(), format!("Failed to read body: {e}"))
            })?;

        log::debug!("{target} answered {status} ({} bytes)", body.len());
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
