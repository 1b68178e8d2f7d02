//! Transport abstraction used by every bare-metal operation.
//!
//! Operations assemble an [`ApiRequest`] and hand it to a [`Transport`],
//! which executes it and returns the raw response body. The transport also
//! supplies the ambient defaults (zone, organization, page size) that the
//! request builders fall back on.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{BaremetalConfig, ConfigError};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while executing a request or decoding its response.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read.
    #[error("http request failed: {message}")]
    Http {
        /// Message reported by the HTTP client.
        message: String,
    },
    /// The API answered with a non-success status.
    #[error("api returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// The request body could not be encoded as JSON.
    #[error("failed to encode request body: {message}")]
    Encode {
        /// Message reported by the JSON encoder.
        message: String,
    },
    /// The response body was not the expected JSON document.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Message reported by the JSON decoder.
        message: String,
    },
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http {
            message: value.to_string(),
        }
    }
}

/// Fully assembled request descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute path starting with `/`.
    pub path: String,
    /// Query pairs in emission order; sequences appear as repeated keys.
    pub query: Vec<(String, String)>,
    /// Extra headers sent alongside the authentication header.
    pub headers: Vec<(String, String)>,
    /// JSON body, when the operation sends one.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Starts a request with no query, headers or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Appends a query pair.
    pub fn add_query(&mut self, key: &str, value: impl ToString) {
        self.query.push((key.to_owned(), value.to_string()));
    }

    /// Appends a query pair when `value` is present.
    pub fn add_optional_query<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(present) = value {
            self.add_query(key, present);
        }
    }

    /// Appends one query pair per element.
    pub fn add_repeated_query<V: ToString>(&mut self, key: &str, values: &[V]) {
        for value in values {
            self.add_query(key, value.to_string());
        }
    }

    /// Returns every value recorded for `key`, in order.
    #[must_use]
    pub fn query_values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

/// Future returned by transport operations.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'a>>;

/// Executes requests and exposes the ambient client defaults.
pub trait Transport: Send + Sync {
    /// Executes `request` and returns the raw response body.
    fn execute<'a>(&'a self, request: &'a ApiRequest) -> TransportFuture<'a, String>;

    /// Zone used when a request leaves its zone empty.
    fn default_zone(&self) -> Option<String>;

    /// Organization used when a create-style request omits one.
    fn default_organization_id(&self) -> Option<String>;

    /// Page size used when a list request omits one.
    fn default_page_size(&self) -> Option<u32>;
}

/// Decodes a JSON response body into `T`.
///
/// # Errors
///
/// Returns [`TransportError::Decode`] when the body does not match `T`.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, TransportError> {
    serde_json::from_str(body).map_err(|err| {
        warn!(error = %err, "failed to decode response body");
        TransportError::Decode {
            message: err.to_string(),
        }
    })
}

/// Encodes a request body as JSON.
///
/// # Errors
///
/// Returns [`TransportError::Encode`] when `body` cannot be represented as JSON.
pub fn encode<B: Serialize>(body: &B) -> Result<Value, TransportError> {
    serde_json::to_value(body).map_err(|err| TransportError::Encode {
        message: err.to_string(),
    })
}

/// [`Transport`] backed by `reqwest`, authenticating with `X-Auth-Token`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    config: BaremetalConfig,
}

impl HttpTransport {
    /// Builds a transport from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails or the HTTP client
    /// cannot be constructed.
    pub fn new(config: BaremetalConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|err| ConfigError::Parse(err.to_string()))?;
        Ok(Self { client, config })
    }

    /// Configuration the transport was built from.
    #[must_use]
    pub const fn config(&self) -> &BaremetalConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url.trim_end_matches('/'))
    }

    async fn send(&self, request: &ApiRequest) -> Result<String, TransportError> {
        debug!(method = %request.method, path = %request.path, "dispatching request");

        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path))
            .header("X-Auth-Token", &self.config.secret_key)
            .query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            return Ok(text);
        }

        warn!(status = status.as_u16(), path = %request.path, "request rejected");
        Err(TransportError::Status {
            status: status.as_u16(),
            body: text,
        })
    }
}

impl Transport for HttpTransport {
    fn execute<'a>(&'a self, request: &'a ApiRequest) -> TransportFuture<'a, String> {
        Box::pin(self.send(request))
    }

    fn default_zone(&self) -> Option<String> {
        self.config.zone()
    }

    fn default_organization_id(&self) -> Option<String> {
        self.config.organization_id()
    }

    fn default_page_size(&self) -> Option<u32> {
        self.config.page_size()
    }
}
