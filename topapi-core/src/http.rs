//! HTTP transport layer.
//!
//! A thin wrapper over `reqwest` that issues the engine's GET calls and maps
//! outcomes onto the error taxonomy: transport failures and non-200 statuses
//! become transport errors, undecodable bodies become decode errors. Retry
//! and pooling policy beyond what the underlying client provides is out of
//! scope here.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, instrument};

use crate::document::Document;
use crate::error::{self, Error, Result, TransportError};

/// Proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy URL (e.g., "http://127.0.0.1:8080").
    pub url: String,
    /// Optional username for authentication.
    pub username: Option<String>,
    /// Optional password for authentication.
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Create a new proxy configuration with just a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// Set credentials for the proxy.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// TCP connection timeout.
    pub connect_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Optional proxy configuration.
    pub proxy: Option<ProxyConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("topapi-rust/", env!("CARGO_PKG_VERSION")).to_string(),
            proxy: None,
        }
    }
}

/// The engine's HTTP client.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
}

impl HttpClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the proxy URL is invalid or the
    /// underlying client cannot be built.
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .user_agent(&config.user_agent);

        if let Some(proxy_config) = &config.proxy {
            let mut proxy = reqwest::Proxy::all(&proxy_config.url)
                .map_err(|e| Error::transport(format!("invalid proxy URL: {e}")))?;

            if let (Some(username), Some(password)) =
                (&proxy_config.username, &proxy_config.password)
            {
                proxy = proxy.basic_auth(username, password);
            }
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Issues a GET and decodes the body as a [`Document`].
    ///
    /// # Errors
    ///
    /// - [`TransportError`] if the request fails or the status is not 200.
    /// - A decode error if the body is not valid JSON.
    #[instrument(name = "http_get", skip_all, fields(url_len = url.len()))]
    pub async fn get(&self, url: &str) -> Result<Document> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(TransportError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(TransportError::from)?;

        debug!(
            status = status.as_u16(),
            body_length = body.len(),
            "response received"
        );

        if status.as_u16() != 200 {
            error!(status = status.as_u16(), "non-success status");
            return Err(TransportError::RequestFailed {
                status: status.as_u16(),
                message: error::truncate_message(body),
            }
            .into());
        }

        serde_json::from_str(&body).map_err(Error::from)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}
