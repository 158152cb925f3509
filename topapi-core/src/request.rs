//! Single-call execution against the provider endpoint.
//!
//! [`ApiRequest`] owns the fixed configuration, the signing secret, and a
//! shared HTTP client. `get` executes one operation; the full-pagination
//! `get_all` lives in [`crate::pagination`].

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::auth::Params;
use crate::config::{ApiConfig, SecretString};
use crate::document::{self, Document};
use crate::error::Result;
use crate::http::{HttpClient, HttpConfig};
use crate::pagination::PaginationConfig;
use crate::{query, time};

/// The provider's router endpoint.
pub const DEFAULT_BASE_URL: &str = "https://eco.taobao.com/router/rest";

/// A configured client for one application/session pair.
///
/// Cloning is cheap: the HTTP client is shared behind an `Arc`, and the
/// pagination orchestrator clones the request into its worker tasks.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    base_url: String,
    secret: SecretString,
    config: ApiConfig,
    pagination: PaginationConfig,
    http: Arc<HttpClient>,
}

impl ApiRequest {
    /// Creates a request client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn new(
        app_key: impl Into<String>,
        app_secret: impl Into<SecretString>,
        session_key: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(ApiConfig::new(app_key, session_key), app_secret.into())
    }

    /// Creates a request client from an explicit config.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn with_config(config: ApiConfig, secret: SecretString) -> Result<Self> {
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            secret,
            config,
            pagination: PaginationConfig::default(),
            http: Arc::new(HttpClient::new(HttpConfig::default())?),
        })
    }

    /// Overrides the provider endpoint (useful for gateways and tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Rebuilds the HTTP client from a new transport configuration.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn with_http_config(mut self, http: HttpConfig) -> Result<Self> {
        self.http = Arc::new(HttpClient::new(http)?);
        Ok(self)
    }

    /// Overrides the pagination defaults (workers, page keys, retry policy).
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Returns the fixed call configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Returns the active pagination configuration.
    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// Merges one call's parameter set.
    ///
    /// Precedence: protocol fields (`method`, `timestamp`) over caller
    /// params over fixed config.
    fn merged_params(&self, operation: &str, params: &Params) -> Params {
        let mut merged = self.config.to_params();
        for (key, value) in params {
            merged.insert(key.clone(), value.clone());
        }
        merged.insert("method".to_string(), operation.to_string());
        merged.insert("timestamp".to_string(), time::timestamp());
        merged
    }

    /// Executes one operation and returns the decoded document.
    ///
    /// The fixed config, the operation name, and a call-time timestamp are
    /// merged with `params`, the set is signed, and the call goes out as an
    /// HTTP GET. A 200 response is decoded and checked for the provider's
    /// error envelope.
    ///
    /// # Errors
    ///
    /// - Transport error on network failure or non-200 status.
    /// - Decode error if the body is not structured JSON.
    /// - Business error if the envelope carries a nonzero code.
    #[instrument(name = "api_get", skip(self, params), fields(operation = %operation))]
    pub async fn get(&self, operation: &str, params: &Params) -> Result<Document> {
        let merged = self.merged_params(operation, params);
        let query = query::build_query(&merged, &self.secret, self.config.sign_method);
        let url = format!("{}?{}", self.base_url, query);

        let doc = self.http.get(&url).await?;
        document::check_error_envelope(&doc)?;

        debug!(operation, "call succeeded");
        Ok(doc)
    }
}
