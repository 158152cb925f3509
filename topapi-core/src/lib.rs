//! TOP API Core Library
//!
//! Request execution engine for the Taobao Open Platform's signed, paginated
//! RPC-style HTTP API. Callers name a remote operation and supply string
//! parameters; the engine merges in the fixed configuration, signs the call
//! canonically, executes it, and — for list operations — transparently
//! fetches every page, retrying failures per policy, before handing back the
//! raw response documents.
//!
//! # Features
//!
//! - **Canonical signing**: HMAC-SHA256 (default) or legacy MD5 over the
//!   sorted key+value parameter string
//! - **Async/Await**: built on tokio and reqwest
//! - **Error Handling**: four-kind taxonomy with `thiserror`
//! - **Full pagination**: bounded fan-out, serialized retry path, single
//!   collector aggregation
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::Value;
//! use topapi_core::prelude::*;
//!
//! # async fn example() -> topapi_core::Result<()> {
//! let req = ApiRequest::new("app-key", "app-secret", "session-key")?;
//!
//! let mut params = Params::new();
//! params.insert("fields".to_string(), "total_results,tid,created".to_string());
//!
//! let pages = req
//!     .get_all("taobao.trades.sold.get", &params, 100, |doc| {
//!         doc.get("total_results").and_then(Value::as_u64)
//!     })
//!     .await?;
//! println!("fetched {} pages", pages.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// Re-exports of external dependencies
pub use serde;
pub use serde_json;

// Core modules
pub mod auth;
pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod logging;
pub mod pagination;
pub mod query;
pub mod request;
pub mod time;

// Re-exports of core types for convenience
pub use auth::{Params, SIGN_FIELD, SignMethod};
pub use config::{ApiConfig, SecretString};
pub use document::{Document, project};
pub use error::{BizErrorDetails, DecodeError, Error, Result, TransportError};
pub use http::{HttpClient, HttpConfig, ProxyConfig};
pub use pagination::{
    DEFAULT_MAX_WORKERS, DEFAULT_PAGE_SIZE, PaginationConfig, RetryPolicy,
};
pub use request::{ApiRequest, DEFAULT_BASE_URL};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```rust
/// use topapi_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{Params, SignMethod};
    pub use crate::config::{ApiConfig, SecretString};
    pub use crate::document::{Document, project};
    pub use crate::error::{Error, Result};
    pub use crate::http::{HttpClient, HttpConfig, ProxyConfig};
    pub use crate::logging::{LogConfig, LogFormat, LogLevel, init_logging, try_init_logging};
    pub use crate::pagination::{PaginationConfig, RetryPolicy};
    pub use crate::request::ApiRequest;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "topapi-core");
    }
}
