//! Endpoint proxies over the `topapi-core` request engine.
//!
//! Each proxy owns a configured [`ApiRequest`](topapi_core::ApiRequest) and
//! shapes one endpoint family: it supplies the operation name, the fixed
//! parameter set, and — for list operations — the total-count extractor, then
//! projects the raw page documents into accessor types. All concurrency and
//! retry behavior lives in the engine.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

use topapi_core::SecretString;

pub mod options;
pub mod trade;
pub mod wms;

pub use options::SnInfoQuery;
pub use trade::{Trade, TradeProxy};
pub use wms::{SerialNumberInfo, WmsProxy};

/// Credential set shared by all proxies.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Application key.
    pub app_key: String,
    /// Application secret (signing key material).
    pub app_secret: SecretString,
    /// Authorized session key.
    pub session_key: String,
}

impl Credentials {
    /// Bundles a credential set.
    pub fn new(
        app_key: impl Into<String>,
        app_secret: impl Into<SecretString>,
        session_key: impl Into<String>,
    ) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            session_key: session_key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_redact_secret() {
        let credentials = Credentials::new("key", "secret", "session");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("key"));
        assert!(!debug.contains("\"secret\""));
        assert!(debug.contains("[REDACTED]"));
    }
}
