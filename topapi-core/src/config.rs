//! Client configuration and credential types.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::auth::{Params, SignMethod};

/// Default protocol version.
pub const DEFAULT_VERSION: &str = "2.0";
/// Default response format.
pub const DEFAULT_FORMAT: &str = "json";

/// The fixed parameters merged into every call.
///
/// Created once at client construction and never mutated afterward;
/// construction-time `with_*` overrides replace the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Application key identifying the caller.
    pub app_key: String,
    /// Authorized session key.
    pub session: String,
    /// Protocol version (`v` field).
    pub version: String,
    /// Response format (`format` field).
    pub format: String,
    /// Whether to request the simplified response shape.
    pub simplify: bool,
    /// Signing scheme advertised in `sign_method` and used by the signer.
    pub sign_method: SignMethod,
}

impl ApiConfig {
    /// Creates a config with the protocol defaults.
    pub fn new(app_key: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            session: session.into(),
            version: DEFAULT_VERSION.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            simplify: true,
            sign_method: SignMethod::default(),
        }
    }

    /// Overrides the protocol version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Overrides the response format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Overrides the simplify flag.
    #[must_use]
    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }

    /// Overrides the signing scheme.
    #[must_use]
    pub fn with_sign_method(mut self, sign_method: SignMethod) -> Self {
        self.sign_method = sign_method;
        self
    }

    /// Renders the fixed parameters for merging into a call.
    #[must_use]
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("app_key".to_string(), self.app_key.clone());
        params.insert("session".to_string(), self.session.clone());
        params.insert("v".to_string(), self.version.clone());
        params.insert("format".to_string(), self.format.clone());
        let simplify = if self.simplify { "true" } else { "false" };
        params.insert("simplify".to_string(), simplify.to_string());
        params.insert(
            "sign_method".to_string(),
            self.sign_method.as_str().to_string(),
        );
        params
    }
}

/// A secret that is zeroed in memory when dropped.
///
/// Holds the application secret used as signing key material. Debug and
/// Display output is redacted so the secret cannot leak through logs.
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wraps a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret. Use immediately; do not persist the reference.
    #[inline]
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ApiConfig::new("appkey", "session");
        assert_eq!(config.app_key, "appkey");
        assert_eq!(config.session, "session");
        assert_eq!(config.version, "2.0");
        assert_eq!(config.format, "json");
        assert!(config.simplify);
        assert_eq!(config.sign_method, SignMethod::HmacSha256);
    }

    #[test]
    fn test_config_overrides() {
        let config = ApiConfig::new("appkey", "session")
            .with_version("3.0")
            .with_format("xml")
            .with_simplify(false)
            .with_sign_method(SignMethod::Md5);
        assert_eq!(config.version, "3.0");
        assert_eq!(config.format, "xml");
        assert!(!config.simplify);
        assert_eq!(config.sign_method, SignMethod::Md5);
    }

    #[test]
    fn test_config_to_params() {
        let params = ApiConfig::new("k", "s").to_params();
        assert_eq!(params["app_key"], "k");
        assert_eq!(params["session"], "s");
        assert_eq!(params["v"], "2.0");
        assert_eq!(params["format"], "json");
        assert_eq!(params["simplify"], "true");
        assert_eq!(params["sign_method"], "hmac-sha256");
    }

    #[test]
    fn test_secret_redacted() {
        let secret = SecretString::new("app-secret");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(secret.to_string(), "[REDACTED]");
        assert_eq!(secret.expose_secret(), "app-secret");
    }
}
