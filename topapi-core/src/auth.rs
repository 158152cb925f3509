//! Request signing.
//!
//! Every call is signed over a canonical rendering of its full parameter set:
//! each parameter's key concatenated directly with its value, the resulting
//! `key+value` strings sorted byte-wise and joined with no separator. Two
//! signature schemes are supported, selected by the `sign_method` protocol
//! field.

use std::collections::BTreeMap;
use std::fmt;

use hmac::{Hmac, Mac};
use md5::Md5;
use sha2::Sha256;

/// One call's parameters: string keys mapped to string values.
pub type Params = BTreeMap<String, String>;

/// The query-string field carrying the computed signature. Never part of the
/// canonical string.
pub const SIGN_FIELD: &str = "sign";

/// Supported signing schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignMethod {
    /// Keyed HMAC-SHA256 over the canonical string; the protocol default.
    #[default]
    HmacSha256,
    /// MD5 of `secret + canonical + secret`; legacy scheme.
    Md5,
}

impl SignMethod {
    /// Resolves a `sign_method` identifier.
    ///
    /// Unrecognized identifiers fall back to [`SignMethod::HmacSha256`]
    /// rather than erroring; the provider treats the field the same way, so
    /// rejecting here would break callers the remote side accepts.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "md5" => SignMethod::Md5,
            _ => SignMethod::HmacSha256,
        }
    }

    /// The identifier sent in the `sign_method` protocol field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SignMethod::HmacSha256 => "hmac-sha256",
            SignMethod::Md5 => "md5",
        }
    }
}

impl fmt::Display for SignMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the canonical string over a parameter set.
///
/// The `sign` field itself is excluded; everything else, fixed config and
/// call-specific parameters alike, participates. The result is independent of
/// how the parameter set was assembled.
#[must_use]
pub fn canonical_string(params: &Params) -> String {
    let mut parts: Vec<String> = params
        .iter()
        .filter(|(key, _)| key.as_str() != SIGN_FIELD)
        .map(|(key, value)| format!("{key}{value}"))
        .collect();
    // Sorting the concatenated key+value strings, not the keys: a key that is
    // a prefix of another can order differently once values are appended.
    parts.sort_unstable();
    parts.concat()
}

/// Signs a parameter set with the shared secret under the given scheme.
///
/// Returns the uppercase hexadecimal digest.
#[must_use]
pub fn sign(params: &Params, secret: &str, method: SignMethod) -> String {
    let canonical = canonical_string(params);
    match method {
        SignMethod::HmacSha256 => hmac_sha256_hex(canonical.as_bytes(), secret.as_bytes()),
        SignMethod::Md5 => md5_salted_hex(canonical.as_bytes(), secret.as_bytes()),
    }
}

/// Computes an uppercase-hex HMAC-SHA256 digest.
fn hmac_sha256_hex(data: &[u8], secret: &[u8]) -> String {
    type HmacSha256 = Hmac<Sha256>;
    // HMAC accepts keys of any length, including empty; this cannot fail.
    let mut mac = HmacSha256::new_from_slice(secret)
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(data);
    hex::encode_upper(mac.finalize().into_bytes())
}

/// Computes the legacy uppercase-hex `md5(secret + canonical + secret)`.
fn md5_salted_hex(data: &[u8], secret: &[u8]) -> String {
    use md5::Digest;
    let mut hasher = Md5::new();
    hasher.update(secret);
    hasher.update(data);
    hasher.update(secret);
    hex::encode_upper(hasher.finalize())
}
