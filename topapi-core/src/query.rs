//! Query-string assembly for signed calls.

use crate::auth::{self, Params, SIGN_FIELD, SignMethod};
use crate::config::SecretString;

/// Builds the transport-ready query string for a fully merged parameter set.
///
/// Each parameter is rendered as `key=<url-escaped value>`; the signature is
/// computed over the complete set and appended as the final `sign` pair. The
/// order of the other pairs carries no meaning — only the canonical sorted
/// string fed to the signer does.
#[must_use]
pub fn build_query(params: &Params, secret: &SecretString, method: SignMethod) -> String {
    let mut pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect();

    let signature = auth::sign(params, secret.expose_secret(), method);
    pairs.push(format!("{SIGN_FIELD}={signature}"));

    pairs.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_sign_is_last_pair() {
        let p = params(&[("b", "2"), ("a", "1")]);
        let query = build_query(&p, &SecretString::new("secret"), SignMethod::HmacSha256);
        let last = query.split('&').next_back().unwrap();
        assert!(last.starts_with("sign="));
        assert_eq!(query.matches("sign=").count(), 1);
    }

    #[test]
    fn test_values_are_escaped() {
        let p = params(&[("fields", "total_results,tid,created")]);
        let query = build_query(&p, &SecretString::new("s"), SignMethod::HmacSha256);
        assert!(query.contains("fields=total_results%2Ctid%2Ccreated"));
    }

    #[test]
    fn test_signature_covers_unescaped_values() {
        // the signature is over raw values, so escaping must not affect it
        let p = params(&[("q", "a b")]);
        let expected = auth::sign(&p, "s", SignMethod::HmacSha256);
        let query = build_query(&p, &SecretString::new("s"), SignMethod::HmacSha256);
        assert!(query.ends_with(&format!("sign={expected}")));
        assert!(query.contains("q=a%20b"));
    }
}
