//! Property-based tests for request signing.
//!
//! Verifies the signer's contract: determinism, independence from parameter
//! insertion order, sensitivity to value/secret/scheme changes, and the
//! permissive fallback for unknown scheme identifiers.

use proptest::prelude::*;
use topapi_core::auth::{Params, SignMethod, canonical_string, sign};

// ============================================================================
// Test Generators
// ============================================================================

/// Strategy for generating parameter keys.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}"
}

/// Strategy for generating parameter values.
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:-]{0,24}"
}

/// Strategy for generating non-empty parameter lists.
fn pairs_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec((key_strategy(), value_strategy()), 1..8)
}

/// Strategy for generating secrets.
fn secret_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{0,32}"
}

/// Strategy for generating scheme identifiers the signer does not know.
fn unknown_method_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,16}".prop_filter("must not name a known scheme", |name| {
        name != "md5" && name != "hmac-sha256"
    })
}

fn to_params(pairs: &[(String, String)]) -> Params {
    pairs.iter().cloned().collect()
}

proptest! {
    #[test]
    fn prop_signing_is_deterministic(
        pairs in pairs_strategy(),
        secret in secret_strategy(),
    ) {
        let params = to_params(&pairs);
        for method in [SignMethod::HmacSha256, SignMethod::Md5] {
            prop_assert_eq!(
                sign(&params, &secret, method),
                sign(&params, &secret, method)
            );
        }
    }

    #[test]
    fn prop_insertion_order_is_irrelevant(
        pairs in pairs_strategy(),
        secret in secret_strategy(),
    ) {
        let forward = to_params(&pairs);
        let mut reversed_pairs = pairs.clone();
        reversed_pairs.reverse();
        let reversed = to_params(&reversed_pairs);

        prop_assert_eq!(canonical_string(&forward), canonical_string(&reversed));
        prop_assert_eq!(
            sign(&forward, &secret, SignMethod::HmacSha256),
            sign(&reversed, &secret, SignMethod::HmacSha256)
        );
    }

    #[test]
    fn prop_value_change_changes_signature(
        pairs in pairs_strategy(),
        secret in secret_strategy(),
    ) {
        let params = to_params(&pairs);
        let mut modified = params.clone();
        // lengthening one value changes the canonical string unconditionally
        let key = modified.keys().next().unwrap().clone();
        let value = format!("{}x", modified[&key]);
        modified.insert(key, value);

        prop_assert_ne!(canonical_string(&params), canonical_string(&modified));
        prop_assert_ne!(
            sign(&params, &secret, SignMethod::HmacSha256),
            sign(&modified, &secret, SignMethod::HmacSha256)
        );
    }

    #[test]
    fn prop_secret_change_changes_signature(
        pairs in pairs_strategy(),
        secret in secret_strategy(),
    ) {
        let params = to_params(&pairs);
        let other = format!("{secret}x");
        prop_assert_ne!(
            sign(&params, &secret, SignMethod::HmacSha256),
            sign(&params, &other, SignMethod::HmacSha256)
        );
        prop_assert_ne!(
            sign(&params, &secret, SignMethod::Md5),
            sign(&params, &other, SignMethod::Md5)
        );
    }

    #[test]
    fn prop_schemes_disagree(
        pairs in pairs_strategy(),
        secret in secret_strategy(),
    ) {
        let params = to_params(&pairs);
        // the digests differ in length, so the schemes can never collide
        let hmac = sign(&params, &secret, SignMethod::HmacSha256);
        let md5 = sign(&params, &secret, SignMethod::Md5);
        prop_assert_eq!(hmac.len(), 64);
        prop_assert_eq!(md5.len(), 32);
    }

    #[test]
    fn prop_unknown_scheme_falls_back_to_default(
        name in unknown_method_strategy(),
        pairs in pairs_strategy(),
        secret in secret_strategy(),
    ) {
        let method = SignMethod::from_name(&name);
        prop_assert_eq!(method, SignMethod::HmacSha256);

        let params = to_params(&pairs);
        prop_assert_eq!(
            sign(&params, &secret, method),
            sign(&params, &secret, SignMethod::HmacSha256)
        );
    }

    #[test]
    fn prop_signature_is_uppercase_hex(
        pairs in pairs_strategy(),
        secret in secret_strategy(),
    ) {
        for method in [SignMethod::HmacSha256, SignMethod::Md5] {
            let signature = sign(&to_params(&pairs), &secret, method);
            prop_assert!(
                signature
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
            );
        }
    }
}
