//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate a plausible function target (class or method reference)
    pub fn function_target() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9_.]{0,40}"
    }

    /// Generate a valid SHA256 hash (64 hex characters)
    pub fn sha256_hash() -> impl Strategy<Value = String> {
        "[0-9a-f]{64}"
    }

    /// Generate a valid archive URL
    pub fn archive_url() -> impl Strategy<Value = String> {
        ("[a-z]{3,10}", "[a-z]{2,5}", "[a-z0-9-]{1,20}").prop_map(|(domain, tld, path)| {
            format!("https://{domain}.{tld}/{path}.tar.gz")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_function_target_generator(target in function_target()) {
            prop_assert!(!target.is_empty());
            prop_assert!(target.chars().next().unwrap().is_ascii_alphabetic());
        }

        #[test]
        fn test_sha256_hash_generator(hash in sha256_hash()) {
            prop_assert_eq!(hash.len(), 64);
            prop_assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        }

        #[test]
        fn test_archive_url_generator(url in archive_url()) {
            prop_assert!(url.starts_with("https://"));
            prop_assert!(url.ends_with(".tar.gz"));
        }
    }
}
