// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::HeaderMap;

use crate::error::RelayError;

/// Constant-time string comparison to prevent timing side-channel attacks.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}

/// Validate a Bearer token from HTTP headers.
///
/// `expected = None` means auth is disabled for the endpoint.
pub fn validate_bearer(headers: &HeaderMap, expected: Option<&str>) -> Result<(), RelayError> {
    let expected = match expected {
        Some(tok) => tok,
        None => return Ok(()),
    };

    let header =
        headers.get("authorization").and_then(|v| v.to_str().ok()).ok_or(RelayError::Unauthorized)?;

    let token = header.strip_prefix("Bearer ").ok_or(RelayError::Unauthorized)?;
    if constant_time_eq(token, expected) {
        Ok(())
    } else {
        Err(RelayError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_match() {
        assert!(constant_time_eq("secret-value", "secret-value"));
    }

    #[test]
    fn different_lengths_never_match() {
        assert!(!constant_time_eq("secret", "secret-value"));
    }

    #[test]
    fn bearer_validation_requires_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Token abc".parse().expect("header value"));
        assert_eq!(validate_bearer(&headers, Some("abc")), Err(RelayError::Unauthorized));
    }

    #[test]
    fn bearer_validation_disabled_without_expected() {
        assert_eq!(validate_bearer(&HeaderMap::new(), None), Ok(()));
    }
}
