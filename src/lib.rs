//! # API Accessor
//!
//! Authentication for API requests carried as a flat set of named string
//! parameters, such as a URL query or a form body.
//!
//! Each request carries three reserved parameters next to its own:
//!
//! - `nonce`: a value used at most once, to detect replays
//! - `timestamp`: seconds since the Unix epoch, to reject delayed requests
//! - `signature`: a digest over every other parameter plus a shared secret
//!
//! An [`Accessor`] answers three independent questions about such a request:
//!
//! - **Signature**: was it sent by a holder of the shared secret?
//! - **Timestamp**: was it sent recently enough?
//! - **Nonce**: has this exact request been seen before?
//!
//! ## Quick Start
//!
//! ```rust
//! use api_accessor::{Accessor, AccessorError, AccessorOptions, RequestSigner};
//!
//! # fn example() -> Result<(), AccessorError> {
//! // Client side
//! let signed = RequestSigner::new("shared_secret").sign([("phone", "12345")])?;
//! let query = signed.to_query();
//!
//! // Server side
//! let accessor = Accessor::from_query(&query, "shared_secret", AccessorOptions::default())?;
//! accessor.check_timestamp()?;
//! accessor.check_signature()?;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Signing Scheme
//!
//! Every parameter except `signature` is sorted by key, concatenated as
//! `key1value1key2value2...`, and the secret key is appended. The default
//! digest is MD5 rendered as lowercase hex; see [`signature`] to plug in
//! another one.
//!
//! ## Replay Protection Is Opt-In
//!
//! The crate stores no nonces. Without a [`NonceChecker`] injected through
//! [`AccessorOptions::with_nonce_checker`], [`Accessor::check_nonce`] accepts
//! every request. See [`nonce`] for the backend contract.
//!
//! ## Configuration
//!
//! The default timestamp window is 60 seconds. It can be set per accessor
//! through [`AccessorOptions`], picked from a [`ConfigPreset`], or read once
//! from the `API_ACCESSOR_TIME_WINDOW` environment variable (seconds) with
//! [`ConfigPreset::FromEnv`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod accessor;

// Re-export commonly used types
pub use accessor::{
    Accessor, AccessorConfig, AccessorError, AccessorOptions, Arg, Args, ConfigPreset,
    EvalSignature, Md5Signature, NonceChecker, PermissiveNonceChecker, RequestSigner,
    TimestampChecker, WindowTimestampChecker, nonce, signature, timestamp,
};

use accessor::{NONCE_TAG, SIGNATURE_TAG, TIMESTAMP_TAG};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped when rendering a query string: everything but the
/// RFC 3986 unreserved set.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A request's parameters together with the reserved authentication fields.
///
/// Produced by [`RequestSigner::sign`]. `params` holds only the caller's own
/// parameters; the reserved fields live in their dedicated members.
///
/// # Serialization
///
/// Implements `Serialize` and `Deserialize` so signed requests can be
/// shipped as JSON as well as query strings.
///
/// # Example
///
/// ```rust
/// use api_accessor::RequestSigner;
///
/// let signed = RequestSigner::new("secret")
///     .with_nonce_generator(|| "n1".to_string())
///     .with_time_provider(|| Ok(1_700_000_000))
///     .sign([("path", "/a b")])?;
///
/// assert_eq!(
///     signed.to_query(),
///     format!("nonce=n1&path=%2Fa%20b&signature={}&timestamp=1700000000", signed.signature)
/// );
/// # Ok::<(), api_accessor::AccessorError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedParams {
    /// Unique value for this request.
    pub nonce: String,

    /// Unix timestamp (seconds since epoch) at signing time.
    pub timestamp: i64,

    /// Digest over the canonical origin string.
    pub signature: String,

    /// The caller's own parameters.
    pub params: BTreeMap<String, String>,
}

impl SignedParams {
    /// Returns every parameter, reserved fields included, ready to send.
    pub fn into_params(self) -> BTreeMap<String, String> {
        let mut params = self.params;
        params.insert(NONCE_TAG.to_string(), self.nonce);
        params.insert(TIMESTAMP_TAG.to_string(), self.timestamp.to_string());
        params.insert(SIGNATURE_TAG.to_string(), self.signature);
        params
    }

    /// Renders a percent-encoded query string, keys in sorted order.
    pub fn to_query(&self) -> String {
        self.clone()
            .into_params()
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, QUERY_COMPONENT),
                    utf8_percent_encode(value, QUERY_COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use crate::accessor::{Accessor, AccessorError, AccessorOptions, RequestSigner};
    use std::time::{SystemTime, UNIX_EPOCH};

    const TEST_SECRET: &str = "test_secret_key_123";

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    #[test]
    fn test_signer_accessor_round_trip() {
        let signed = RequestSigner::new(TEST_SECRET)
            .sign([("user", "alice"), ("amount", "10.50")])
            .unwrap();

        let accessor =
            Accessor::new(signed.into_params(), TEST_SECRET, AccessorOptions::default()).unwrap();

        assert!(accessor.verify().is_ok());
    }

    #[test]
    fn test_query_round_trip_with_awkward_values() {
        let signed = RequestSigner::new(TEST_SECRET)
            .sign([
                ("q", "a+b c&d=e"),
                ("unicode", "héllo wörld"),
                ("empty", ""),
            ])
            .unwrap();

        let accessor =
            Accessor::from_query(&signed.to_query(), TEST_SECRET, AccessorOptions::default())
                .unwrap();

        assert_eq!(accessor.args().get("q"), Some("a+b c&d=e"));
        assert_eq!(accessor.args().get("unicode"), Some("héllo wörld"));
        assert_eq!(accessor.args().get("empty"), Some(""));
        assert!(accessor.check_signature().is_ok());
    }

    #[test]
    fn test_tampered_parameter_is_rejected() {
        let signed = RequestSigner::new(TEST_SECRET)
            .sign([("amount", "10")])
            .unwrap();
        let mut params = signed.into_params();
        params.insert("amount".to_string(), "1000".to_string());

        let accessor = Accessor::new(params, TEST_SECRET, AccessorOptions::default()).unwrap();

        assert!(matches!(
            accessor.check_signature(),
            Err(AccessorError::SignatureUnmatched)
        ));
    }

    #[test]
    fn test_stale_signed_request() {
        let signed = RequestSigner::new(TEST_SECRET)
            .with_time_provider(|| Ok(now() - 3600))
            .sign([("a", "1")])
            .unwrap();

        let accessor =
            Accessor::new(signed.into_params(), TEST_SECRET, AccessorOptions::default()).unwrap();

        assert!(accessor.check_signature().is_ok());
        assert!(matches!(
            accessor.check_timestamp(),
            Err(AccessorError::TimestampTimeout)
        ));
    }

    #[test]
    fn test_serialization() {
        let signed = RequestSigner::new(TEST_SECRET)
            .sign([("a", "1")])
            .unwrap();

        let json = serde_json::to_string(&signed).unwrap();
        let deserialized: crate::SignedParams = serde_json::from_str(&json).unwrap();

        assert_eq!(signed, deserialized);
    }
}
