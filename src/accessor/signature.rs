//! Pluggable signature evaluation.
//!
//! The accessor owns canonicalization: it turns the request arguments and
//! the secret key into a single origin string. An [`EvalSignature`] only
//! decides how that string is hashed and rendered, so the digest algorithm
//! can be swapped without touching canonicalization.
//!
//! The canonical origin is built as follows:
//!
//! 1. Take every argument except `signature` (`nonce` and `timestamp` are signed).
//! 2. Sort the pairs by key in byte order.
//! 3. Concatenate them as `key1value1key2value2...` without separators.
//! 4. Append the secret key.

use crate::accessor::args::Args;
use md5::{Digest, Md5};
use subtle::ConstantTimeEq;

/// Name of the request argument carrying the nonce.
pub const NONCE_TAG: &str = "nonce";
/// Name of the request argument carrying the Unix timestamp.
pub const TIMESTAMP_TAG: &str = "timestamp";
/// Name of the request argument carrying the signature.
pub const SIGNATURE_TAG: &str = "signature";

/// Maps a canonical origin string to a digest string.
///
/// Implementations must be deterministic: the same origin always yields the
/// same digest. Any `Fn(&str) -> String + Send + Sync` closure qualifies.
///
/// # Example
///
/// ```rust
/// use api_accessor::signature::EvalSignature;
///
/// struct Reversed;
///
/// impl EvalSignature for Reversed {
///     fn name(&self) -> &'static str {
///         "reversed"
///     }
///
///     fn eval(&self, origin: &str) -> String {
///         origin.chars().rev().collect()
///     }
/// }
///
/// assert_eq!(Reversed.eval("abc"), "cba");
///
/// let upper = |origin: &str| origin.to_uppercase();
/// assert_eq!(upper.eval("abc"), "ABC");
/// ```
pub trait EvalSignature: Send + Sync {
    /// Short identifier used in diagnostics, such as `"md5"`.
    fn name(&self) -> &'static str {
        "custom"
    }

    /// Computes the digest of `origin`.
    fn eval(&self, origin: &str) -> String;
}

impl<F> EvalSignature for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn eval(&self, origin: &str) -> String {
        self(origin)
    }
}

/// MD5 digest rendered as 32 lowercase hex characters.
///
/// This is the default evaluator. It matches clients that sign with the
/// classic `md5(sorted params + secret)` scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Signature;

impl EvalSignature for Md5Signature {
    fn name(&self) -> &'static str {
        "md5"
    }

    fn eval(&self, origin: &str) -> String {
        hex::encode(Md5::digest(origin.as_bytes()))
    }
}

/// SHA-256 digest rendered as 64 lowercase hex characters.
#[cfg(feature = "algo-sha256")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Signature;

#[cfg(feature = "algo-sha256")]
impl EvalSignature for Sha256Signature {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn eval(&self, origin: &str) -> String {
        use sha2::Sha256;

        hex::encode(Sha256::digest(origin.as_bytes()))
    }
}

/// Type alias for the default signature evaluator.
pub type DefaultEvalSignature = Md5Signature;

/// Builds the canonical origin string for `args` signed with `secret`.
///
/// # Example
///
/// ```rust
/// use api_accessor::{Args, signature::canonical_origin};
///
/// let args = Args::from_pairs([
///     ("timestamp", "100"),
///     ("nonce", "n"),
///     ("signature", "ignored"),
///     ("abc", "x"),
/// ]);
///
/// assert_eq!(canonical_origin(&args, "key"), "abcxnoncentimestamp100key");
/// ```
pub fn canonical_origin(args: &Args, secret: &str) -> String {
    let pairs = args.excluding(&[SIGNATURE_TAG]);
    let capacity = pairs.iter().map(|(k, v)| k.len() + v.len()).sum::<usize>() + secret.len();

    let mut origin = String::with_capacity(capacity);
    for (key, value) in pairs {
        origin.push_str(key);
        origin.push_str(value);
    }
    origin.push_str(secret);
    origin
}

/// Exact, case-sensitive comparison that does not short-circuit on content.
pub(crate) fn signatures_match(expected: &str, supplied: &str) -> bool {
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}
