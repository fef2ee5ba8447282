use thiserror::Error;

/// Error types that can occur while validating an API request.
///
/// Every check on an [`Accessor`](crate::Accessor) returns its own variant,
/// never a generic failure, so callers can branch on the cause (for example
/// answering `401` for a bad signature and `409` for a replayed nonce).
///
/// # Error Categories
///
/// - **Construction Errors**: `ArgumentMissing`
/// - **Validation Errors**: `SignatureUnmatched`, `TimestampTimeout`, `NonceAlreadyUsed`
/// - **System Errors**: `NonceBackendError`, `ClockError`
///
/// # Example
///
/// ```rust
/// use api_accessor::{Accessor, AccessorError, AccessorOptions};
///
/// let params = [("nonce", "n-1"), ("timestamp", "12345"), ("signature", "bad")];
/// let accessor = Accessor::new(params, "secret", AccessorOptions::default())?;
///
/// match accessor.check_signature() {
///     Ok(()) => println!("Signature verified"),
///     Err(AccessorError::SignatureUnmatched) => println!("Forged or corrupted request"),
///     Err(e) => println!("Other error: {e}"),
/// }
/// # Ok::<(), AccessorError>(())
/// ```
#[derive(Error, Debug)]
pub enum AccessorError {
    /// A reserved argument is absent or its value cannot be parsed.
    ///
    /// Raised only while constructing an `Accessor`: `nonce`, `timestamp`
    /// and `signature` must all be present, and `timestamp` must be a
    /// base-10 integer. The payload is the argument name.
    #[error("Argument lacking: {0}")]
    ArgumentMissing(String),

    /// The signature computed from the request does not match the supplied one.
    ///
    /// # When This Occurs
    ///
    /// - Client and server are using different secret keys
    /// - A parameter was modified in transit
    /// - Client and server canonicalize or hash differently
    #[error("Signature unmatched")]
    SignatureUnmatched,

    /// The request timestamp lies outside the allowed skew window.
    ///
    /// Both stale requests and requests claiming a time too far in the
    /// future are rejected with this variant.
    #[error("Timestamp timeout")]
    TimestampTimeout,

    /// The nonce backend reports that this nonce has already been consumed.
    #[error("Nonce already used")]
    NonceAlreadyUsed,

    /// The nonce backend could not answer.
    ///
    /// Storage failures are passed through as-is and are never folded into
    /// a replay verdict in either direction.
    #[error("Nonce backend error: {0}")]
    NonceBackendError(String),

    /// The wall clock could not be read.
    #[error("Clock error: {0}")]
    ClockError(String),
}
