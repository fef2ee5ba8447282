use crate::SignedParams;
use crate::accessor::args::Args;
use crate::accessor::error::AccessorError;
use crate::accessor::signature::{
    DefaultEvalSignature, EvalSignature, NONCE_TAG, SIGNATURE_TAG, TIMESTAMP_TAG,
    canonical_origin,
};
use crate::accessor::time_utils::current_timestamp;
use std::sync::Arc;

/// A function that generates unique nonce values.
pub type NonceGeneratorFn = Box<dyn Fn() -> String + Send + Sync>;

/// A function that provides timestamps.
pub type SignerTimeProviderFn = Box<dyn Fn() -> Result<i64, AccessorError> + Send + Sync>;

/// Client-side counterpart of [`Accessor`](crate::Accessor).
///
/// Adds a fresh `nonce`, the current `timestamp` and the matching
/// `signature` to a set of request parameters.
///
/// # Example
///
/// ```rust
/// use api_accessor::{Accessor, AccessorOptions, RequestSigner};
///
/// let signed = RequestSigner::new("secret")
///     .with_nonce_generator(|| "fixed-nonce".to_string())
///     .sign([("phone", "12345")])?;
///
/// assert_eq!(signed.nonce, "fixed-nonce");
///
/// let accessor = Accessor::from_query(&signed.to_query(), "secret", AccessorOptions::default())?;
/// accessor.check_signature()?;
/// # Ok::<(), api_accessor::AccessorError>(())
/// ```
pub struct RequestSigner {
    secret: String,
    nonce_generator: NonceGeneratorFn,
    time_provider: SignerTimeProviderFn,
    eval_signature: Arc<dyn EvalSignature>,
}

impl RequestSigner {
    /// Creates a signer for `secret` with default nonce generation, system
    /// time and the default digest.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            nonce_generator: Box::new(default_nonce),
            time_provider: Box::new(current_timestamp),
            eval_signature: Arc::new(DefaultEvalSignature::default()),
        }
    }

    /// Sets a custom nonce generator function.
    ///
    /// The generator must produce a distinct value on every call.
    pub fn with_nonce_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.nonce_generator = Box::new(generator);
        self
    }

    /// Sets a custom time provider function.
    pub fn with_time_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Result<i64, AccessorError> + Send + Sync + 'static,
    {
        self.time_provider = Box::new(provider);
        self
    }

    /// Sets the digest function. It must match the verifier's.
    pub fn with_eval_signature<E>(mut self, eval: E) -> Self
    where
        E: EvalSignature + 'static,
    {
        self.eval_signature = Arc::new(eval);
        self
    }

    /// Signs `params`.
    ///
    /// Any `nonce`, `timestamp` or `signature` already present in `params`
    /// is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the time provider fails.
    pub fn sign<I, K, V>(&self, params: I) -> Result<SignedParams, AccessorError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let timestamp = (self.time_provider)()?;
        let nonce = (self.nonce_generator)();

        let supplied = Args::from_pairs(params);
        let domain: Vec<(String, String)> = supplied
            .excluding(&[NONCE_TAG, TIMESTAMP_TAG, SIGNATURE_TAG])
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let signing_args = Args::from_pairs(domain.iter().cloned().chain([
            (NONCE_TAG.to_string(), nonce.clone()),
            (TIMESTAMP_TAG.to_string(), timestamp.to_string()),
        ]));
        let signature = self
            .eval_signature
            .eval(&canonical_origin(&signing_args, &self.secret));

        Ok(SignedParams {
            nonce,
            timestamp,
            signature,
            params: domain.into_iter().collect(),
        })
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret", &"<redacted>")
            .field("eval_signature", &self.eval_signature.name())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "default-generators")]
fn default_nonce() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(not(feature = "default-generators"))]
fn default_nonce() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{nanos:x}-{:x}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::signature::Md5Signature;

    #[test]
    fn test_basic_signing() {
        let signed = RequestSigner::new("123")
            .with_nonce_generator(|| "12345".to_string())
            .with_time_provider(|| Ok(12345))
            .sign([("phone", "12345"), ("abc", "abc")])
            .unwrap();

        assert_eq!(signed.nonce, "12345");
        assert_eq!(signed.timestamp, 12345);
        assert_eq!(signed.signature, "aaa03f6c3c3cf70e75cc44fe46ab2cd8");
        assert_eq!(signed.params.len(), 2);
    }

    #[test]
    fn test_reserved_params_are_replaced() {
        let signed = RequestSigner::new("123")
            .with_nonce_generator(|| "fresh".to_string())
            .with_time_provider(|| Ok(100))
            .sign([
                ("nonce", "stale"),
                ("timestamp", "1"),
                ("signature", "forged"),
                ("a", "1"),
            ])
            .unwrap();

        assert_eq!(signed.nonce, "fresh");
        assert_eq!(signed.timestamp, 100);
        assert_ne!(signed.signature, "forged");
        assert_eq!(signed.params.keys().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_default_nonces_are_unique() {
        let signer = RequestSigner::new("secret");
        let first = signer.sign([("a", "1")]).unwrap();
        let second = signer.sign([("a", "1")]).unwrap();

        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.signature, second.signature);
    }

    #[test]
    fn test_time_provider_error() {
        let result = RequestSigner::new("secret")
            .with_time_provider(|| Err(AccessorError::ClockError("no clock".to_string())))
            .sign([("a", "1")]);

        assert!(matches!(result, Err(AccessorError::ClockError(_))));
    }

    #[test]
    fn test_custom_eval_signature() {
        let signed = RequestSigner::new("k")
            .with_eval_signature(|origin: &str| format!("len{}", origin.len()))
            .with_nonce_generator(|| "n".to_string())
            .with_time_provider(|| Ok(7))
            .sign(Vec::<(String, String)>::new())
            .unwrap();

        // "noncen" + "timestamp7" + "k"
        assert_eq!(signed.signature, "len17");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let signer = RequestSigner::new("hunter2").with_eval_signature(Md5Signature);
        let debug = format!("{signer:?}");

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("md5"));
    }
}
