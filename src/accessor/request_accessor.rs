use crate::accessor::args::Args;
use crate::accessor::error::AccessorError;
use crate::accessor::nonce::{NonceChecker, PermissiveNonceChecker};
use crate::accessor::options::AccessorOptions;
use crate::accessor::signature::{
    DefaultEvalSignature, EvalSignature, NONCE_TAG, SIGNATURE_TAG, TIMESTAMP_TAG,
    canonical_origin, signatures_match,
};
use crate::accessor::timestamp::{TimestampChecker, WindowTimestampChecker};
use std::sync::Arc;

/// Validates one signed API request.
///
/// An `Accessor` is built once per request from its raw parameters and the
/// shared secret. Construction fails unless `nonce`, `timestamp` and
/// `signature` are all present and `timestamp` parses as an integer. After
/// that the three checks are independent: call any subset, in any order,
/// any number of times.
///
/// The accessor holds no mutable state and is `Send + Sync`. The only state
/// a check can change lives in the injected nonce backend.
///
/// # Example
///
/// ```rust
/// use api_accessor::{Accessor, AccessorError, AccessorOptions, RequestSigner};
/// use std::collections::HashSet;
/// use std::sync::Mutex;
///
/// # fn example() -> Result<(), AccessorError> {
/// let signed = RequestSigner::new("secret").sign([("user", "alice")])?;
///
/// let seen = Mutex::new(HashSet::new());
/// let options = AccessorOptions::default().with_nonce_checker(move |nonce: &str| -> Result<(), AccessorError> {
///     let mut seen = seen
///         .lock()
///         .map_err(|e| AccessorError::NonceBackendError(e.to_string()))?;
///     if seen.insert(nonce.to_string()) {
///         Ok(())
///     } else {
///         Err(AccessorError::NonceAlreadyUsed)
///     }
/// });
///
/// let accessor = Accessor::new(signed.into_params(), "secret", options)?;
/// accessor.check_timestamp()?;
/// accessor.check_signature()?;
/// accessor.check_nonce()?;
///
/// assert!(matches!(accessor.check_nonce(), Err(AccessorError::NonceAlreadyUsed)));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct Accessor {
    args: Args,
    secret: String,
    timestamp: i64,
    eval_signature: Arc<dyn EvalSignature>,
    timestamp_checker: Arc<dyn TimestampChecker>,
    nonce_checker: Arc<dyn NonceChecker>,
}

impl Accessor {
    /// Builds an accessor from name/value pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AccessorError::ArgumentMissing`] if `nonce`, `timestamp` or
    /// `signature` is absent, or if `timestamp` is not a base-10 integer.
    pub fn new<I, K, V>(
        params: I,
        secret: impl Into<String>,
        options: AccessorOptions,
    ) -> Result<Self, AccessorError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_args(Args::from_pairs(params), secret, options)
    }

    /// Builds an accessor from a URL query string such as `a=1&nonce=...`.
    ///
    /// See [`Args::from_query`] for the decoding rules.
    pub fn from_query(
        query: &str,
        secret: impl Into<String>,
        options: AccessorOptions,
    ) -> Result<Self, AccessorError> {
        Self::from_args(Args::from_query(query), secret, options)
    }

    /// Builds an accessor from an already collected argument set.
    pub fn from_args(
        args: Args,
        secret: impl Into<String>,
        options: AccessorOptions,
    ) -> Result<Self, AccessorError> {
        for tag in [NONCE_TAG, TIMESTAMP_TAG, SIGNATURE_TAG] {
            if !args.contains(tag) {
                tracing::debug!(argument = tag, "request is missing a reserved argument");
                return Err(AccessorError::ArgumentMissing(tag.to_string()));
            }
        }

        let timestamp = args
            .get(TIMESTAMP_TAG)
            .and_then(|raw| raw.parse::<i64>().ok())
            .ok_or_else(|| {
                tracing::debug!("request timestamp is not an integer");
                AccessorError::ArgumentMissing(TIMESTAMP_TAG.to_string())
            })?;

        let AccessorOptions {
            config,
            eval_signature,
            timestamp_checker,
            nonce_checker,
        } = options;

        let eval_signature: Arc<dyn EvalSignature> = match eval_signature {
            Some(eval) => eval,
            None => Arc::new(DefaultEvalSignature::default()),
        };
        let timestamp_checker: Arc<dyn TimestampChecker> = match timestamp_checker {
            Some(checker) => checker,
            None => Arc::new(WindowTimestampChecker::new(config.time_window)),
        };
        let nonce_checker: Arc<dyn NonceChecker> = match nonce_checker {
            Some(checker) => checker,
            None => Arc::new(PermissiveNonceChecker),
        };

        Ok(Self {
            args,
            secret: secret.into(),
            timestamp,
            eval_signature,
            timestamp_checker,
            nonce_checker,
        })
    }

    /// Recomputes the signature and compares it with the supplied one.
    ///
    /// Pure: repeated calls on the same accessor give the same verdict.
    pub fn check_signature(&self) -> Result<(), AccessorError> {
        if signatures_match(&self.expected_signature(), self.signature()) {
            Ok(())
        } else {
            tracing::debug!(
                algorithm = self.eval_signature.name(),
                "request signature unmatched"
            );
            Err(AccessorError::SignatureUnmatched)
        }
    }

    /// Runs the configured timestamp policy on the request's timestamp.
    pub fn check_timestamp(&self) -> Result<(), AccessorError> {
        self.timestamp_checker.check(self.timestamp)
    }

    /// Hands the request's nonce to the configured nonce backend.
    ///
    /// Without an injected checker this always succeeds.
    pub fn check_nonce(&self) -> Result<(), AccessorError> {
        self.nonce_checker.check(self.nonce()).inspect_err(|e| {
            tracing::debug!(error = %e, "nonce check failed");
        })
    }

    /// Runs all three checks, stopping at the first failure.
    ///
    /// The nonce is checked last so a request that fails the timestamp or
    /// signature check never consumes it.
    pub fn verify(&self) -> Result<(), AccessorError> {
        self.check_timestamp()?;
        self.check_signature()?;
        self.check_nonce()
    }

    /// The digest the configured evaluator produces for this request.
    pub fn expected_signature(&self) -> String {
        self.eval_signature
            .eval(&canonical_origin(&self.args, &self.secret))
    }

    /// The request's `nonce` value.
    pub fn nonce(&self) -> &str {
        self.args.get(NONCE_TAG).unwrap_or_default()
    }

    /// The request's parsed `timestamp`.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The request's `signature` value.
    pub fn signature(&self) -> &str {
        self.args.get(SIGNATURE_TAG).unwrap_or_default()
    }

    /// All request arguments.
    pub fn args(&self) -> &Args {
        &self.args
    }
}

impl std::fmt::Debug for Accessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessor")
            .field("args", &self.args)
            .field("secret", &"<redacted>")
            .field("timestamp", &self.timestamp)
            .field("eval_signature", &self.eval_signature.name())
            .finish_non_exhaustive()
    }
}
