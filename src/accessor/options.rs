use crate::accessor::config::AccessorConfig;
use crate::accessor::nonce::NonceChecker;
use crate::accessor::signature::EvalSignature;
use crate::accessor::timestamp::TimestampChecker;
use std::sync::Arc;
use std::time::Duration;

/// Optional overrides applied when constructing an [`Accessor`](crate::Accessor).
///
/// Every hook left unset falls back to the built-in policy:
///
/// - signature: [`Md5Signature`](crate::signature::Md5Signature)
/// - timestamp: [`WindowTimestampChecker`](crate::timestamp::WindowTimestampChecker) over `config.time_window`
/// - nonce: [`PermissiveNonceChecker`](crate::nonce::PermissiveNonceChecker), which disables replay protection
///
/// # Example
///
/// ```rust
/// use api_accessor::{AccessorError, AccessorOptions};
/// use std::time::Duration;
///
/// let options = AccessorOptions::default()
///     .with_time_window(Duration::from_secs(120))
///     .with_nonce_checker(|nonce: &str| {
///         if nonce.is_empty() {
///             Err(AccessorError::NonceAlreadyUsed)
///         } else {
///             Ok(())
///         }
///     });
/// ```
#[derive(Clone, Default)]
pub struct AccessorOptions {
    /// Parameters of the built-in policies.
    pub config: AccessorConfig,
    pub(crate) eval_signature: Option<Arc<dyn EvalSignature>>,
    pub(crate) timestamp_checker: Option<Arc<dyn TimestampChecker>>,
    pub(crate) nonce_checker: Option<Arc<dyn NonceChecker>>,
}

impl AccessorOptions {
    /// Creates options with every hook at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: AccessorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the window used by the default timestamp checker.
    pub fn with_time_window(mut self, time_window: Duration) -> Self {
        self.config.time_window = time_window;
        self
    }

    /// Overrides the digest function.
    pub fn with_eval_signature<E>(mut self, eval: E) -> Self
    where
        E: EvalSignature + 'static,
    {
        self.eval_signature = Some(Arc::new(eval));
        self
    }

    /// Overrides the timestamp policy. The configured time window is then ignored.
    pub fn with_timestamp_checker<T>(mut self, checker: T) -> Self
    where
        T: TimestampChecker + 'static,
    {
        self.timestamp_checker = Some(Arc::new(checker));
        self
    }

    /// Sets the replay-detection backend.
    pub fn with_nonce_checker<N>(mut self, checker: N) -> Self
    where
        N: NonceChecker + 'static,
    {
        self.nonce_checker = Some(Arc::new(checker));
        self
    }

    /// Uses an already shared nonce backend, so one store can serve many
    /// accessors.
    pub fn with_shared_nonce_checker(mut self, checker: Arc<dyn NonceChecker>) -> Self {
        self.nonce_checker = Some(checker);
        self
    }
}

impl std::fmt::Debug for AccessorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessorOptions")
            .field("config", &self.config)
            .field(
                "eval_signature",
                &self.eval_signature.as_ref().map(|e| e.name()),
            )
            .field("custom_timestamp_checker", &self.timestamp_checker.is_some())
            .field("nonce_checker", &self.nonce_checker.is_some())
            .finish()
    }
}
