//! Replay detection contract.
//!
//! This crate does not store nonces. Callers inject a [`NonceChecker`]
//! backed by whatever store they run (an in-process cache, a database, a
//! shared Redis). The checker owns the atomicity of "check and record": if
//! two requests race on the same nonce, only the backend can guarantee that
//! at most one of them is accepted.
//!
//! # Replay protection is opt-in
//!
//! When no checker is configured the accessor falls back to
//! [`PermissiveNonceChecker`], which accepts every nonce. Forgetting to
//! inject a real checker silently disables replay protection.

use crate::accessor::error::AccessorError;

/// Consumes a nonce, rejecting it if it was consumed before.
///
/// Contract:
///
/// - `Ok(())`: the nonce was fresh and is now recorded as consumed.
/// - `Err(AccessorError::NonceAlreadyUsed)`: the nonce was consumed earlier.
/// - `Err(AccessorError::NonceBackendError(_))`: the store could not answer.
///
/// Any `Fn(&str) -> Result<(), AccessorError> + Send + Sync` closure
/// qualifies.
///
/// # Example
///
/// ```rust
/// use api_accessor::{AccessorError, nonce::NonceChecker};
/// use std::collections::HashSet;
/// use std::sync::Mutex;
///
/// struct InProcessNonces(Mutex<HashSet<String>>);
///
/// impl NonceChecker for InProcessNonces {
///     fn check(&self, nonce: &str) -> Result<(), AccessorError> {
///         let mut seen = self
///             .0
///             .lock()
///             .map_err(|e| AccessorError::NonceBackendError(e.to_string()))?;
///         if seen.insert(nonce.to_string()) {
///             Ok(())
///         } else {
///             Err(AccessorError::NonceAlreadyUsed)
///         }
///     }
/// }
///
/// let nonces = InProcessNonces(Mutex::new(HashSet::new()));
/// assert!(nonces.check("n-1").is_ok());
/// assert!(matches!(nonces.check("n-1"), Err(AccessorError::NonceAlreadyUsed)));
/// ```
pub trait NonceChecker: Send + Sync {
    /// Checks and records `nonce`.
    fn check(&self, nonce: &str) -> Result<(), AccessorError>;
}

impl<F> NonceChecker for F
where
    F: Fn(&str) -> Result<(), AccessorError> + Send + Sync,
{
    fn check(&self, nonce: &str) -> Result<(), AccessorError> {
        self(nonce)
    }
}

/// Accepts every nonce without recording anything.
///
/// Used when no checker is configured. See the module documentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveNonceChecker;

impl NonceChecker for PermissiveNonceChecker {
    fn check(&self, _nonce: &str) -> Result<(), AccessorError> {
        tracing::debug!("no nonce checker configured, replay protection disabled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[test]
    fn test_permissive_accepts_repeats() {
        let checker = PermissiveNonceChecker;

        for _ in 0..3 {
            assert!(checker.check("same").is_ok());
        }
    }

    #[test]
    fn test_closure_checker() {
        let seen = Mutex::new(HashSet::new());
        let checker = move |nonce: &str| {
            let mut seen = seen.lock().unwrap();
            if seen.insert(nonce.to_string()) {
                Ok(())
            } else {
                Err(AccessorError::NonceAlreadyUsed)
            }
        };

        assert!(checker.check("a").is_ok());
        assert!(matches!(
            checker.check("a"),
            Err(AccessorError::NonceAlreadyUsed)
        ));
        assert!(checker.check("b").is_ok());
    }

    #[test]
    fn test_backend_error_passes_through() {
        let checker =
            |_: &str| Err::<(), _>(AccessorError::NonceBackendError("store offline".to_string()));

        match checker.check("a") {
            Err(AccessorError::NonceBackendError(msg)) => assert_eq!(msg, "store offline"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
