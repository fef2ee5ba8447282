// Core architecture components
mod args;
mod config;
mod error;
mod options;
mod request_accessor;
mod signer;
mod time_utils;

// Pluggable checks
pub mod nonce;
pub mod signature;
pub mod timestamp;

// Core components exports
pub use args::{Arg, Args};
pub use config::{AccessorConfig, ConfigPreset, DEFAULT_TIME_WINDOW_SECS, TIME_WINDOW_ENV};
pub use error::AccessorError;
pub use options::AccessorOptions;
pub use request_accessor::Accessor;
pub use signer::{NonceGeneratorFn, RequestSigner, SignerTimeProviderFn};

// Check exports
pub use nonce::{NonceChecker, PermissiveNonceChecker};
#[cfg(feature = "algo-sha256")]
pub use signature::Sha256Signature;
pub use signature::{
    DefaultEvalSignature, EvalSignature, Md5Signature, NONCE_TAG, SIGNATURE_TAG, TIMESTAMP_TAG,
    canonical_origin,
};
pub use timestamp::{TimeProviderFn, TimestampChecker, WindowTimestampChecker};
