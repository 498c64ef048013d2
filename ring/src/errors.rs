//! Error types for ring signing and verification.

use keys::KeyError;
use thiserror::Error;

/// Errors that can occur while producing or checking a ring signature.
#[derive(Debug, Error)]
pub enum RingError {
    /// A key failed to parse or has an unsupported algorithm.
    #[error("malformed key: {0}")]
    MalformedKey(#[from] KeyError),

    /// The signature blob failed structural validation: bad DER,
    /// trailing bytes, wrong version, inconsistent array lengths,
    /// non-canonical integers, or off-curve points.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// A fingerprint in the signature has no matching candidate key, or
    /// the signing key is not a ring member.
    #[error("ring mismatch: {0}")]
    RingMismatch(&'static str),

    /// A branch equation failed, or the challenges do not sum to the
    /// transcript challenge.
    #[error("verification failed: {0}")]
    VerificationFailed(&'static str),

    /// An invariant the caller cannot cause was violated. Fatal.
    #[error("internal error: {0}")]
    Internal(&'static str),
}
