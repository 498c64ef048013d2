//! Error types for key parsing and classification.

use thiserror::Error;

/// Errors produced while parsing or classifying SSH keys.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The OpenSSH encoding could not be parsed.
    #[error("ssh parse error: {0}")]
    Parse(#[from] ssh_key::Error),

    /// The key parsed but its algorithm has no branch in the protocol.
    #[error("unsupported key algorithm: {0}")]
    Unsupported(String),

    /// The key parsed but its cryptographic material is unusable, for
    /// example an off-curve point or an out-of-range scalar.
    #[error("invalid key material: {0}")]
    Invalid(&'static str),

    /// The private key is passphrase-protected. Decryption is the
    /// caller's responsibility.
    #[error("private key is encrypted")]
    Encrypted,

    /// U2F-backed keys carry a credential handle instead of a usable
    /// secret and can only verify.
    #[error("hardware-backed key cannot sign: {0}")]
    HardwareBacked(String),
}
