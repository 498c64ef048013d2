//! # SSH Key Adapter
//!
//! Parsing and classification of OpenSSH keys for the ring signature
//! engine in the `ring` crate.
//!
//! ## Overview
//!
//! This crate turns OpenSSH-formatted keys into algorithm-typed material:
//!
//! - **Public keys** come in as `authorized_keys` lines and are classified
//!   into Edwards points, NIST curve points, or RSA parameters.
//! - **Private keys** come in as unencrypted `BEGIN OPENSSH PRIVATE KEY`
//!   documents and yield the matching signing material.
//! - **Fingerprints** (`"<algo>-SHA256:" + base64` over the SSH wire
//!   encoding) are the sole identity used for equality, deduplication,
//!   and ring membership.
//!
//! U2F-backed keys (`sk-ssh-ed25519@openssh.com`,
//! `sk-ecdsa-sha2-nistp256@openssh.com`) are accepted as verification
//! keys: the inner public key is extracted from the wire encoding and
//! classified like its non-hardware sibling. Their private halves cannot
//! sign and are rejected.
//!
//! ## Supported algorithms
//!
//! | SSH type | Material | Signing |
//! |----------|----------|---------|
//! | `ssh-ed25519` | Edwards point | yes |
//! | `sk-ssh-ed25519@openssh.com` | Edwards point | no |
//! | `ssh-rsa` | modulus + exponent | yes |
//! | `ecdsa-sha2-nistp256/384/521` | curve point | yes |
//! | `sk-ecdsa-sha2-nistp256@openssh.com` | P-256 point | no |
//!
//! ## Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), keys::KeyError> {
//! let ring = keys::parse_authorized_keys(
//!     "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIF... alice\n\
//!      ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAAB... bob\n",
//! )?;
//! let ring = keys::sort_and_dedup(&ring);
//! for pk in &ring {
//!     println!("{pk}");
//! }
//! # Ok(()) }
//! ```

mod errors;
mod material;
mod private;
mod public;

#[cfg(test)]
mod tests;

pub use errors::KeyError;
pub use material::{KeyMaterial, RsaPublic, SecretMaterial};
pub use private::PrivateKey;
pub use public::{parse_authorized_keys, sort_and_dedup, PublicKey};
