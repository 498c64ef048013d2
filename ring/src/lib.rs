//! # Heterogeneous SSH Ring Signatures
//!
//! Anonymous signatures over a set of SSH public keys: a signer holding
//! any one of the listed private keys proves that *some* ring member
//! authored the message, without revealing which one.
//!
//! ## Overview
//!
//! Rings may freely mix key algorithms:
//!
//! - **Ed25519** (`ssh-ed25519`, plus U2F-backed `sk-` keys for
//!   verification)
//! - **RSA** (`ssh-rsa`, 1024–16384 bit moduli)
//! - **ECDSA** over NIST P-256/P-384/P-521 (plus U2F-backed
//!   `sk-ecdsa-sha2-nistp256` for verification)
//!
//! Each algorithm contributes a sigma-protocol branch (a Schnorr proof on
//! the respective curve, or a permutation-inversion proof for RSA). The
//! branches are OR-composed under Fiat-Shamir: the signer simulates every
//! branch but their own against freely chosen challenges, a SHA-512
//! transcript over the statement and all first-round commitments fixes
//! the challenge sum, and the signer's branch absorbs the difference.
//!
//! ## Protocol sketch
//!
//! Signing a message `m` under ring `pks` with the key at index `j`:
//!
//! 1. Pick random 32-byte challenges `c_i` for every `i != j`.
//! 2. Absorb each `pks[i]`'s SSH wire encoding and then `m` into the
//!    transcript.
//! 3. Simulate branch `i` for `(pks[i], c_i)`, `i != j`; run the real
//!    first round for `j`.
//! 4. Commit every branch to the transcript, squeeze the target
//!    challenge `t`, and set `c_j = t ⊕ c_1 ⊕ ... ⊕ c_n` (sans `c_j`).
//! 5. Complete the real branch for `c_j` and emit all fingerprints,
//!    challenges, and proofs as one DER blob.
//!
//! The verifier redoes the transcript, checks every branch against its
//! challenge, and accepts iff the challenges XOR to the transcript
//! challenge.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rand::rngs::OsRng;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let members = keys::parse_authorized_keys(
//!     "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIF0... alice\n\
//!      ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAAB... bob\n",
//! )?;
//! let pem = std::fs::read_to_string("/home/alice/.ssh/id_ed25519")?;
//! let signer = keys::PrivateKey::from_openssh(&pem)?;
//!
//! let signature = ring::sign(&mut OsRng, &signer, &members, b"release v1.2 is ours")?;
//! let blob = signature.to_der()?;
//!
//! let parsed = ring::Signature::from_der(&blob)?;
//! let msg = parsed.verify(&members)?;
//! assert_eq!(msg, b"release v1.2 is ours");
//! # Ok(()) }
//! ```
//!
//! ## Security properties
//!
//! - **Unforgeability** under the discrete-log assumption on the curve
//!   branches and the RSA assumption on the RSA branch, in the random
//!   oracle model.
//! - **Anonymity**: every branch but the signer's is produced by its
//!   honest-verifier zero-knowledge simulator, and which branch is
//!   "real" is not recoverable from the blob. This is a plain ring
//!   signature: nothing links two blobs by the same signer, and nothing
//!   lets a signer prove authorship after the fact.
//! - **Ring binding**: the statement (all wire keys, in ring order) and
//!   the message are absorbed into the transcript, so adding, removing,
//!   reordering, or swapping members invalidates the blob.
//!
//! Verification is not constant-time; signing uses constant-time scalar
//! arithmetic for curve secrets.
//!
//! ## Caveats
//!
//! - U2F-backed (`sk-`) keys can appear in rings and verify fine, but
//!   cannot sign: their private halves live in an authenticator.
//! - Signatures are randomized; signing the same message twice yields
//!   different blobs.
//! - This crate has not been audited. Treat it as research code.

mod challenge;
mod ecdsa;
mod ed25519;
mod errors;
mod rsa;
mod sigma;
mod sign;
mod signature;
mod transcript;
mod verify;

#[cfg(test)]
mod tests;

pub use challenge::{Challenge, CHALLENGE_SIZE};
pub use errors::RingError;
pub use sign::sign;
pub use signature::Signature;
pub use transcript::Transcript;
