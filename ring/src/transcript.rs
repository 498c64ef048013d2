//! Streaming Fiat-Shamir transcript.

use hkdf::Hkdf;
use sha2::{Digest, Sha512};

use crate::challenge::{Challenge, CHALLENGE_SIZE};

const EXPAND_INFO: &[u8] = b"transcript-hkdf";

/// A running SHA-512 hash of length-prefixed records.
///
/// Every record is absorbed as `u64_le(len(record)) ‖ record`, so no two
/// distinct record sequences collide by concatenation. Transcripts are
/// append-only; the ring protocol squeezes a challenge exactly once per
/// signing or verification pass.
#[derive(Clone)]
pub struct Transcript {
    state: Sha512,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            state: Sha512::new(),
        }
    }

    /// Absorb one record.
    pub fn append(&mut self, record: &[u8]) {
        self.state.update((record.len() as u64).to_le_bytes());
        self.state.update(record);
    }

    /// Squeeze a challenge out of the current state.
    ///
    /// The state itself is left untouched, so the transcript can keep
    /// absorbing records afterwards.
    pub fn challenge(&self) -> Challenge {
        let digest = self.state.clone().finalize();
        let hk = Hkdf::<Sha512>::new(None, &digest);
        let mut out = [0u8; CHALLENGE_SIZE];
        hk.expand(EXPAND_INFO, &mut out)
            .expect("32 bytes is a valid HKDF-SHA-512 output length");
        Challenge::from(out)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_prefix_separates_records() {
        let mut left = Transcript::new();
        left.append(b"ab");
        left.append(b"c");

        let mut right = Transcript::new();
        right.append(b"a");
        right.append(b"bc");

        assert_ne!(left.challenge(), right.challenge());
    }

    #[test]
    fn test_challenge_is_stable_until_append() {
        let mut tx = Transcript::new();
        tx.append(b"statement");

        let first = tx.challenge();
        let second = tx.challenge();
        assert_eq!(first, second);

        tx.append(b"more");
        assert_ne!(first, tx.challenge());
    }

    #[test]
    fn test_empty_record_still_counts() {
        let mut with_empty = Transcript::new();
        with_empty.append(b"");

        assert_ne!(with_empty.challenge(), Transcript::new().challenge());
    }
}
