//! Fixed-width challenges and the XOR group that closes the ring equation.

use core::ops::BitXorAssign;

use hkdf::Hkdf;
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha512;

use crate::errors::RingError;

/// Byte width of every challenge in the protocol.
pub const CHALLENGE_SIZE: usize = 32;

const EXPAND_INFO: &[u8] = b"challenge-hkdf";

/// A 32-byte challenge string.
///
/// Challenges form an abelian group of exponent two under bytewise XOR,
/// with the all-zero string as identity. The ring protocol picks the
/// inactive branches' challenges freely and closes the group so that the
/// sum of all member challenges equals the transcript challenge.
///
/// Branches do not consume the 32 bytes directly; they derive
/// algorithm-appropriate challenge material through [`Challenge::take`]
/// and [`Challenge::uint`], which expand the challenge with HKDF-SHA-512
/// under a per-branch tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge([u8; CHALLENGE_SIZE]);

impl Challenge {
    /// The identity element.
    pub fn zero() -> Self {
        Self([0u8; CHALLENGE_SIZE])
    }

    /// Sample a uniformly random challenge.
    pub fn random<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        let mut bytes = [0u8; CHALLENGE_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// The raw challenge bytes.
    pub fn as_bytes(&self) -> &[u8; CHALLENGE_SIZE] {
        &self.0
    }

    /// True for the identity element.
    ///
    /// Not constant-time; only ever evaluated on public values during
    /// verification.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Derive `n` bytes from this challenge, domain-separated by `tag`.
    pub fn take(&self, tag: &str, n: usize) -> Result<Vec<u8>, RingError> {
        let hk = Hkdf::<Sha512>::new(Some(tag.as_bytes()), &self.0);
        let mut out = vec![0u8; n];
        hk.expand(EXPAND_INFO, &mut out)
            .map_err(|_| RingError::Internal("challenge expansion exceeds the HKDF output bound"))?;
        Ok(out)
    }

    /// Derive an integer in `[0, modulus)`, domain-separated by `tag`.
    ///
    /// Twice as many bytes as the modulus occupies are drawn before
    /// reducing, which makes the bias of the reduction negligible.
    pub fn uint(&self, tag: &str, modulus: &BigUint) -> Result<BigUint, RingError> {
        if modulus.bits() == 0 {
            return Err(RingError::Internal("challenge reduction modulus is zero"));
        }
        let len = (modulus.bits() as usize + 7) / 8;
        let wide = self.take(tag, 2 * len)?;
        Ok(BigUint::from_bytes_be(&wide) % modulus)
    }
}

impl From<[u8; CHALLENGE_SIZE]> for Challenge {
    fn from(bytes: [u8; CHALLENGE_SIZE]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Challenge {
    type Error = RingError;

    fn try_from(bytes: &[u8]) -> Result<Self, RingError> {
        let bytes: [u8; CHALLENGE_SIZE] = bytes
            .try_into()
            .map_err(|_| RingError::MalformedSignature("challenge must be 32 bytes".into()))?;
        Ok(Self(bytes))
    }
}

impl BitXorAssign<&Challenge> for Challenge {
    fn bitxor_assign(&mut self, rhs: &Challenge) {
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a ^= b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_xor_group_laws() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = Challenge::random(&mut rng);
        let b = Challenge::random(&mut rng);

        // self-inverse
        let mut twice = a;
        twice ^= &a;
        assert!(twice.is_zero());

        // commutative
        let mut ab = a;
        ab ^= &b;
        let mut ba = b;
        ba ^= &a;
        assert_eq!(ab, ba);

        // identity
        let mut with_zero = a;
        with_zero ^= &Challenge::zero();
        assert_eq!(with_zero, a);
    }

    #[test]
    fn test_take_is_deterministic_and_tagged() {
        let mut rng = StdRng::seed_from_u64(7);
        let chal = Challenge::random(&mut rng);

        let first = chal.take("tag-a", 48).unwrap();
        let second = chal.take("tag-a", 48).unwrap();
        assert_eq!(first, second);

        let other = chal.take("tag-b", 48).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_uint_is_below_modulus() {
        let mut rng = StdRng::seed_from_u64(11);
        let modulus = BigUint::from(1000036000099u64);
        for _ in 0..32 {
            let chal = Challenge::random(&mut rng);
            assert!(chal.uint("m", &modulus).unwrap() < modulus);
        }
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert!(Challenge::try_from(&[0u8; 31][..]).is_err());
        assert!(Challenge::try_from(&[0u8; 33][..]).is_err());
        assert!(Challenge::try_from(&[0u8; 32][..]).is_ok());
    }
}
