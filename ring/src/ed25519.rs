//! Schnorr branch on edwards25519.
//!
//! Proves knowledge of `s` with `s * B = X`, where `X` is the SSH
//! Ed25519 public point and `s` is the clamped SHA-512 seed scalar.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};

use crate::challenge::Challenge;
use crate::errors::RingError;
use crate::transcript::Transcript;

const PROOF_SIZE: usize = 64;
const COMMIT_TAG: &[u8] = b"ed25519 proof";
const CHALLENGE_TAG: &str = "schorr-edwards25519-challenge";

/// Map a ring challenge to a curve scalar by uniform-wide reduction.
fn challenge_scalar(chal: &Challenge) -> Result<Scalar, RingError> {
    let bytes = chal.take(CHALLENGE_TAG, 64)?;
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&bytes);
    Ok(Scalar::from_bytes_mod_order_wide(&wide))
}

/// `z * B - c * pk`, the commitment every valid branch must carry.
fn commitment(pk: &EdwardsPoint, c: &Scalar, z: &Scalar) -> EdwardsPoint {
    EdwardsPoint::vartime_double_scalar_mul_basepoint(&(-c), pk, z)
}

/// Branch proof: commitment point `A` and response scalar `Z`.
///
/// Wire form is the 32-byte compressed point followed by the 32-byte
/// canonical scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Ed25519Proof {
    a: EdwardsPoint,
    z: Scalar,
}

impl Ed25519Proof {
    pub fn marshal(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PROOF_SIZE);
        out.extend_from_slice(self.a.compress().as_bytes());
        out.extend_from_slice(self.z.as_bytes());
        out
    }

    pub fn unmarshal(bytes: &[u8]) -> Result<Self, RingError> {
        if bytes.len() != PROOF_SIZE {
            return Err(RingError::MalformedSignature(
                "ed25519 proof must be 64 bytes".into(),
            ));
        }
        let a = CompressedEdwardsY::from_slice(&bytes[..32])
            .ok()
            .and_then(|compressed| compressed.decompress())
            .ok_or_else(|| {
                RingError::MalformedSignature("ed25519 commitment is not a curve point".into())
            })?;
        let mut z_bytes = [0u8; 32];
        z_bytes.copy_from_slice(&bytes[32..]);
        let z = Option::<Scalar>::from(Scalar::from_canonical_bytes(z_bytes)).ok_or_else(|| {
            RingError::MalformedSignature("ed25519 response is not a canonical scalar".into())
        })?;
        Ok(Self { a, z })
    }

    pub fn commit(&self, tx: &mut Transcript) {
        tx.append(COMMIT_TAG);
        tx.append(self.a.compress().as_bytes());
    }

    pub fn verify(&self, pk: &EdwardsPoint, chal: &Challenge) -> Result<(), RingError> {
        let c = challenge_scalar(chal)?;
        if commitment(pk, &c, &self.z) != self.a {
            return Err(RingError::VerificationFailed(
                "ed25519 commitment does not match",
            ));
        }
        Ok(())
    }

    /// Produce a valid-looking branch for a chosen challenge: sample the
    /// response first, then solve for the commitment.
    pub fn simulate<R: CryptoRng + RngCore>(
        rng: &mut R,
        pk: &EdwardsPoint,
        chal: &Challenge,
    ) -> Result<Self, RingError> {
        let z = Scalar::random(rng);
        let c = challenge_scalar(chal)?;
        let pf = Self {
            a: commitment(pk, &c, &z),
            z,
        };
        pf.verify(pk, chal)
            .map_err(|_| RingError::Internal("simulated ed25519 branch failed its own check"))?;
        Ok(pf)
    }
}

/// Prover state for the active branch: commitment made, response pending.
pub(crate) struct Ed25519Prover {
    r: Scalar,
    a: EdwardsPoint,
    secret: Scalar,
    public: EdwardsPoint,
}

impl Ed25519Prover {
    pub fn new<R: CryptoRng + RngCore>(rng: &mut R, secret: Scalar, public: EdwardsPoint) -> Self {
        let r = Scalar::random(rng);
        Self {
            r,
            a: EdwardsPoint::mul_base(&r),
            secret,
            public,
        }
    }

    pub fn commit(&self, tx: &mut Transcript) {
        tx.append(COMMIT_TAG);
        tx.append(self.a.compress().as_bytes());
    }

    /// Close the branch with `z = c * secret + r`. Consumes the prover so
    /// the blinding scalar cannot be reused.
    pub fn finish(self, chal: &Challenge) -> Result<Ed25519Proof, RingError> {
        let c = challenge_scalar(chal)?;
        let pf = Ed25519Proof {
            a: self.a,
            z: c * self.secret + self.r,
        };
        pf.verify(&self.public, chal)
            .map_err(|_| RingError::Internal("completed ed25519 branch failed its own check"))?;
        Ok(pf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_key(rng: &mut StdRng) -> (Scalar, EdwardsPoint) {
        let secret = Scalar::random(rng);
        (secret, EdwardsPoint::mul_base(&secret))
    }

    #[test]
    fn test_prover_round_trip() {
        let mut rng = StdRng::seed_from_u64(42);
        let (secret, public) = test_key(&mut rng);
        let chal = Challenge::random(&mut rng);

        let prover = Ed25519Prover::new(&mut rng, secret, public);
        let pf = prover.finish(&chal).expect("finish");
        assert!(pf.verify(&public, &chal).is_ok());
    }

    #[test]
    fn test_simulator_satisfies_verifier() {
        let mut rng = StdRng::seed_from_u64(42);
        let (_, public) = test_key(&mut rng);
        let chal = Challenge::random(&mut rng);

        let pf = Ed25519Proof::simulate(&mut rng, &public, &chal).expect("simulate");
        assert!(pf.verify(&public, &chal).is_ok());
    }

    #[test]
    fn test_wrong_challenge_fails() {
        let mut rng = StdRng::seed_from_u64(42);
        let (_, public) = test_key(&mut rng);
        let chal = Challenge::random(&mut rng);
        let pf = Ed25519Proof::simulate(&mut rng, &public, &chal).expect("simulate");

        let other = Challenge::random(&mut rng);
        assert!(pf.verify(&public, &other).is_err());
    }

    #[test]
    fn test_marshal_round_trip_and_length_check() {
        let mut rng = StdRng::seed_from_u64(42);
        let (_, public) = test_key(&mut rng);
        let chal = Challenge::random(&mut rng);
        let pf = Ed25519Proof::simulate(&mut rng, &public, &chal).expect("simulate");

        let bytes = pf.marshal();
        assert_eq!(bytes.len(), 64);
        assert_eq!(Ed25519Proof::unmarshal(&bytes).expect("unmarshal"), pf);

        assert!(Ed25519Proof::unmarshal(&bytes[..63]).is_err());
        let mut long = bytes.clone();
        long.push(0);
        assert!(Ed25519Proof::unmarshal(&long).is_err());
    }
}
