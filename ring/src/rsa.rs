//! RSA branch: proof of ability to invert the RSA permutation.
//!
//! Not a proof of knowledge of the factorization; there is no reduction
//! from inverting `x -> x^e mod N` to recovering the order of the group.
//! The branch demonstrates that the prover can invert the permutation at
//! a challenge-derived point, and it is honest-verifier zero-knowledge,
//! which is all the OR-composition needs.

use der::asn1::Uint;
use der::{Decode, Encode, Sequence};
use keys::RsaPublic;
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use crate::challenge::Challenge;
use crate::errors::RingError;
use crate::transcript::Transcript;

const COMMIT_TAG: &[u8] = b"rsa proof";
const CHALLENGE_TAG: &str = "rsa-challenge";

/// Map a ring challenge into `Z/N`.
fn challenge_uint(pk: &RsaPublic, chal: &Challenge) -> Result<BigUint, RingError> {
    chal.uint(CHALLENGE_TAG, &pk.n)
}

/// The RSA permutation `x -> x^e mod N`.
fn permutation(pk: &RsaPublic, preimage: &BigUint) -> BigUint {
    preimage.modpow(&pk.e, &pk.n)
}

/// A uniform element of `Z/N`: twice the modulus width of random bytes,
/// reduced.
fn random_element<R: CryptoRng + RngCore>(rng: &mut R, modulus: &BigUint) -> BigUint {
    let len = (modulus.bits() as usize + 7) / 8;
    let mut bytes = vec![0u8; 2 * len];
    rng.fill_bytes(&mut bytes);
    BigUint::from_bytes_be(&bytes) % modulus
}

/// Branch proof: image offset `A` and preimage `Z` of `(A + c) mod N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RsaProof {
    a: BigUint,
    z: BigUint,
}

#[derive(Sequence)]
struct RsaProofDer {
    a: Uint,
    z: Uint,
}

fn encode_failure(_: der::Error) -> RingError {
    RingError::Internal("der encoding of an rsa branch")
}

impl RsaProof {
    pub fn marshal(&self) -> Result<Vec<u8>, RingError> {
        let der = RsaProofDer {
            a: Uint::new(&self.a.to_bytes_be()).map_err(encode_failure)?,
            z: Uint::new(&self.z.to_bytes_be()).map_err(encode_failure)?,
        };
        der.to_der().map_err(encode_failure)
    }

    pub fn unmarshal(bytes: &[u8]) -> Result<Self, RingError> {
        let der = RsaProofDer::from_der(bytes)
            .map_err(|e| RingError::MalformedSignature(format!("rsa proof: {e}")))?;
        Ok(Self {
            a: BigUint::from_bytes_be(der.a.as_bytes()),
            z: BigUint::from_bytes_be(der.z.as_bytes()),
        })
    }

    pub fn commit(&self, tx: &mut Transcript) {
        tx.append(COMMIT_TAG);
        tx.append(&self.a.to_bytes_be());
    }

    pub fn verify(&self, pk: &RsaPublic, chal: &Challenge) -> Result<(), RingError> {
        // strict encoding: both elements canonical in Z/N
        if self.a >= pk.n || self.z >= pk.n {
            return Err(RingError::MalformedSignature(
                "rsa proof field is not canonical mod N".into(),
            ));
        }
        let c = challenge_uint(pk, chal)?;
        let image = (&self.a + &c) % &pk.n;
        if permutation(pk, &self.z) != image {
            return Err(RingError::VerificationFailed(
                "rsa challenge is not inverted correctly",
            ));
        }
        Ok(())
    }

    /// Sample the preimage, then solve for the image offset:
    /// `A = Z^e - c mod N`.
    pub fn simulate<R: CryptoRng + RngCore>(
        rng: &mut R,
        pk: &RsaPublic,
        chal: &Challenge,
    ) -> Result<Self, RingError> {
        let c = challenge_uint(pk, chal)?;
        let z = random_element(rng, &pk.n);
        let a = (permutation(pk, &z) + &pk.n - &c) % &pk.n;
        let pf = Self { a, z };
        pf.verify(pk, chal)
            .map_err(|_| RingError::Internal("simulated rsa branch failed its own check"))?;
        Ok(pf)
    }
}

/// Prover state for the active branch.
pub(crate) struct RsaProver {
    a: BigUint,
    public: RsaPublic,
    d: BigUint,
}

impl RsaProver {
    /// Sample the commitment `A` uniformly from `Z/N`. With negligible
    /// probability `A + c` falls outside the range of the permutation;
    /// the completion check catches that case.
    pub fn new<R: CryptoRng + RngCore>(rng: &mut R, public: RsaPublic, d: BigUint) -> Self {
        let a = random_element(rng, &public.n);
        Self { a, public, d }
    }

    pub fn commit(&self, tx: &mut Transcript) {
        tx.append(COMMIT_TAG);
        tx.append(&self.a.to_bytes_be());
    }

    /// Close the branch by inverting the permutation at `A + c`.
    pub fn finish(self, chal: &Challenge) -> Result<RsaProof, RingError> {
        let RsaProver { a, public, d } = self;
        let c = challenge_uint(&public, chal)?;
        let image = (&a + &c) % &public.n;
        let z = image.modpow(&d, &public.n);
        let pf = RsaProof { a, z };
        pf.verify(&public, chal)
            .map_err(|_| RingError::Internal("completed rsa branch failed its own check"))?;
        Ok(pf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // 1000003 * 1000033; small enough to exercise the algebra quickly.
    fn toy_key() -> (RsaPublic, BigUint) {
        let public = RsaPublic {
            n: BigUint::from(1000036000099u64),
            e: BigUint::from(65537u32),
        };
        (public, BigUint::from(149902609889u64))
    }

    #[test]
    fn test_prover_round_trip() {
        let mut rng = StdRng::seed_from_u64(42);
        let (public, d) = toy_key();
        let chal = Challenge::random(&mut rng);

        let prover = RsaProver::new(&mut rng, public.clone(), d);
        let pf = prover.finish(&chal).expect("finish");
        assert!(pf.verify(&public, &chal).is_ok());
    }

    #[test]
    fn test_simulator_satisfies_verifier() {
        let mut rng = StdRng::seed_from_u64(42);
        let (public, _) = toy_key();
        let chal = Challenge::random(&mut rng);

        let pf = RsaProof::simulate(&mut rng, &public, &chal).expect("simulate");
        assert!(pf.verify(&public, &chal).is_ok());
    }

    #[test]
    fn test_wrong_challenge_fails() {
        let mut rng = StdRng::seed_from_u64(42);
        let (public, _) = toy_key();
        let chal = Challenge::random(&mut rng);
        let pf = RsaProof::simulate(&mut rng, &public, &chal).expect("simulate");

        let other = Challenge::random(&mut rng);
        assert!(pf.verify(&public, &other).is_err());
    }

    #[test]
    fn test_non_canonical_elements_are_rejected() {
        let mut rng = StdRng::seed_from_u64(42);
        let (public, _) = toy_key();
        let chal = Challenge::random(&mut rng);
        let pf = RsaProof::simulate(&mut rng, &public, &chal).expect("simulate");

        // N itself is already out of range; strictly-less is required.
        let oversized = RsaProof {
            a: public.n.clone(),
            z: pf.z.clone(),
        };
        assert!(matches!(
            oversized.verify(&public, &chal),
            Err(RingError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_marshal_round_trip_rejects_junk() {
        let mut rng = StdRng::seed_from_u64(42);
        let (public, _) = toy_key();
        let chal = Challenge::random(&mut rng);
        let pf = RsaProof::simulate(&mut rng, &public, &chal).expect("simulate");

        let bytes = pf.marshal().expect("marshal");
        assert_eq!(RsaProof::unmarshal(&bytes).expect("unmarshal"), pf);

        let mut trailing = bytes.clone();
        trailing.push(0x00);
        assert!(RsaProof::unmarshal(&trailing).is_err());
    }
}
