//! Branch dispatch across the supported key algorithms.
//!
//! The dispatch is a closed pair of enums rather than a trait object:
//! every branch pairs a wire shape with a commit tag, so adding one is a
//! protocol change, not a plug-in point.

use keys::{KeyMaterial, PrivateKey, PublicKey, RsaPublic, SecretMaterial};
use p256::NistP256;
use p384::NistP384;
use p521::NistP521;
use rand::{CryptoRng, RngCore};

use crate::challenge::Challenge;
use crate::ecdsa::{self, EcdsaProof, EcdsaProver};
use crate::ed25519::{Ed25519Proof, Ed25519Prover};
use crate::errors::RingError;
use crate::rsa::{RsaProof, RsaProver};
use crate::transcript::Transcript;

/// One branch of a ring signature.
pub(crate) enum BranchProof {
    Ed25519(Ed25519Proof),
    Ecdsa(EcdsaProof),
    Rsa(RsaProof),
}

impl BranchProof {
    /// Decode a branch in the wire shape dictated by the key's algorithm.
    pub fn unmarshal(material: &KeyMaterial, bytes: &[u8]) -> Result<Self, RingError> {
        match material {
            KeyMaterial::Ed25519(_) => Ed25519Proof::unmarshal(bytes).map(Self::Ed25519),
            KeyMaterial::Rsa(_) => RsaProof::unmarshal(bytes).map(Self::Rsa),
            KeyMaterial::EcdsaP256(_) | KeyMaterial::EcdsaP384(_) | KeyMaterial::EcdsaP521(_) => {
                EcdsaProof::unmarshal(bytes).map(Self::Ecdsa)
            }
        }
    }

    pub fn marshal(&self) -> Result<Vec<u8>, RingError> {
        match self {
            Self::Ed25519(pf) => Ok(pf.marshal()),
            Self::Ecdsa(pf) => pf.marshal(),
            Self::Rsa(pf) => pf.marshal(),
        }
    }

    pub fn commit(&self, tx: &mut Transcript) {
        match self {
            Self::Ed25519(pf) => pf.commit(tx),
            Self::Ecdsa(pf) => pf.commit(tx),
            Self::Rsa(pf) => pf.commit(tx),
        }
    }

    pub fn verify(&self, pk: &PublicKey, chal: &Challenge) -> Result<(), RingError> {
        match (self, pk.material()) {
            (Self::Ed25519(pf), KeyMaterial::Ed25519(point)) => pf.verify(point, chal),
            (Self::Rsa(pf), KeyMaterial::Rsa(public)) => pf.verify(public, chal),
            (Self::Ecdsa(pf), KeyMaterial::EcdsaP256(public)) => {
                ecdsa::verify::<NistP256>(public, pf, chal)
            }
            (Self::Ecdsa(pf), KeyMaterial::EcdsaP384(public)) => {
                ecdsa::verify::<NistP384>(public, pf, chal)
            }
            (Self::Ecdsa(pf), KeyMaterial::EcdsaP521(public)) => {
                ecdsa::verify::<NistP521>(public, pf, chal)
            }
            _ => Err(RingError::Internal(
                "branch proof does not match the key material",
            )),
        }
    }

    /// Run the branch simulator for a chosen challenge.
    pub fn simulate<R: CryptoRng + RngCore>(
        rng: &mut R,
        pk: &PublicKey,
        chal: &Challenge,
    ) -> Result<Self, RingError> {
        match pk.material() {
            KeyMaterial::Ed25519(point) => {
                Ed25519Proof::simulate(rng, point, chal).map(Self::Ed25519)
            }
            KeyMaterial::Rsa(public) => RsaProof::simulate(rng, public, chal).map(Self::Rsa),
            KeyMaterial::EcdsaP256(public) => {
                ecdsa::simulate::<NistP256, _>(rng, public, chal).map(Self::Ecdsa)
            }
            KeyMaterial::EcdsaP384(public) => {
                ecdsa::simulate::<NistP384, _>(rng, public, chal).map(Self::Ecdsa)
            }
            KeyMaterial::EcdsaP521(public) => {
                ecdsa::simulate::<NistP521, _>(rng, public, chal).map(Self::Ecdsa)
            }
        }
    }
}

/// Prover state for the active branch, commitment already fixed.
pub(crate) enum BranchProver {
    Ed25519(Ed25519Prover),
    EcdsaP256(EcdsaProver<NistP256>),
    EcdsaP384(EcdsaProver<NistP384>),
    EcdsaP521(EcdsaProver<NistP521>),
    Rsa(RsaProver),
}

impl BranchProver {
    pub fn new<R: CryptoRng + RngCore>(rng: &mut R, signer: &PrivateKey) -> Result<Self, RingError> {
        match signer.material() {
            SecretMaterial::Ed25519 { scalar } => {
                let public = match signer.public().material() {
                    KeyMaterial::Ed25519(point) => *point,
                    _ => {
                        return Err(RingError::Internal(
                            "ed25519 secret paired with foreign public material",
                        ))
                    }
                };
                Ok(Self::Ed25519(Ed25519Prover::new(rng, *scalar, public)))
            }
            SecretMaterial::Rsa { n, e, d } => Ok(Self::Rsa(RsaProver::new(
                rng,
                RsaPublic {
                    n: n.clone(),
                    e: e.clone(),
                },
                d.clone(),
            ))),
            SecretMaterial::EcdsaP256(secret) => {
                EcdsaProver::new(rng, secret).map(Self::EcdsaP256)
            }
            SecretMaterial::EcdsaP384(secret) => {
                EcdsaProver::new(rng, secret).map(Self::EcdsaP384)
            }
            SecretMaterial::EcdsaP521(secret) => {
                EcdsaProver::new(rng, secret).map(Self::EcdsaP521)
            }
        }
    }

    pub fn commit(&self, tx: &mut Transcript) {
        match self {
            Self::Ed25519(prover) => prover.commit(tx),
            Self::EcdsaP256(prover) => prover.commit(tx),
            Self::EcdsaP384(prover) => prover.commit(tx),
            Self::EcdsaP521(prover) => prover.commit(tx),
            Self::Rsa(prover) => prover.commit(tx),
        }
    }

    pub fn finish(self, chal: &Challenge) -> Result<BranchProof, RingError> {
        match self {
            Self::Ed25519(prover) => prover.finish(chal).map(BranchProof::Ed25519),
            Self::EcdsaP256(prover) => prover.finish(chal).map(BranchProof::Ecdsa),
            Self::EcdsaP384(prover) => prover.finish(chal).map(BranchProof::Ecdsa),
            Self::EcdsaP521(prover) => prover.finish(chal).map(BranchProof::Ecdsa),
            Self::Rsa(prover) => prover.finish(chal).map(BranchProof::Rsa),
        }
    }
}
