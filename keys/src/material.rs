//! Algorithm-typed key material extracted from SSH wire encodings.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::{clamp_integer, Scalar};
use num_bigint::BigUint;
use sha2::{Digest, Sha512};
use ssh_key::private::{EcdsaKeypair, KeypairData};
use ssh_key::public::{EcdsaPublicKey, KeyData};
use ssh_key::{Algorithm, Mpint};

use crate::errors::KeyError;

/// Smallest RSA modulus accepted, in bits.
const RSA_MIN_BITS: u64 = 1024;

/// Largest RSA modulus accepted, in bits. Keeps the modulus-sized
/// challenge derivation inside the HKDF-SHA-512 output bound.
const RSA_MAX_BITS: u64 = 16384;

/// RSA public parameters.
#[derive(Clone, Debug)]
pub struct RsaPublic {
    /// Modulus `N`.
    pub n: BigUint,
    /// Public exponent `e`.
    pub e: BigUint,
}

/// Verification material, classified by branch algorithm.
///
/// The enum is closed on purpose: adding an algorithm means adding a
/// branch to the protocol, which is a code change everywhere.
#[derive(Clone, Debug)]
pub enum KeyMaterial {
    /// `ssh-ed25519` or `sk-ssh-ed25519@openssh.com`.
    Ed25519(EdwardsPoint),
    /// `ssh-rsa`.
    Rsa(RsaPublic),
    /// `ecdsa-sha2-nistp256` or `sk-ecdsa-sha2-nistp256@openssh.com`.
    EcdsaP256(p256::PublicKey),
    /// `ecdsa-sha2-nistp384`.
    EcdsaP384(p384::PublicKey),
    /// `ecdsa-sha2-nistp521`.
    EcdsaP521(p521::PublicKey),
}

/// Signing material. U2F-backed algorithms have no variant here.
#[derive(Clone)]
pub enum SecretMaterial {
    /// The clamped secret scalar derived from the Ed25519 seed.
    Ed25519 {
        /// `s` with `s * B` equal to the public point.
        scalar: Scalar,
    },
    /// RSA trapdoor: public parameters plus the private exponent.
    Rsa {
        /// Modulus `N`.
        n: BigUint,
        /// Public exponent `e`.
        e: BigUint,
        /// Private exponent `d`.
        d: BigUint,
    },
    /// P-256 secret scalar.
    EcdsaP256(p256::SecretKey),
    /// P-384 secret scalar.
    EcdsaP384(p384::SecretKey),
    /// P-521 secret scalar.
    EcdsaP521(p521::SecretKey),
}

impl std::fmt::Debug for SecretMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant = match self {
            SecretMaterial::Ed25519 { .. } => "Ed25519",
            SecretMaterial::Rsa { .. } => "Rsa",
            SecretMaterial::EcdsaP256(_) => "EcdsaP256",
            SecretMaterial::EcdsaP384(_) => "EcdsaP384",
            SecretMaterial::EcdsaP521(_) => "EcdsaP521",
        };
        f.debug_tuple(variant).field(&"<redacted>").finish()
    }
}

fn positive(mpint: &Mpint, what: &'static str) -> Result<BigUint, KeyError> {
    mpint
        .as_positive_bytes()
        .map(BigUint::from_bytes_be)
        .ok_or(KeyError::Invalid(what))
}

fn decompress_edwards(bytes: &[u8; 32]) -> Result<EdwardsPoint, KeyError> {
    CompressedEdwardsY(*bytes)
        .decompress()
        .ok_or(KeyError::Invalid("ed25519 public point"))
}

impl RsaPublic {
    pub(crate) fn from_mpints(n: &Mpint, e: &Mpint) -> Result<Self, KeyError> {
        let n = positive(n, "rsa modulus")?;
        let e = positive(e, "rsa public exponent")?;
        if n.bits() < RSA_MIN_BITS || n.bits() > RSA_MAX_BITS {
            return Err(KeyError::Invalid("rsa modulus size"));
        }
        if e < BigUint::from(3u8) {
            return Err(KeyError::Invalid("rsa public exponent"));
        }
        Ok(Self { n, e })
    }
}

impl KeyMaterial {
    pub(crate) fn from_key_data(data: &KeyData) -> Result<Self, KeyError> {
        match data {
            KeyData::Ed25519(pk) => decompress_edwards(&pk.0).map(Self::Ed25519),
            KeyData::SkEd25519(sk) => decompress_edwards(&sk.public_key().0).map(Self::Ed25519),
            KeyData::Rsa(rsa) => RsaPublic::from_mpints(&rsa.n, &rsa.e).map(Self::Rsa),
            KeyData::Ecdsa(EcdsaPublicKey::NistP256(point)) => {
                p256::PublicKey::from_sec1_bytes(point.as_bytes())
                    .map(Self::EcdsaP256)
                    .map_err(|_| KeyError::Invalid("p256 public point"))
            }
            KeyData::Ecdsa(EcdsaPublicKey::NistP384(point)) => {
                p384::PublicKey::from_sec1_bytes(point.as_bytes())
                    .map(Self::EcdsaP384)
                    .map_err(|_| KeyError::Invalid("p384 public point"))
            }
            KeyData::Ecdsa(EcdsaPublicKey::NistP521(point)) => {
                p521::PublicKey::from_sec1_bytes(point.as_bytes())
                    .map(Self::EcdsaP521)
                    .map_err(|_| KeyError::Invalid("p521 public point"))
            }
            KeyData::SkEcdsaSha2NistP256(sk) => {
                p256::PublicKey::from_sec1_bytes(sk.ec_point().as_bytes())
                    .map(Self::EcdsaP256)
                    .map_err(|_| KeyError::Invalid("sk-ecdsa public point"))
            }
            other => Err(KeyError::Unsupported(other.algorithm().to_string())),
        }
    }
}

impl SecretMaterial {
    pub(crate) fn from_keypair_data(data: &KeypairData) -> Result<Self, KeyError> {
        match data {
            KeypairData::Ed25519(kp) => {
                // Same derivation Ed25519 itself uses: hash the seed and
                // clamp the low half.
                let digest = Sha512::digest(kp.private.to_bytes());
                let mut low = [0u8; 32];
                low.copy_from_slice(&digest[..32]);
                Ok(Self::Ed25519 {
                    scalar: Scalar::from_bytes_mod_order(clamp_integer(low)),
                })
            }
            KeypairData::Rsa(kp) => {
                let public = RsaPublic::from_mpints(&kp.public.n, &kp.public.e)?;
                let d = positive(&kp.private.d, "rsa private exponent")?;
                Ok(Self::Rsa {
                    n: public.n,
                    e: public.e,
                    d,
                })
            }
            KeypairData::Ecdsa(EcdsaKeypair::NistP256 { private, .. }) => {
                p256::SecretKey::from_slice(private.as_slice())
                    .map(Self::EcdsaP256)
                    .map_err(|_| KeyError::Invalid("p256 secret scalar"))
            }
            KeypairData::Ecdsa(EcdsaKeypair::NistP384 { private, .. }) => {
                p384::SecretKey::from_slice(private.as_slice())
                    .map(Self::EcdsaP384)
                    .map_err(|_| KeyError::Invalid("p384 secret scalar"))
            }
            KeypairData::Ecdsa(EcdsaKeypair::NistP521 { private, .. }) => {
                p521::SecretKey::from_slice(private.as_slice())
                    .map(Self::EcdsaP521)
                    .map_err(|_| KeyError::Invalid("p521 secret scalar"))
            }
            KeypairData::SkEd25519(_) => {
                Err(KeyError::HardwareBacked(Algorithm::SkEd25519.to_string()))
            }
            KeypairData::SkEcdsaSha2NistP256(_) => Err(KeyError::HardwareBacked(
                Algorithm::SkEcdsaSha2NistP256.to_string(),
            )),
            other => Err(KeyError::Unsupported(
                other
                    .algorithm()
                    .map(|a| a.to_string())
                    .unwrap_or_else(|_| "unknown".to_string()),
            )),
        }
    }
}
