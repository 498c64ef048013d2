//! Schnorr branch on the NIST curves, generic over the curve type.
//!
//! Proves knowledge of `d` with `d * G = X` on P-256, P-384 or P-521.
//! Proof fields are carried as curve-erased integers so one wire shape
//! (an ASN.1 `SEQUENCE` of three canonical `INTEGER`s) serves all three
//! instantiations; the algebra is done in the curve's own scalar and
//! point types.

use der::asn1::Uint;
use der::{Decode, Encode, Sequence};
use elliptic_curve::ff::{Field, PrimeField};
use elliptic_curve::generic_array::typenum::Unsigned;
use elliptic_curve::group::{Curve as _, Group};
use elliptic_curve::sec1::{EncodedPoint, FromEncodedPoint, ModulusSize, ToEncodedPoint};
use elliptic_curve::{
    AffinePoint, CurveArithmetic, FieldBytes, FieldBytesSize, PrimeCurve, ProjectivePoint,
    PublicKey, Scalar, SecretKey,
};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use crate::challenge::Challenge;
use crate::errors::RingError;
use crate::transcript::Transcript;

const COMMIT_TAG: &[u8] = b"ecdsa proof";
const CHALLENGE_TAG: &str = "";
const CHALLENGE_BYTES: usize = 16;

/// Branch proof: affine commitment coordinates and response scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EcdsaProof {
    a_x: BigUint,
    a_y: BigUint,
    z: BigUint,
}

#[derive(Sequence)]
struct EcdsaProofDer {
    a_x: Uint,
    a_y: Uint,
    z: Uint,
}

/// The 128-bit branch challenge, lifted to the curve's scalar type.
///
/// Reduction mod the group order is the identity for 128-bit values on
/// every supported curve.
fn challenge_scalar<C>(chal: &Challenge) -> Result<Scalar<C>, RingError>
where
    C: CurveArithmetic,
{
    let bytes = chal.take(CHALLENGE_TAG, CHALLENGE_BYTES)?;
    let mut wide = [0u8; CHALLENGE_BYTES];
    wide.copy_from_slice(&bytes);
    Ok(Scalar::<C>::from_u128(u128::from_be_bytes(wide)))
}

/// Left-pad a big-endian integer into the curve's fixed field width.
/// Values wider than the field are rejected.
fn field_bytes<C>(value: &BigUint) -> Option<FieldBytes<C>>
where
    C: CurveArithmetic,
{
    let bytes = value.to_bytes_be();
    let width = FieldBytesSize::<C>::USIZE;
    if bytes.len() > width {
        return None;
    }
    let mut out = FieldBytes::<C>::default();
    out[width - bytes.len()..].copy_from_slice(&bytes);
    Some(out)
}

/// Decode a response integer as a scalar, rejecting values `>= N`.
fn decode_scalar<C>(value: &BigUint) -> Option<Scalar<C>>
where
    C: CurveArithmetic,
{
    Option::from(Scalar::<C>::from_repr(field_bytes::<C>(value)?))
}

/// Decode commitment coordinates, rejecting off-curve points.
fn decode_point<C>(x: &BigUint, y: &BigUint) -> Option<AffinePoint<C>>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let encoded =
        EncodedPoint::<C>::from_affine_coordinates(&field_bytes::<C>(x)?, &field_bytes::<C>(y)?, false);
    Option::from(AffinePoint::<C>::from_encoded_point(&encoded))
}

fn scalar_uint<C>(scalar: &Scalar<C>) -> BigUint
where
    C: CurveArithmetic,
{
    BigUint::from_bytes_be(scalar.to_repr().as_slice())
}

fn point_coordinates<C>(point: &ProjectivePoint<C>) -> Result<(BigUint, BigUint), RingError>
where
    C: CurveArithmetic,
    AffinePoint<C>: ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let encoded = point.to_affine().to_encoded_point(false);
    match (encoded.x(), encoded.y()) {
        (Some(x), Some(y)) => Ok((
            BigUint::from_bytes_be(x.as_slice()),
            BigUint::from_bytes_be(y.as_slice()),
        )),
        _ => Err(RingError::Internal(
            "ecdsa commitment degenerated to the identity",
        )),
    }
}

fn commit_coordinates(tx: &mut Transcript, a_x: &BigUint, a_y: &BigUint) {
    tx.append(COMMIT_TAG);
    tx.append(&a_x.to_bytes_be());
    tx.append(&a_y.to_bytes_be());
}

fn encode_failure(_: der::Error) -> RingError {
    RingError::Internal("der encoding of an ecdsa branch")
}

impl EcdsaProof {
    pub fn marshal(&self) -> Result<Vec<u8>, RingError> {
        let der = EcdsaProofDer {
            a_x: Uint::new(&self.a_x.to_bytes_be()).map_err(encode_failure)?,
            a_y: Uint::new(&self.a_y.to_bytes_be()).map_err(encode_failure)?,
            z: Uint::new(&self.z.to_bytes_be()).map_err(encode_failure)?,
        };
        der.to_der().map_err(encode_failure)
    }

    pub fn unmarshal(bytes: &[u8]) -> Result<Self, RingError> {
        let der = EcdsaProofDer::from_der(bytes)
            .map_err(|e| RingError::MalformedSignature(format!("ecdsa proof: {e}")))?;
        Ok(Self {
            a_x: BigUint::from_bytes_be(der.a_x.as_bytes()),
            a_y: BigUint::from_bytes_be(der.a_y.as_bytes()),
            z: BigUint::from_bytes_be(der.z.as_bytes()),
        })
    }

    pub fn commit(&self, tx: &mut Transcript) {
        commit_coordinates(tx, &self.a_x, &self.a_y);
    }
}

/// Check `Z * G == A + c * X`.
pub(crate) fn verify<C>(pk: &PublicKey<C>, pf: &EcdsaProof, chal: &Challenge) -> Result<(), RingError>
where
    C: PrimeCurve + CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let a = decode_point::<C>(&pf.a_x, &pf.a_y).ok_or_else(|| {
        RingError::MalformedSignature("ecdsa commitment is not on the curve".into())
    })?;
    let z = decode_scalar::<C>(&pf.z).ok_or_else(|| {
        RingError::MalformedSignature("ecdsa response is not a canonical scalar".into())
    })?;
    let c = challenge_scalar::<C>(chal)?;

    let lhs = ProjectivePoint::<C>::generator() * z;
    let rhs = ProjectivePoint::<C>::from(a) + ProjectivePoint::<C>::from(*pk.as_affine()) * c;
    if lhs != rhs {
        return Err(RingError::VerificationFailed(
            "ecdsa branch equation does not hold",
        ));
    }
    Ok(())
}

/// Sample the response, then solve for the commitment.
pub(crate) fn simulate<C, R>(
    rng: &mut R,
    pk: &PublicKey<C>,
    chal: &Challenge,
) -> Result<EcdsaProof, RingError>
where
    C: PrimeCurve + CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
    R: CryptoRng + RngCore,
{
    let z = Scalar::<C>::random(&mut *rng);
    let c = challenge_scalar::<C>(chal)?;
    let a = ProjectivePoint::<C>::generator() * z - ProjectivePoint::<C>::from(*pk.as_affine()) * c;
    let (a_x, a_y) = point_coordinates::<C>(&a)?;
    let pf = EcdsaProof {
        a_x,
        a_y,
        z: scalar_uint::<C>(&z),
    };
    verify::<C>(pk, &pf, chal)
        .map_err(|_| RingError::Internal("simulated ecdsa branch failed its own check"))?;
    Ok(pf)
}

/// Prover state for the active branch.
pub(crate) struct EcdsaProver<C>
where
    C: CurveArithmetic,
{
    r: Scalar<C>,
    a_x: BigUint,
    a_y: BigUint,
    secret: Scalar<C>,
    public: PublicKey<C>,
}

impl<C> EcdsaProver<C>
where
    C: PrimeCurve + CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    pub fn new<R: CryptoRng + RngCore>(rng: &mut R, secret: &SecretKey<C>) -> Result<Self, RingError> {
        let r = Scalar::<C>::random(&mut *rng);
        let (a_x, a_y) = point_coordinates::<C>(&(ProjectivePoint::<C>::generator() * r))?;
        Ok(Self {
            r,
            a_x,
            a_y,
            secret: *secret.to_nonzero_scalar().as_ref(),
            public: secret.public_key(),
        })
    }

    pub fn commit(&self, tx: &mut Transcript) {
        commit_coordinates(tx, &self.a_x, &self.a_y);
    }

    /// Close the branch with `z = c * secret + r` in constant-time
    /// scalar arithmetic. Consumes the prover.
    pub fn finish(self, chal: &Challenge) -> Result<EcdsaProof, RingError> {
        let c = challenge_scalar::<C>(chal)?;
        let z = c * self.secret + self.r;
        let pf = EcdsaProof {
            a_x: self.a_x,
            a_y: self.a_y,
            z: scalar_uint::<C>(&z),
        };
        verify::<C>(&self.public, &pf, chal)
            .map_err(|_| RingError::Internal("completed ecdsa branch failed its own check"))?;
        Ok(pf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::NistP256;
    use p384::NistP384;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_prover_round_trip_p256() {
        let mut rng = StdRng::seed_from_u64(42);
        let secret = SecretKey::<NistP256>::random(&mut rng);
        let public = secret.public_key();
        let chal = Challenge::random(&mut rng);

        let prover = EcdsaProver::new(&mut rng, &secret).expect("prover");
        let pf = prover.finish(&chal).expect("finish");
        assert!(verify::<NistP256>(&public, &pf, &chal).is_ok());
    }

    #[test]
    fn test_simulator_satisfies_verifier() {
        let mut rng = StdRng::seed_from_u64(42);
        let secret = SecretKey::<NistP384>::random(&mut rng);
        let public = secret.public_key();
        let chal = Challenge::random(&mut rng);

        let pf = simulate::<NistP384, _>(&mut rng, &public, &chal).expect("simulate");
        assert!(verify::<NistP384>(&public, &pf, &chal).is_ok());
    }

    #[test]
    fn test_wrong_challenge_fails() {
        let mut rng = StdRng::seed_from_u64(42);
        let secret = SecretKey::<NistP256>::random(&mut rng);
        let public = secret.public_key();
        let chal = Challenge::random(&mut rng);
        let pf = simulate::<NistP256, _>(&mut rng, &public, &chal).expect("simulate");

        let other = Challenge::random(&mut rng);
        assert!(verify::<NistP256>(&public, &pf, &other).is_err());
    }

    #[test]
    fn test_tampered_response_is_rejected() {
        let mut rng = StdRng::seed_from_u64(42);
        let secret = SecretKey::<NistP256>::random(&mut rng);
        let public = secret.public_key();
        let chal = Challenge::random(&mut rng);
        let pf = simulate::<NistP256, _>(&mut rng, &public, &chal).expect("simulate");

        let mut tampered = pf.clone();
        tampered.z += 1u8;
        assert!(verify::<NistP256>(&public, &tampered, &chal).is_err());
    }

    #[test]
    fn test_marshal_round_trip_rejects_junk() {
        let mut rng = StdRng::seed_from_u64(42);
        let secret = SecretKey::<NistP256>::random(&mut rng);
        let public = secret.public_key();
        let chal = Challenge::random(&mut rng);
        let pf = simulate::<NistP256, _>(&mut rng, &public, &chal).expect("simulate");

        let bytes = pf.marshal().expect("marshal");
        assert_eq!(EcdsaProof::unmarshal(&bytes).expect("unmarshal"), pf);

        let mut trailing = bytes.clone();
        trailing.push(0x00);
        assert!(EcdsaProof::unmarshal(&trailing).is_err());
    }
}
