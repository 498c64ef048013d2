//! The persisted signature blob and its DER form.

use der::asn1::OctetString;
use der::{Decode, Encode, Sequence};
use serde::{Deserialize, Serialize};

use crate::challenge::Challenge;
use crate::errors::RingError;

/// The only blob version this implementation produces or accepts.
pub(crate) const VERSION: u8 = 1;

/// A heterogeneous ring signature.
///
/// All arrays run in ring order: `fingerprints[i]` names the public key
/// whose branch is `proofs[i]` under `challenges[i]`. For a valid
/// signature the XOR-sum of the challenges equals the transcript
/// challenge over the statement (every ring key's wire encoding, then
/// the message) followed by every branch commitment.
///
/// Signatures are plain values; the canonical persisted form is the DER
/// blob from [`Signature::to_der`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub(crate) version: u8,
    pub(crate) msg: Vec<u8>,
    pub(crate) fingerprints: Vec<String>,
    pub(crate) challenges: Vec<Challenge>,
    pub(crate) proofs: Vec<Vec<u8>>,
}

#[derive(Sequence)]
struct SignatureDer {
    version: u8,
    msg: OctetString,
    fingerprints: Vec<String>,
    challenges: Vec<OctetString>,
    proofs: Vec<OctetString>,
}

fn encode_failure(_: der::Error) -> RingError {
    RingError::Internal("der encoding of a signature")
}

impl Signature {
    /// The signed message.
    pub fn msg(&self) -> &[u8] {
        &self.msg
    }

    /// Fingerprints of the ring members, in ring order.
    pub fn fingerprints(&self) -> &[String] {
        &self.fingerprints
    }

    /// Serialize to the canonical DER blob.
    pub fn to_der(&self) -> Result<Vec<u8>, RingError> {
        let challenges = self
            .challenges
            .iter()
            .map(|chal| OctetString::new(chal.as_bytes().to_vec()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(encode_failure)?;
        let proofs = self
            .proofs
            .iter()
            .map(|proof| OctetString::new(proof.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(encode_failure)?;
        let der = SignatureDer {
            version: self.version,
            msg: OctetString::new(self.msg.clone()).map_err(encode_failure)?,
            fingerprints: self.fingerprints.clone(),
            challenges,
            proofs,
        };
        der.to_der().map_err(encode_failure)
    }

    /// Parse a DER blob. Trailing bytes are rejected.
    pub fn from_der(bytes: &[u8]) -> Result<Self, RingError> {
        let der = SignatureDer::from_der(bytes)
            .map_err(|e| RingError::MalformedSignature(format!("signature blob: {e}")))?;
        let mut challenges = Vec::with_capacity(der.challenges.len());
        for octets in &der.challenges {
            challenges.push(Challenge::try_from(octets.as_bytes())?);
        }
        Ok(Self {
            version: der.version,
            msg: der.msg.as_bytes().to_vec(),
            fingerprints: der.fingerprints,
            challenges,
            proofs: der
                .proofs
                .iter()
                .map(|proof| proof.as_bytes().to_vec())
                .collect(),
        })
    }
}
