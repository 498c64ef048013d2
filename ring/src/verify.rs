//! Verification: subset selection, then branch-by-branch checks.

use std::collections::HashMap;

use keys::PublicKey;

use crate::errors::RingError;
use crate::sigma::BranchProof;
use crate::sign::statement_transcript;
use crate::signature::{Signature, VERSION};

impl Signature {
    /// Verify against a candidate set that may be a superset of the
    /// signing ring.
    ///
    /// The keys named by the signature's fingerprints are selected from
    /// the candidates (in signature order) and the rest are ignored, so
    /// a caller can keep handing in a grown key set and old blobs keep
    /// verifying. A fingerprint with no candidate is a
    /// [`RingError::RingMismatch`]. Returns the message on success.
    pub fn verify(&self, candidates: &[PublicKey]) -> Result<&[u8], RingError> {
        let by_fingerprint: HashMap<&str, &PublicKey> = candidates
            .iter()
            .map(|pk| (pk.fingerprint(), pk))
            .collect();

        let mut ring = Vec::with_capacity(self.fingerprints.len());
        for fingerprint in &self.fingerprints {
            match by_fingerprint.get(fingerprint.as_str()) {
                Some(pk) => ring.push((*pk).clone()),
                None => {
                    return Err(RingError::RingMismatch(
                        "the signature ring is not a subset of the candidate keys",
                    ))
                }
            }
        }
        self.verify_exact(&ring)
    }

    /// Verify against exactly the signing ring, in the signature's order.
    pub fn verify_exact(&self, ring: &[PublicKey]) -> Result<&[u8], RingError> {
        if self.version != VERSION {
            return Err(RingError::MalformedSignature(format!(
                "unsupported signature version {}",
                self.version
            )));
        }
        if self.proofs.len() != ring.len()
            || self.challenges.len() != ring.len()
            || self.fingerprints.len() != ring.len()
        {
            return Err(RingError::MalformedSignature(
                "signature arrays disagree with the ring size".into(),
            ));
        }

        let mut tx = statement_transcript(ring, &self.msg);

        for (i, pk) in ring.iter().enumerate() {
            if pk.fingerprint() != self.fingerprints[i] {
                return Err(RingError::RingMismatch(
                    "fingerprint does not match the public key",
                ));
            }
            let proof = BranchProof::unmarshal(pk.material(), &self.proofs[i])?;
            proof.verify(pk, &self.challenges[i])?;
            proof.commit(&mut tx);
        }

        // Final check: transcript challenge XOR all member challenges is
        // the identity.
        let mut delta = tx.challenge();
        for chal in &self.challenges {
            delta ^= chal;
        }
        if !delta.is_zero() {
            return Err(RingError::VerificationFailed(
                "branch challenges do not close the ring",
            ));
        }
        Ok(&self.msg)
    }
}
