//! The signing path: OR-composition under Fiat-Shamir.

use keys::{sort_and_dedup, PrivateKey, PublicKey};
use rand::{CryptoRng, RngCore};

use crate::challenge::Challenge;
use crate::errors::RingError;
use crate::sigma::{BranchProof, BranchProver};
use crate::signature::{Signature, VERSION};
use crate::transcript::Transcript;

/// Absorb the statement: every ring key's wire encoding, then the message.
pub(crate) fn statement_transcript(ring: &[PublicKey], msg: &[u8]) -> Transcript {
    let mut tx = Transcript::new();
    for pk in ring {
        tx.append(pk.wire());
    }
    tx.append(msg);
    tx
}

/// Produce a ring signature over `msg`.
///
/// The ring is sorted and deduplicated by fingerprint before anything
/// else, so the blob cannot leak the order in which keys were collected.
/// The signer's public key must be a ring member; every other branch is
/// simulated against a random challenge, and the signer's challenge is
/// whatever closes the XOR-sum to the transcript challenge.
pub fn sign<R: CryptoRng + RngCore>(
    rng: &mut R,
    signer: &PrivateKey,
    ring: &[PublicKey],
    msg: &[u8],
) -> Result<Signature, RingError> {
    let ring = sort_and_dedup(ring);
    let index = ring
        .iter()
        .position(|pk| pk == signer.public())
        .ok_or(RingError::RingMismatch("the signing key is not a ring member"))?;

    let mut challenges: Vec<Challenge> = (0..ring.len())
        .map(|i| {
            if i == index {
                Challenge::zero()
            } else {
                Challenge::random(rng)
            }
        })
        .collect();

    let mut tx = statement_transcript(&ring, msg);

    let mut proofs: Vec<Option<BranchProof>> = Vec::with_capacity(ring.len());
    for (i, pk) in ring.iter().enumerate() {
        if i == index {
            proofs.push(None);
        } else {
            proofs.push(Some(BranchProof::simulate(rng, pk, &challenges[i])?));
        }
    }

    let prover = BranchProver::new(rng, signer)?;

    for slot in &proofs {
        match slot {
            Some(pf) => pf.commit(&mut tx),
            None => prover.commit(&mut tx),
        }
    }

    // The signer's challenge closes the group: XOR of all challenges
    // equals the transcript challenge.
    let mut closing = tx.challenge();
    for (i, chal) in challenges.iter().enumerate() {
        if i != index {
            closing ^= chal;
        }
    }
    challenges[index] = closing;

    proofs[index] = Some(prover.finish(&challenges[index])?);

    let mut proof_bytes = Vec::with_capacity(proofs.len());
    for slot in proofs {
        let pf = slot.ok_or(RingError::Internal("a branch proof slot was left empty"))?;
        proof_bytes.push(pf.marshal()?);
    }

    Ok(Signature {
        version: VERSION,
        msg: msg.to_vec(),
        fingerprints: ring.iter().map(|pk| pk.fingerprint().to_owned()).collect(),
        challenges,
        proofs: proof_bytes,
    })
}
