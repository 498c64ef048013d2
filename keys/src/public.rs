//! Public keys and their fingerprint identity.

use core::fmt;
use std::collections::BTreeMap;

use ssh_key::{Algorithm, HashAlg};

use crate::errors::KeyError;
use crate::material::KeyMaterial;

/// A classified SSH public key.
///
/// Equality is defined by fingerprint alone, which in turn is a SHA-256
/// over the canonical SSH wire encoding, so two keys compare equal
/// exactly when their wire material is identical.
#[derive(Clone, Debug)]
pub struct PublicKey {
    algorithm: Algorithm,
    wire: Vec<u8>,
    fingerprint: String,
    material: KeyMaterial,
}

impl PublicKey {
    /// Parse a single `authorized_keys` line.
    pub fn from_openssh(line: &str) -> Result<Self, KeyError> {
        Self::from_ssh(&ssh_key::PublicKey::from_openssh(line.trim())?)
    }

    pub(crate) fn from_ssh(ssh: &ssh_key::PublicKey) -> Result<Self, KeyError> {
        let material = KeyMaterial::from_key_data(ssh.key_data())?;
        let wire = ssh.to_bytes()?;
        let fingerprint = format!(
            "{}-{}",
            ssh.algorithm(),
            ssh.fingerprint(HashAlg::Sha256)
        );
        Ok(Self {
            algorithm: ssh.algorithm(),
            wire,
            fingerprint,
            material,
        })
    }

    /// The SSH algorithm name, e.g. `ssh-ed25519`.
    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Canonical SSH wire encoding of the key.
    pub fn wire(&self) -> &[u8] {
        &self.wire
    }

    /// `"<algo>-SHA256:" + base64(sha256(wire))`, the key's identity.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// The classified verification material.
    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.fingerprint, self.algorithm)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for PublicKey {}

/// Deduplicate keys by fingerprint and emit them in ascending
/// lexicographic fingerprint order.
///
/// Discovery sources return keys in whatever order they feel like;
/// canonicalizing here keeps that order out of the signed statement.
pub fn sort_and_dedup(pks: &[PublicKey]) -> Vec<PublicKey> {
    let mut set = BTreeMap::new();
    for pk in pks {
        set.insert(pk.fingerprint().to_owned(), pk.clone());
    }
    set.into_values().collect()
}

/// Parse an `authorized_keys` document: one key per line, blank lines
/// and `#` comments skipped.
pub fn parse_authorized_keys(doc: &str) -> Result<Vec<PublicKey>, KeyError> {
    let mut out = Vec::new();
    for line in doc.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        out.push(PublicKey::from_openssh(line)?);
    }
    Ok(out)
}
