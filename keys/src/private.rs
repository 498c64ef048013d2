//! Private keys usable for signing.

use crate::errors::KeyError;
use crate::material::SecretMaterial;
use crate::public::PublicKey;

/// An unencrypted SSH private key together with its public half.
#[derive(Clone)]
pub struct PrivateKey {
    public: PublicKey,
    material: SecretMaterial,
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &self.public)
            .field("material", &self.material)
            .finish()
    }
}

impl PrivateKey {
    /// Parse an unencrypted `BEGIN OPENSSH PRIVATE KEY` document.
    ///
    /// Encrypted keys are rejected with [`KeyError::Encrypted`]; callers
    /// must decrypt before handing the key to this crate. U2F-backed
    /// keys are rejected with [`KeyError::HardwareBacked`].
    pub fn from_openssh(pem: &str) -> Result<Self, KeyError> {
        let ssh = ssh_key::PrivateKey::from_openssh(pem)?;
        if ssh.is_encrypted() {
            return Err(KeyError::Encrypted);
        }
        let material = SecretMaterial::from_keypair_data(ssh.key_data())?;
        let public = PublicKey::from_ssh(ssh.public_key())?;
        Ok(Self { public, material })
    }

    /// The corresponding public key.
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// The signing material.
    pub fn material(&self) -> &SecretMaterial {
        &self.material
    }
}
