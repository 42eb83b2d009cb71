use sha2::{Digest, Sha256};

/// Decides whether a presented credential grants admin rights.
pub trait Authenticator: Send + Sync {
    fn authorize(&self, credential: &str) -> bool;
}

/// Compares the credential to a shared secret in plain text.
#[derive(Debug, Clone)]
pub struct SharedSecretAuthenticator {
    secret: String,
}

impl SharedSecretAuthenticator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl Authenticator for SharedSecretAuthenticator {
    fn authorize(&self, credential: &str) -> bool {
        !self.secret.is_empty() && credential == self.secret
    }
}

/// Compares the SHA-256 of the credential to a configured hex digest,
/// so the secret itself never has to sit in the environment.
#[derive(Debug, Clone)]
pub struct Sha256Authenticator {
    digest: [u8; 32],
}

impl Sha256Authenticator {
    pub fn from_hex(digest_hex: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(digest_hex.trim())?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("ADMIN_SECRET_SHA256 must be 32 bytes of hex"))?;
        Ok(Self { digest })
    }
}

impl Authenticator for Sha256Authenticator {
    fn authorize(&self, credential: &str) -> bool {
        let actual: [u8; 32] = Sha256::digest(credential.as_bytes()).into();
        actual == self.digest
    }
}
