//! Salted, iterated SHA-256 credential hashing.
//!
//! Hashes are stored as `sha256$<rounds>$<salt hex>$<digest hex>`, so the
//! round count can change without invalidating existing credentials.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use registry_core::credential::{CredentialHash, CredentialHasher, Secret};
use registry_core::error::{RegistryError, Result};

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct Sha256CredentialHasher {
    rounds: u32,
}

impl Sha256CredentialHasher {
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(1),
        }
    }

    fn digest(rounds: u32, salt: &[u8], secret: &Secret) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(secret.expose().as_bytes());
        let mut digest = hasher.finalize();
        for _ in 1..rounds {
            let mut hasher = Sha256::new();
            hasher.update(digest);
            hasher.update(salt);
            digest = hasher.finalize();
        }
        digest.to_vec()
    }
}

impl CredentialHasher for Sha256CredentialHasher {
    fn hash(&self, secret: &Secret) -> Result<CredentialHash> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::digest(self.rounds, &salt, secret);
        Ok(CredentialHash::new(format!(
            "{}${}${}${}",
            SCHEME,
            self.rounds,
            hex::encode(salt),
            hex::encode(digest)
        )))
    }

    fn verify(&self, secret: &Secret, hash: &CredentialHash) -> Result<bool> {
        let unreadable = || RegistryError::internal("stored credential hash is unreadable");

        let mut parts = hash.as_str().split('$');
        let (Some(scheme), Some(rounds), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(unreadable());
        };
        if scheme != SCHEME {
            return Err(unreadable());
        }
        let rounds: u32 = rounds.parse().map_err(|_| unreadable())?;
        let salt = hex::decode(salt).map_err(|_| unreadable())?;
        let expected = hex::decode(expected).map_err(|_| unreadable())?;

        let actual = Self::digest(rounds.max(1), &salt, secret);
        Ok(actual.as_slice().ct_eq(expected.as_slice()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = Sha256CredentialHasher::new(3);
        let hash = hasher.hash(&Secret::new("correct horse")).unwrap();

        assert!(hash.as_str().starts_with("sha256$3$"));
        assert!(hasher.verify(&Secret::new("correct horse"), &hash).unwrap());
        assert!(!hasher.verify(&Secret::new("battery staple"), &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = Sha256CredentialHasher::new(1);
        let a = hasher.hash(&Secret::new("same")).unwrap();
        let b = hasher.hash(&Secret::new("same")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_uses_rounds_from_hash() {
        let hash = Sha256CredentialHasher::new(5)
            .hash(&Secret::new("pw"))
            .unwrap();
        let other = Sha256CredentialHasher::new(50);
        assert!(other.verify(&Secret::new("pw"), &hash).unwrap());
    }

    #[test]
    fn test_unreadable_hash_is_an_error() {
        let hasher = Sha256CredentialHasher::new(1);
        assert!(
            hasher
                .verify(&Secret::new("pw"), &CredentialHash::new("plaintext"))
                .is_err()
        );
        assert!(
            hasher
                .verify(&Secret::new("pw"), &CredentialHash::new("md5$1$00$00"))
                .is_err()
        );
    }

    #[test]
    fn test_truncated_digest_does_not_verify() {
        let hasher = Sha256CredentialHasher::new(2);
        let hash = hasher.hash(&Secret::new("pw")).unwrap();
        let truncated = &hash.as_str()[..hash.as_str().len() - 2];

        assert!(
            !hasher
                .verify(&Secret::new("pw"), &CredentialHash::new(truncated))
                .unwrap()
        );
    }
}
