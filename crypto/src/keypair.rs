use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use std::fmt;

use crate::key_handler::{CryptoError, KeyHandler};
use crate::secp256k1::{compressed, signing_key};
use crate::{CompressedPublicKey, ECSignature, Hash, Secp256k1KeyHandler, PRIVATE_KEY_LENGTH};

/// A secp256k1 private key with its cached compressed public key.
#[derive(Clone)]
pub struct ECKeyPair {
    private_key: [u8; PRIVATE_KEY_LENGTH],
    public_key: CompressedPublicKey,
}

impl ECKeyPair {
    /// Generate a new key pair from OS randomness.
    pub fn generate() -> Self {
        let key = SigningKey::random(&mut OsRng);
        let mut private_key = [0u8; PRIVATE_KEY_LENGTH];
        private_key.copy_from_slice(&key.to_bytes());
        Self {
            private_key,
            public_key: compressed(key.verifying_key()),
        }
    }

    /// Restore a key pair from a 32-byte private scalar.
    pub fn from_private_key(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key = signing_key(bytes)?;
        let mut private_key = [0u8; PRIVATE_KEY_LENGTH];
        private_key.copy_from_slice(bytes);
        Ok(Self {
            private_key,
            public_key: compressed(key.verifying_key()),
        })
    }

    pub fn public_key(&self) -> &CompressedPublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &[u8; PRIVATE_KEY_LENGTH] {
        &self.private_key
    }

    /// Sign a content hash.
    pub fn sign(&self, hash: &Hash) -> Result<ECSignature, CryptoError> {
        Secp256k1KeyHandler.sign(hash.as_bytes(), &self.private_key)
    }

    /// Verify a signature over `hash` against this pair's public key.
    pub fn verify(&self, hash: &Hash, signature: &ECSignature) -> Result<bool, CryptoError> {
        verify_with(&self.public_key, hash, signature)
    }
}

/// Verify `signature` over `hash` against an encoded public key.
pub fn verify_with(
    public_key: &[u8],
    hash: &Hash,
    signature: &ECSignature,
) -> Result<bool, CryptoError> {
    Secp256k1KeyHandler.verify(hash.as_bytes(), signature, public_key)
}

impl fmt::Debug for ECKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ECKeyPair")
            .field("public_key", &hex::encode(self.public_key))
            .finish_non_exhaustive()
    }
}

impl PartialEq for ECKeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for ECKeyPair {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restored_pair_matches_generated() {
        let pair = ECKeyPair::generate();
        let restored = ECKeyPair::from_private_key(pair.private_key()).unwrap();
        assert_eq!(pair, restored);
        assert_eq!(pair.public_key(), restored.public_key());
    }

    #[test]
    fn debug_hides_private_key() {
        let pair = ECKeyPair::from_private_key(&[3u8; 32]).unwrap();
        let text = format!("{pair:?}");
        assert!(!text.contains(&hex::encode([3u8; 32])));
        assert!(text.contains(&hex::encode(pair.public_key())));
    }

    #[test]
    fn signs_and_verifies_hashes() {
        let pair = ECKeyPair::generate();
        let hash = Hash::of(b"transfer");
        let sig = pair.sign(&hash).unwrap();
        assert!(pair.verify(&hash, &sig).unwrap());
        assert!(!pair.verify(&Hash::of(b"other"), &sig).unwrap());
    }
}
