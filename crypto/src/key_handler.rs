use thiserror::Error;

use crate::{CompressedPublicKey, ECSignature};

/// Failures raised by malformed key material or signature inputs.
///
/// A signature that simply does not match is not an error; see
/// [`KeyHandler::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid private key: {0}")]
    InvalidKey(&'static str),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

/// Signature and public key computation functions.
///
/// Implementations hold no mutable state and must be safe to call from many
/// threads at once.
pub trait KeyHandler: Send + Sync {
    /// Sign a 32-byte `hash` with `private_key`.
    ///
    /// Fails with [`CryptoError::InvalidKey`] if the key is not a valid
    /// scalar for the curve.
    fn sign(&self, hash: &[u8], private_key: &[u8]) -> Result<ECSignature, CryptoError>;

    /// Check `signature` over `hash` against `public_key`.
    ///
    /// Returns `Ok(false)` for a well formed signature that does not verify.
    /// Fails with [`CryptoError::InvalidInput`] if the public key or the
    /// signature is structurally invalid.
    fn verify(
        &self,
        hash: &[u8],
        signature: &ECSignature,
        public_key: &[u8],
    ) -> Result<bool, CryptoError>;

    /// Derive the compressed public key for `private_key`.
    fn compute_public_key(&self, private_key: &[u8]) -> Result<CompressedPublicKey, CryptoError>;

    /// Re-encode any accepted public key encoding in compressed form.
    fn compress_public_key(&self, public_key: &[u8]) -> Result<CompressedPublicKey, CryptoError>;
}
