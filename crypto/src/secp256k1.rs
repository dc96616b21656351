//! secp256k1 implementation of the [`KeyHandler`] contract.
//!
//! Signatures are deterministic (RFC 6979) over the supplied digest and are
//! always emitted with a low `s` component.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use tracing::trace;

use crate::key_handler::{CryptoError, KeyHandler};
use crate::{
    CompressedPublicKey, ECSignature, COMPRESSED_PUBLIC_KEY_LENGTH, HASH_LENGTH,
    PRIVATE_KEY_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};

/// Stateless secp256k1 key handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1KeyHandler;

impl Secp256k1KeyHandler {
    pub const fn new() -> Self {
        Self
    }
}

pub(crate) fn signing_key(private_key: &[u8]) -> Result<SigningKey, CryptoError> {
    if private_key.len() != PRIVATE_KEY_LENGTH {
        return Err(CryptoError::InvalidKey("private key must be 32 bytes"));
    }
    SigningKey::from_slice(private_key)
        .map_err(|_| CryptoError::InvalidKey("scalar is zero or not below the curve order"))
}

pub(crate) fn compressed(key: &VerifyingKey) -> CompressedPublicKey {
    let point = key.to_encoded_point(true);
    let mut out = [0u8; COMPRESSED_PUBLIC_KEY_LENGTH];
    out.copy_from_slice(point.as_bytes());
    out
}

fn check_hash(hash: &[u8]) -> Result<(), CryptoError> {
    if hash.len() != HASH_LENGTH {
        return Err(CryptoError::InvalidInput("hash must be 32 bytes"));
    }
    Ok(())
}

fn verifying_key(public_key: &[u8]) -> Result<VerifyingKey, CryptoError> {
    match public_key.len() {
        COMPRESSED_PUBLIC_KEY_LENGTH | UNCOMPRESSED_PUBLIC_KEY_LENGTH => {}
        _ => return Err(CryptoError::InvalidInput("public key must be 33 or 65 bytes")),
    }
    VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|_| CryptoError::InvalidInput("public key is not a valid curve point"))
}

impl KeyHandler for Secp256k1KeyHandler {
    fn sign(&self, hash: &[u8], private_key: &[u8]) -> Result<ECSignature, CryptoError> {
        let key = signing_key(private_key)?;
        check_hash(hash)?;
        let sig: Signature = key
            .sign_prehash(hash)
            .map_err(|_| CryptoError::InvalidInput("digest rejected by signer"))?;
        let sig = sig.normalize_s().unwrap_or(sig);
        trace!(hash = %hex::encode(hash), "signed digest");
        Ok(ECSignature::from_curve(&sig))
    }

    fn verify(
        &self,
        hash: &[u8],
        signature: &ECSignature,
        public_key: &[u8],
    ) -> Result<bool, CryptoError> {
        check_hash(hash)?;
        let key = verifying_key(public_key)?;
        let sig = signature.to_curve()?;
        // Accept high-s encodings from other signers; the curve verifier only
        // takes the normalised form.
        let sig = sig.normalize_s().unwrap_or(sig);
        let valid = key.verify_prehash(hash, &sig).is_ok();
        trace!(hash = %hex::encode(hash), valid, "verified digest");
        Ok(valid)
    }

    fn compute_public_key(&self, private_key: &[u8]) -> Result<CompressedPublicKey, CryptoError> {
        let key = signing_key(private_key)?;
        Ok(compressed(key.verifying_key()))
    }

    fn compress_public_key(&self, public_key: &[u8]) -> Result<CompressedPublicKey, CryptoError> {
        Ok(compressed(&verifying_key(public_key)?))
    }
}
