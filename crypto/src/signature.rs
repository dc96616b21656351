use k256::ecdsa::Signature;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::key_handler::CryptoError;

/// Width of one signature component.
pub const COMPONENT_LENGTH: usize = 32;

/// An ECDSA signature as its two big-endian unsigned components.
///
/// Construction does not check that `r` and `s` are in range for the curve;
/// that happens when the signature is verified, where an out-of-range
/// component is reported as [`CryptoError::InvalidInput`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ECSignature {
    r: [u8; COMPONENT_LENGTH],
    s: [u8; COMPONENT_LENGTH],
}

impl ECSignature {
    pub const fn new(r: [u8; COMPONENT_LENGTH], s: [u8; COMPONENT_LENGTH]) -> Self {
        Self { r, s }
    }

    /// Build a signature from big-endian component slices of at most 32 bytes.
    ///
    /// Shorter slices are left-padded with zeros, matching the minimal
    /// big-integer encodings some encoders emit.
    pub fn from_components(r: &[u8], s: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            r: left_pad(r)?,
            s: left_pad(s)?,
        })
    }

    /// Parse the 64-byte `r || s` form.
    pub fn from_bytes(bytes: &[u8; 2 * COMPONENT_LENGTH]) -> Self {
        let mut r = [0u8; COMPONENT_LENGTH];
        let mut s = [0u8; COMPONENT_LENGTH];
        r.copy_from_slice(&bytes[..COMPONENT_LENGTH]);
        s.copy_from_slice(&bytes[COMPONENT_LENGTH..]);
        Self { r, s }
    }

    /// Lossless 64-byte `r || s` form.
    pub fn to_bytes(&self) -> [u8; 2 * COMPONENT_LENGTH] {
        let mut out = [0u8; 2 * COMPONENT_LENGTH];
        out[..COMPONENT_LENGTH].copy_from_slice(&self.r);
        out[COMPONENT_LENGTH..].copy_from_slice(&self.s);
        out
    }

    pub fn r(&self) -> &[u8; COMPONENT_LENGTH] {
        &self.r
    }

    pub fn s(&self) -> &[u8; COMPONENT_LENGTH] {
        &self.s
    }

    /// ASN.1 DER encoding.
    pub fn to_der(&self) -> Result<Vec<u8>, CryptoError> {
        Ok(self.to_curve()?.to_der().as_bytes().to_vec())
    }

    /// Decode an ASN.1 DER signature.
    pub fn from_der(bytes: &[u8]) -> Result<Self, CryptoError> {
        let sig = Signature::from_der(bytes)
            .map_err(|_| CryptoError::InvalidInput("malformed DER signature"))?;
        Ok(Self::from_curve(&sig))
    }

    /// Convert into the curve type, rejecting zero or out-of-range components.
    pub(crate) fn to_curve(&self) -> Result<Signature, CryptoError> {
        Signature::from_slice(&self.to_bytes())
            .map_err(|_| CryptoError::InvalidInput("signature component out of range"))
    }

    pub(crate) fn from_curve(sig: &Signature) -> Self {
        let bytes = sig.to_bytes();
        let mut raw = [0u8; 2 * COMPONENT_LENGTH];
        raw.copy_from_slice(&bytes);
        Self::from_bytes(&raw)
    }
}

fn left_pad(component: &[u8]) -> Result<[u8; COMPONENT_LENGTH], CryptoError> {
    if component.len() > COMPONENT_LENGTH {
        return Err(CryptoError::InvalidInput("signature component longer than 32 bytes"));
    }
    let mut out = [0u8; COMPONENT_LENGTH];
    out[COMPONENT_LENGTH - component.len()..].copy_from_slice(component);
    Ok(out)
}

impl fmt::Debug for ECSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ECSignature")
            .field("r", &hex::encode(self.r))
            .field("s", &hex::encode(self.s))
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct SignatureRepr {
    r: String,
    s: String,
}

impl Serialize for ECSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SignatureRepr {
            r: hex::encode(self.r),
            s: hex::encode(self.s),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ECSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = SignatureRepr::deserialize(deserializer)?;
        let r = hex::decode(&repr.r).map_err(de::Error::custom)?;
        let s = hex::decode(&repr.s).map_err(de::Error::custom)?;
        ECSignature::from_components(&r, &s).map_err(de::Error::custom)
    }
}
