//! Authentication primitives for ledger state transitions.
//!
//! Exposes the [`KeyHandler`] signing contract, its secp256k1 implementation,
//! and the hash and signature value types exchanged with the ledger layer.

pub mod hash;
pub mod key_handler;
pub mod keypair;
pub mod secp256k1;
pub mod signature;

pub use hash::Hash;
pub use key_handler::{CryptoError, KeyHandler};
pub use keypair::{verify_with, ECKeyPair};
pub use secp256k1::Secp256k1KeyHandler;
pub use signature::ECSignature;

/// Width in bytes of every digest passed to [`KeyHandler::sign`] and [`KeyHandler::verify`].
pub const HASH_LENGTH: usize = 32;

/// Width in bytes of a secp256k1 private scalar.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Width in bytes of a compressed SEC1 public key.
pub const COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;

/// Width in bytes of an uncompressed SEC1 public key.
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

/// Compressed SEC1 public key bytes.
pub type CompressedPublicKey = [u8; COMPRESSED_PUBLIC_KEY_LENGTH];
