use crypto::{CryptoError, ECKeyPair, ECSignature, Hash, KeyHandler, Secp256k1KeyHandler};
use std::sync::Arc;
use std::thread;

fn handler() -> Secp256k1KeyHandler {
    Secp256k1KeyHandler::new()
}

#[test]
fn sign_then_verify_round_trips() {
    let handler = handler();
    for seed in 1u8..=16 {
        let private_key = [seed; 32];
        let public_key = handler.compute_public_key(&private_key).unwrap();
        let hash = Hash::of(&[seed, seed.wrapping_mul(3)]);
        let sig = handler.sign(hash.as_bytes(), &private_key).unwrap();
        assert!(handler.verify(hash.as_bytes(), &sig, &public_key).unwrap());
    }
}

#[test]
fn different_hash_verifies_false() {
    let handler = handler();
    let pair = ECKeyPair::generate();
    let sig = handler
        .sign(Hash::of(b"a").as_bytes(), pair.private_key())
        .unwrap();
    let ok = handler
        .verify(Hash::of(b"b").as_bytes(), &sig, pair.public_key())
        .unwrap();
    assert!(!ok);
}

#[test]
fn mismatched_public_key_verifies_false() {
    let handler = handler();
    let signer = ECKeyPair::generate();
    let other = ECKeyPair::generate();
    let hash = Hash::of(b"payload");
    let sig = signer.sign(&hash).unwrap();
    assert_eq!(
        handler.verify(hash.as_bytes(), &sig, other.public_key()),
        Ok(false)
    );
}

#[test]
fn uncompressed_public_key_is_accepted() {
    let handler = handler();
    // Uncompressed encoding of the generator point (private key 1).
    let generator = hex::decode(concat!(
        "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
        "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
    ))
    .unwrap();
    let mut one = [0u8; 32];
    one[31] = 1;
    let hash = Hash::of(b"generator");
    let sig = handler.sign(hash.as_bytes(), &one).unwrap();
    assert!(handler.verify(hash.as_bytes(), &sig, &generator).unwrap());
}

#[test]
fn structurally_invalid_public_key_is_an_error() {
    let handler = handler();
    let pair = ECKeyPair::generate();
    let hash = Hash::of(b"x");
    let sig = pair.sign(&hash).unwrap();

    let short = &pair.public_key()[..20];
    assert!(matches!(
        handler.verify(hash.as_bytes(), &sig, short),
        Err(CryptoError::InvalidInput(_))
    ));

    // x coordinate above the field modulus.
    let mut off_curve = [0xffu8; 33];
    off_curve[0] = 0x02;
    assert!(matches!(
        handler.verify(hash.as_bytes(), &sig, &off_curve),
        Err(CryptoError::InvalidInput(_))
    ));
}

#[test]
fn zero_signature_component_is_an_error() {
    let handler = handler();
    let pair = ECKeyPair::generate();
    let hash = Hash::of(b"x");
    let sig = ECSignature::new([0u8; 32], [1u8; 32]);
    assert!(matches!(
        handler.verify(hash.as_bytes(), &sig, pair.public_key()),
        Err(CryptoError::InvalidInput(_))
    ));
}

#[test]
fn wrong_width_hash_is_an_error() {
    let handler = handler();
    let pair = ECKeyPair::generate();
    assert!(matches!(
        handler.sign(&[1u8; 20], pair.private_key()),
        Err(CryptoError::InvalidInput(_))
    ));
}

#[test]
fn high_s_form_still_verifies() {
    let handler = handler();
    let pair = ECKeyPair::generate();
    let hash = Hash::of(b"malleable");
    let sig = pair.sign(&hash).unwrap();

    // s' = n - s
    let order: [u8; 32] = hex::decode(
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
    )
    .unwrap()
    .try_into()
    .unwrap();
    let mut high_s = [0u8; 32];
    let mut borrow = 0i16;
    for i in (0..32).rev() {
        let mut diff = order[i] as i16 - sig.s()[i] as i16 - borrow;
        borrow = 0;
        if diff < 0 {
            diff += 256;
            borrow = 1;
        }
        high_s[i] = diff as u8;
    }
    let flipped = ECSignature::new(*sig.r(), high_s);
    assert!(handler
        .verify(hash.as_bytes(), &flipped, pair.public_key())
        .unwrap());
}

#[test]
fn der_round_trip_preserves_components() {
    let pair = ECKeyPair::generate();
    let sig = pair.sign(&Hash::of(b"der")).unwrap();
    let der = sig.to_der().unwrap();
    assert_eq!(der[0], 0x30);
    assert_eq!(ECSignature::from_der(&der).unwrap(), sig);
    assert!(ECSignature::from_der(&der[1..]).is_err());
}

#[test]
fn signature_serializes_as_hex_components() {
    let sig = ECSignature::new([0x11; 32], [0x22; 32]);
    let json = serde_json::to_value(sig).unwrap();
    assert_eq!(json["r"], hex::encode([0x11u8; 32]));
    assert_eq!(json["s"], hex::encode([0x22u8; 32]));
    let back: ECSignature = serde_json::from_value(json).unwrap();
    assert_eq!(back, sig);
}

#[test]
fn concurrent_sign_and_verify() {
    let handler = Arc::new(handler());
    let workers: Vec<_> = (0..8u8)
        .map(|worker| {
            let handler = Arc::clone(&handler);
            thread::spawn(move || {
                let private_key = [worker + 1; 32];
                let public_key = handler.compute_public_key(&private_key).unwrap();
                for round in 0..32u8 {
                    let hash = Hash::of(&[worker, round]);
                    let sig = handler.sign(hash.as_bytes(), &private_key).unwrap();
                    assert!(handler.verify(hash.as_bytes(), &sig, &public_key).unwrap());
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
}
