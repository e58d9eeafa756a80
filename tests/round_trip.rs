//! Key generation and sign/verify round-trip tests.

use zkdilithium::{KeyPair, Signature, SigningKey, VerifyingKey};

// ============================================================================
// Key generation round trips
// ============================================================================

#[test]
fn seed_determinism() {
    let seed = [42u8; 32];
    let kp1 = KeyPair::from_seed(&seed);
    let kp2 = KeyPair::from_seed(&seed);

    assert_eq!(kp1.signing_key().encode(), kp2.signing_key().encode());
    assert_eq!(kp1.verifying_key().encode(), kp2.verifying_key().encode());
}

#[test]
fn different_seeds_different_keys() {
    let kp1 = KeyPair::from_seed(&[1u8; 32]);
    let kp2 = KeyPair::from_seed(&[2u8; 32]);

    assert_ne!(kp1.verifying_key().encode(), kp2.verifying_key().encode());
    assert_ne!(kp1.signing_key().encode(), kp2.signing_key().encode());
}

#[test]
fn seed_round_trip() {
    let seed = [99u8; 32];
    let kp = KeyPair::from_seed(&seed);
    assert_eq!(kp.to_seed(), seed);
}

#[test]
fn verifying_key_encode_decode() {
    let kp = KeyPair::from_seed(&[0u8; 32]);
    let vk = kp.verifying_key();
    let decoded = VerifyingKey::decode(&vk.encode());
    assert_eq!(*vk, decoded);
}

#[test]
fn signing_key_encode_decode() {
    let kp = KeyPair::from_seed(&[0u8; 32]);
    let sk = kp.signing_key();
    let decoded = SigningKey::decode(&sk.encode());
    assert_eq!(*sk, decoded);
}

#[test]
fn derived_verifying_key_matches() {
    let kp = KeyPair::from_seed(&[77u8; 32]);
    let derived = kp.signing_key().verifying_key();
    assert_eq!(kp.verifying_key().encode(), derived.encode());
}

#[cfg(feature = "rand_core")]
#[test]
fn random_keygen_is_internally_consistent() {
    let mut rng = rand::rng();
    let kp = KeyPair::generate(&mut rng);

    let derived = kp.signing_key().verifying_key();
    assert_eq!(kp.verifying_key().encode(), derived.encode());

    let kp2 = KeyPair::from_seed(&kp.to_seed());
    assert_eq!(kp.verifying_key().encode(), kp2.verifying_key().encode());
}

// ============================================================================
// Sign/verify round trips
// ============================================================================

#[test]
fn sign_verify() {
    let kp = KeyPair::from_seed(&[0u8; 32]);
    let msg = b"Hello, zkDilithium!";
    let sig = kp.signing_key().sign(msg);
    assert!(kp.verifying_key().verify(msg, &sig));
}

#[test]
fn empty_message() {
    let kp = KeyPair::from_seed(&[2u8; 32]);
    let sig = kp.signing_key().sign(b"");
    assert!(kp.verifying_key().verify(b"", &sig));
}

#[test]
fn large_message() {
    let kp = KeyPair::from_seed(&[3u8; 32]);
    let msg = vec![0xABu8; 100_000];
    let sig = kp.signing_key().sign(&msg);
    assert!(kp.verifying_key().verify(&msg, &sig));
}

#[test]
fn odd_length_message() {
    // Message lengths that are not a multiple of two exercise the padding
    // inside the byte-to-field-element embedding.
    let kp = KeyPair::from_seed(&[4u8; 32]);
    for msg in [&b"h"[..], b"odd", b"quint"] {
        let sig = kp.signing_key().sign(msg);
        assert!(kp.verifying_key().verify(msg, &sig));
    }
}

#[test]
fn message_and_padded_message_differ() {
    // b"h" and b"h\0" must hash to different transcripts.
    let kp = KeyPair::from_seed(&[5u8; 32]);
    let sig = kp.signing_key().sign(b"h");
    assert!(!kp.verifying_key().verify(b"h\0", &sig));
}

#[test]
fn signature_encode_decode_round_trip() {
    let kp = KeyPair::from_seed(&[6u8; 32]);
    let msg = b"encode test";
    let sig = kp.signing_key().sign(msg);
    let decoded = Signature::decode(&sig.encode()).unwrap();
    assert_eq!(sig, decoded);
    assert!(kp.verifying_key().verify(msg, &decoded));
}

#[test]
fn signature_try_from_bytes() {
    let kp = KeyPair::from_seed(&[7u8; 32]);
    let msg = b"try_from test";
    let sig = kp.signing_key().sign(msg);
    let encoded = sig.encode();
    let decoded = Signature::try_from(encoded.as_slice()).unwrap();
    assert_eq!(sig, decoded);
}

#[test]
fn deterministic_signing_produces_same_signature() {
    let kp = KeyPair::from_seed(&[8u8; 32]);
    let sig1 = kp.signing_key().sign(b"deterministic");
    let sig2 = kp.signing_key().sign(b"deterministic");
    assert_eq!(sig1.encode(), sig2.encode());
}

#[test]
fn distinct_messages_distinct_signatures() {
    let kp = KeyPair::from_seed(&[9u8; 32]);
    let sig1 = kp.signing_key().sign(b"first");
    let sig2 = kp.signing_key().sign(b"second");
    assert_ne!(sig1.encode(), sig2.encode());
}
