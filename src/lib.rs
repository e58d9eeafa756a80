//! Pure Rust implementation of the zkDilithium signature scheme.
//!
//! zkDilithium is Dilithium2 retargeted for zero-knowledge proofs of
//! signature possession: the field is the STARK-friendly prime
//! Q = 2^23 - 2^20 + 1, and the Fiat-Shamir challenge is derived with the
//! Poseidon permutation instead of SHAKE, so a proof of "I hold a valid
//! signature" never needs to arithmetize a bit-oriented hash. Key
//! generation, signing, and verification are deterministic in their inputs
//! and byte-exact against the reference implementation, which is what lets
//! an independent prover re-derive the signing transcript.

#![warn(missing_docs, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod algebra;
pub mod crypto;
pub mod encode;
pub mod grain;
pub mod ntt;
pub mod param;
pub mod poseidon;
pub mod sampling;
pub mod util;

pub use crate::param::{SEED_SIZE, SIGNATURE_SIZE, SIGNING_KEY_SIZE, VERIFYING_KEY_SIZE};
pub use signature::{self, Error};

use crate::algebra::{Elem, NttMatrix, NttVector, Polynomial, Vector};
use crate::crypto::{hash256, Hash256};
use crate::encode::{
    bytes_to_fes, pack_fes, pack_poly, pack_poly_le_gamma1, pack_poly_leq_eta, unpack_fes,
    unpack_poly, unpack_poly_le_gamma1, unpack_poly_leq_eta,
};
use crate::ntt::{Ntt, NttInverse};
use crate::param::{
    BETA, C_SIZE, GAMMA1, GAMMA2, K, L, MU_SIZE, N, POLY_LEQ_ETA_SIZE, POLY_LE_GAMMA1_SIZE,
    POLY_PACKED_SIZE,
};
use crate::poseidon::Poseidon;
use crate::sampling::{expand_a, expand_mask, expand_s, sample_in_ball};
use crate::util::{B32, B64};
use core::fmt;
use signature::{Signer, Verifier};

// ============================================================================
// Fiat-Shamir helpers
// ============================================================================

/// The message representative mu: a Poseidon digest of `tr` and the
/// message, domain-separated by a leading zero element and a forced
/// permutation between the two absorptions.
fn message_digest(tr: &B32, msg: &[u8]) -> [Elem; MU_SIZE] {
    let mut h = Poseidon::new(&[Elem::ZERO]);
    h.absorb(&bytes_to_fes(tr));
    h.permute_pending();
    h.absorb(&bytes_to_fes(msg));
    h.squeeze_new()
}

/// The challenge digest c~: a Poseidon digest of mu and the commitment
/// w1, absorbed coefficient-major (coefficient index outer, row inner).
/// This ordering is observable; changing it changes every signature.
fn commitment_digest(mu: &[Elem; MU_SIZE], w1: &Vector) -> [Elem; C_SIZE] {
    let mut h = Poseidon::new(&[]);
    h.absorb(mu);
    for j in 0..N {
        for row in &w1.0 {
            h.absorb(&[row.0[j]]);
        }
    }
    h.squeeze_new()
}

/// Expand c~ into the challenge polynomial via SampleInBall, under the
/// domain tag 2. `None` means the transcript was rejected and the caller
/// must retry with a fresh commitment.
fn derive_challenge(c_tilde: &[Elem; C_SIZE]) -> Option<Polynomial> {
    let mut sponge = Poseidon::new(&[Elem::new(2)]);
    sponge.absorb(c_tilde);
    sample_in_ball(&mut sponge)
}

fn encode_verifying_key(rho: &B32, t: &Vector) -> [u8; VERIFYING_KEY_SIZE] {
    let mut out = [0u8; VERIFYING_KEY_SIZE];
    out[..32].copy_from_slice(rho);
    for (chunk, row) in out[32..].chunks_exact_mut(POLY_PACKED_SIZE).zip(&t.0) {
        chunk.copy_from_slice(&pack_poly(row));
    }
    out
}

// ============================================================================
// Signature
// ============================================================================

/// A zkDilithium signature: the challenge digest c~ and the response
/// vector z.
///
/// A value of this type always satisfies the z norm bound; [`Self::decode`]
/// rejects byte strings that do not.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Signature {
    c_tilde: [Elem; C_SIZE],
    z: Vector,
}

impl Signature {
    /// Encode into the fixed 2340-byte wire format: packed c~ followed by
    /// the gamma1-packed rows of z.
    pub fn encode(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        pack_fes(&self.c_tilde, &mut out[..3 * C_SIZE]);
        for (chunk, row) in out[3 * C_SIZE..]
            .chunks_exact_mut(POLY_LE_GAMMA1_SIZE)
            .zip(&self.z.0)
        {
            chunk.copy_from_slice(&pack_poly_le_gamma1(row));
        }
        out
    }

    /// Decode from the wire format. Returns `None` when the z norm bound
    /// is violated.
    pub fn decode(enc: &[u8; SIGNATURE_SIZE]) -> Option<Self> {
        let mut c_tilde = [Elem::ZERO; C_SIZE];
        unpack_fes(&enc[..3 * C_SIZE], &mut c_tilde);

        let mut z = Vector::default();
        for (chunk, row) in enc[3 * C_SIZE..]
            .chunks_exact(POLY_LE_GAMMA1_SIZE)
            .zip(z.0.iter_mut())
        {
            let chunk: &[u8; POLY_LE_GAMMA1_SIZE] =
                chunk.try_into().expect("chunks are 576 bytes");
            *row = unpack_poly_le_gamma1(chunk);
        }

        if z.infinity_norm() >= GAMMA1 - BETA {
            return None;
        }

        Some(Self { c_tilde, z })
    }
}

impl<'a> TryFrom<&'a [u8]> for Signature {
    type Error = Error;

    fn try_from(value: &'a [u8]) -> Result<Self, Error> {
        let enc: &[u8; SIGNATURE_SIZE] = value.try_into().map_err(|_| Error::new())?;
        Self::decode(enc).ok_or_else(Error::new)
    }
}

impl TryFrom<Signature> for [u8; SIGNATURE_SIZE] {
    type Error = Error;

    fn try_from(sig: Signature) -> Result<Self, Error> {
        Ok(sig.encode())
    }
}

impl signature::SignatureEncoding for Signature {
    type Repr = [u8; SIGNATURE_SIZE];
}

// ============================================================================
// KeyPair
// ============================================================================

/// A zkDilithium key pair, retaining the seed it was expanded from.
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    seed: B32,
}

impl KeyPair {
    /// Deterministically expand a key pair from a 32-byte seed.
    ///
    /// The seed is stretched with SHAKE-256 into rho (matrix seed), rho'
    /// (secret seed), and the signing randomizer key; then
    /// `t = InvNTT(A * NTT(s1)) + s2` binds the public key.
    pub fn from_seed(seed: &B32) -> Self {
        let mut h = Hash256::new();
        h.absorb(seed);
        let mut expanded = h.finalize();
        let rho: B32 = expanded.read();
        let rho2: B64 = expanded.read();
        let key: B32 = expanded.read();

        let a_hat = expand_a(&rho);
        let (s1, s2) = expand_s(&rho2);
        let t = &(&a_hat * &s1.ntt()).ntt_inverse() + &s2;

        let verifying_key = VerifyingKey::new(rho, t.clone(), Some(a_hat.clone()), None);
        let tr = verifying_key.tr;
        let signing_key = SigningKey::assemble(rho, key, tr, s1, s2, t, Some(a_hat));

        KeyPair {
            signing_key,
            verifying_key,
            seed: *seed,
        }
    }

    /// Generate a key pair from the provided RNG.
    #[cfg(feature = "rand_core")]
    pub fn generate<R: rand_core::CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut seed = [0u8; SEED_SIZE];
        rng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    /// The signing key of the key pair.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// The verifying key of the key pair.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// The 32-byte seed this key pair expands from.
    pub fn to_seed(&self) -> B32 {
        self.seed
    }
}

impl AsRef<VerifyingKey> for KeyPair {
    fn as_ref(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive()
    }
}

impl signature::KeypairRef for KeyPair {
    type VerifyingKey = VerifyingKey;
}

impl Signer<Signature> for KeyPair {
    fn try_sign(&self, msg: &[u8]) -> Result<Signature, Error> {
        self.signing_key.try_sign(msg)
    }
}

// ============================================================================
// SigningKey
// ============================================================================

/// A zkDilithium signing key.
#[derive(Clone, PartialEq)]
pub struct SigningKey {
    rho: B32,
    key: B32,
    tr: B32,
    s1: Vector,
    s2: Vector,
    t: Vector,

    // Derived values
    s1_hat: NttVector,
    s2_hat: NttVector,
    a_hat: NttMatrix,
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

impl SigningKey {
    fn assemble(
        rho: B32,
        key: B32,
        tr: B32,
        s1: Vector,
        s2: Vector,
        t: Vector,
        a_hat: Option<NttMatrix>,
    ) -> Self {
        let a_hat = a_hat.unwrap_or_else(|| expand_a(&rho));
        let s1_hat = s1.ntt();
        let s2_hat = s2.ntt();

        Self {
            rho,
            key,
            tr,
            s1,
            s2,
            t,
            s1_hat,
            s2_hat,
            a_hat,
        }
    }

    /// Deterministically derive the signing key of `KeyPair::from_seed`.
    pub fn from_seed(seed: &B32) -> Self {
        KeyPair::from_seed(seed).signing_key
    }

    /// Sign a message.
    ///
    /// Signing is deterministic: the masking vector is expanded from a
    /// private seed bound to (key, tr, msg), and rejection sampling walks
    /// the nonce forward until the response passes both norm gates and the
    /// challenge transcript is accepted. The same key and message always
    /// produce the same 2340-byte signature.
    pub fn sign(&self, msg: &[u8]) -> Signature {
        let mu = message_digest(&self.tr, msg);

        // rho2 = H(key || H(tr || msg)): the deterministic mask seed.
        let inner: B64 = hash256(&[&self.tr, msg]);
        let rho2: B64 = hash256(&[&self.key, &inner]);

        for nonce in (0..u16::MAX).step_by(L) {
            let y = expand_mask(&rho2, nonce);
            let w = (&self.a_hat * &y.ntt()).ntt_inverse();
            let w1 = w.high_bits();

            let c_tilde = commitment_digest(&mu, &w1);
            let Some(c) = derive_challenge(&c_tilde) else {
                continue;
            };
            let c_hat = c.ntt();

            let cs2 = (&c_hat * &self.s2_hat).ntt_inverse();
            let r0 = (&w - &cs2).low_bits();
            if r0.infinity_norm() >= GAMMA2 - BETA {
                continue;
            }

            let cs1 = (&c_hat * &self.s1_hat).ntt_inverse();
            let z = &y + &cs1;
            if z.infinity_norm() >= GAMMA1 - BETA {
                continue;
            }

            return Signature { c_tilde, z };
        }

        unreachable!("rejection sampling failed to produce a signature");
    }

    /// Derive the matching verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey::new(self.rho, self.t.clone(), Some(self.a_hat.clone()), None)
    }

    /// Encode into the fixed 3936-byte format:
    /// `rho || key || tr || s1 || s2 || t`.
    pub fn encode(&self) -> [u8; SIGNING_KEY_SIZE] {
        let mut out = [0u8; SIGNING_KEY_SIZE];
        out[..32].copy_from_slice(&self.rho);
        out[32..64].copy_from_slice(&self.key);
        out[64..96].copy_from_slice(&self.tr);

        let s1_end = 96 + L * POLY_LEQ_ETA_SIZE;
        for (chunk, row) in out[96..s1_end]
            .chunks_exact_mut(POLY_LEQ_ETA_SIZE)
            .zip(&self.s1.0)
        {
            chunk.copy_from_slice(&pack_poly_leq_eta(row));
        }

        let s2_end = s1_end + K * POLY_LEQ_ETA_SIZE;
        for (chunk, row) in out[s1_end..s2_end]
            .chunks_exact_mut(POLY_LEQ_ETA_SIZE)
            .zip(&self.s2.0)
        {
            chunk.copy_from_slice(&pack_poly_leq_eta(row));
        }

        for (chunk, row) in out[s2_end..]
            .chunks_exact_mut(POLY_PACKED_SIZE)
            .zip(&self.t.0)
        {
            chunk.copy_from_slice(&pack_poly(row));
        }
        out
    }

    /// Decode from the fixed 3936-byte format, re-deriving the matrix A
    /// and the NTT images of the secrets.
    pub fn decode(enc: &[u8; SIGNING_KEY_SIZE]) -> Self {
        let rho: B32 = enc[..32].try_into().expect("slice is 32 bytes");
        let key: B32 = enc[32..64].try_into().expect("slice is 32 bytes");
        let tr: B32 = enc[64..96].try_into().expect("slice is 32 bytes");

        let s1_end = 96 + L * POLY_LEQ_ETA_SIZE;
        let s2_end = s1_end + K * POLY_LEQ_ETA_SIZE;

        let mut s1 = Vector::default();
        for (chunk, row) in enc[96..s1_end]
            .chunks_exact(POLY_LEQ_ETA_SIZE)
            .zip(s1.0.iter_mut())
        {
            let chunk: &[u8; POLY_LEQ_ETA_SIZE] = chunk.try_into().expect("chunks are 96 bytes");
            *row = unpack_poly_leq_eta(chunk);
        }

        let mut s2 = Vector::default();
        for (chunk, row) in enc[s1_end..s2_end]
            .chunks_exact(POLY_LEQ_ETA_SIZE)
            .zip(s2.0.iter_mut())
        {
            let chunk: &[u8; POLY_LEQ_ETA_SIZE] = chunk.try_into().expect("chunks are 96 bytes");
            *row = unpack_poly_leq_eta(chunk);
        }

        let mut t = Vector::default();
        for (chunk, row) in enc[s2_end..]
            .chunks_exact(POLY_PACKED_SIZE)
            .zip(t.0.iter_mut())
        {
            let chunk: &[u8; POLY_PACKED_SIZE] = chunk.try_into().expect("chunks are 768 bytes");
            *row = unpack_poly(chunk);
        }

        Self::assemble(rho, key, tr, s1, s2, t, None)
    }
}

impl Signer<Signature> for SigningKey {
    fn try_sign(&self, msg: &[u8]) -> Result<Signature, Error> {
        Ok(self.sign(msg))
    }
}

impl signature::Keypair for SigningKey {
    type VerifyingKey = VerifyingKey;

    fn verifying_key(&self) -> VerifyingKey {
        SigningKey::verifying_key(self)
    }
}

// ============================================================================
// VerifyingKey
// ============================================================================

/// A zkDilithium verifying key.
#[derive(Clone, PartialEq, Debug)]
pub struct VerifyingKey {
    rho: B32,
    t: Vector,

    // Derived values
    a_hat: NttMatrix,
    t_hat: NttVector,
    tr: B32,
}

impl VerifyingKey {
    fn new(
        rho: B32,
        t: Vector,
        a_hat: Option<NttMatrix>,
        enc: Option<&[u8; VERIFYING_KEY_SIZE]>,
    ) -> Self {
        let a_hat = a_hat.unwrap_or_else(|| expand_a(&rho));
        let enc = match enc {
            Some(enc) => *enc,
            None => encode_verifying_key(&rho, &t),
        };

        let tr: B32 = hash256(&[&enc]);
        let t_hat = t.ntt();

        Self {
            rho,
            t,
            a_hat,
            t_hat,
            tr,
        }
    }

    /// Verify a signature over `msg`.
    ///
    /// Recomputes `w1 = HighBits(A*z - c*t)` and accepts exactly when the
    /// recomputed challenge digest matches c~.
    pub fn verify(&self, msg: &[u8], sig: &Signature) -> bool {
        let mu = message_digest(&self.tr, msg);
        let Some(c) = derive_challenge(&sig.c_tilde) else {
            return false;
        };

        let z_hat = sig.z.ntt();
        let c_hat = c.ntt();
        let az = &self.a_hat * &z_hat;

        let mut w1 = Vector::default();
        for i in 0..K {
            let tc = &self.t_hat.0[i] * &c_hat;
            w1.0[i] = (&az.0[i] - &tc).ntt_inverse().high_bits();
        }

        commitment_digest(&mu, &w1) == sig.c_tilde
    }

    /// Verify a signature in wire format. Any shape violation (wrong
    /// length, z norm out of range) yields `false`.
    pub fn verify_bytes(&self, msg: &[u8], sig: &[u8]) -> bool {
        let Ok(enc) = <&[u8; SIGNATURE_SIZE]>::try_from(sig) else {
            return false;
        };
        match Signature::decode(enc) {
            Some(sig) => self.verify(msg, &sig),
            None => false,
        }
    }

    /// Encode into the fixed 3104-byte format: `rho || t`.
    pub fn encode(&self) -> [u8; VERIFYING_KEY_SIZE] {
        encode_verifying_key(&self.rho, &self.t)
    }

    /// Decode from the fixed 3104-byte format.
    pub fn decode(enc: &[u8; VERIFYING_KEY_SIZE]) -> Self {
        let rho: B32 = enc[..32].try_into().expect("slice is 32 bytes");
        let mut t = Vector::default();
        for (chunk, row) in enc[32..]
            .chunks_exact(POLY_PACKED_SIZE)
            .zip(t.0.iter_mut())
        {
            let chunk: &[u8; POLY_PACKED_SIZE] = chunk.try_into().expect("chunks are 768 bytes");
            *row = unpack_poly(chunk);
        }
        Self::new(rho, t, None, Some(enc))
    }
}

impl Verifier<Signature> for VerifyingKey {
    fn verify(&self, msg: &[u8], signature: &Signature) -> Result<(), Error> {
        VerifyingKey::verify(self, msg, signature)
            .then_some(())
            .ok_or_else(Error::new)
    }
}

// ============================================================================
// Tests
// ============================================================================
