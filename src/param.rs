//! The zkDilithium parameter set.
//!
//! There is exactly one instance of this scheme: Dilithium2 re-parameterized
//! for the STARK-friendly prime Q = 2^23 - 2^20 + 1 with Poseidon-based
//! Fiat-Shamir. All parameters are therefore plain constants rather than a
//! type-level parameter set.

/// The prime modulus Q = 2^23 - 2^20 + 1.
pub const Q: u32 = 7_340_033;

/// Polynomial degree; the ring is `Z_Q[x]/(x^256 + 1)`.
pub const N: usize = 256;

/// A 512th primitive root of unity in `Z_Q`, computed as 3^((Q-1)/512) mod Q.
pub const ZETA: u32 = 3_483_618;

/// The modular inverse of [`ZETA`].
pub const INV_ZETA: u32 = 3_141_965;

/// The modular inverse of 2: (Q+1)/2.
pub const INV2: u32 = 3_670_017;

/// Number of rows in the public matrix A.
pub const K: usize = 4;

/// Number of columns in the public matrix A.
pub const L: usize = 4;

/// Bound on the secret key coefficients.
pub const ETA: u32 = 2;

/// Number of non-zero coefficients in the challenge polynomial.
pub const TAU: usize = 40;

/// Rejection bound slack: `TAU * ETA`.
pub const BETA: u32 = 80;

/// Bound on the masking vector coefficients: 2^17.
pub const GAMMA1: u32 = 1 << 17;

/// Low-order rounding range: (Q-1)/112.
pub const GAMMA2: u32 = 65_536;

/// Poseidon state width.
pub const POS_T: usize = 35;

/// Poseidon sponge rate (capacity is `POS_T - POS_RATE` = 11).
pub const POS_RATE: usize = 24;

/// Number of full Poseidon rounds.
pub const POS_RF: usize = 21;

/// Swaps performed per permutation inside SampleInBall.
pub const POS_CYCLE_LEN: usize = 8;

/// Field elements in the challenge digest c~.
pub const C_SIZE: usize = 12;

/// Field elements in the message representative mu.
pub const MU_SIZE: usize = 24;

/// Length of a key-generation seed in bytes.
pub const SEED_SIZE: usize = 32;

/// Bytes in a plainly packed polynomial (3 bytes per coefficient).
pub const POLY_PACKED_SIZE: usize = 3 * N;

/// Bytes in an eta-range packed polynomial (3 bits per coefficient).
pub const POLY_LEQ_ETA_SIZE: usize = 96;

/// Bytes in a gamma1-range packed polynomial (18 bits per coefficient).
pub const POLY_LE_GAMMA1_SIZE: usize = 576;

/// Encoded verifying key length: rho (32) plus packed t (K * 768).
pub const VERIFYING_KEY_SIZE: usize = 32 + K * POLY_PACKED_SIZE;

/// Encoded signing key length:
/// rho (32), key (32), tr (32), s1 (L * 96), s2 (K * 96), t (K * 768).
pub const SIGNING_KEY_SIZE: usize =
    32 + 32 + 32 + L * POLY_LEQ_ETA_SIZE + K * POLY_LEQ_ETA_SIZE + K * POLY_PACKED_SIZE;

/// Encoded signature length: c~ (12 * 3) plus z (L * 576).
pub const SIGNATURE_SIZE: usize = C_SIZE * 3 + L * POLY_LE_GAMMA1_SIZE;
