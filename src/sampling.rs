//! Rejection samplers for matrix, secret, mask, and challenge generation.
//!
//! The byte-driven samplers consume a SHAKE stream in 3-byte steps; the
//! challenge sampler is driven by Poseidon state words instead, so that a
//! STARK proof of the signature never needs to arithmetize SHAKE.

use crate::algebra::{Elem, NttMatrix, NttPolynomial, NttVector, Polynomial, Vector};
use crate::crypto::{Xof128, Xof256};
use crate::encode::unpack_poly_le_gamma1;
use crate::param::{L, N, POLY_LE_GAMMA1_SIZE, POS_CYCLE_LEN, Q, TAU};
use crate::poseidon::Poseidon;
use core::array;

/// Sample a uniform NTT-domain polynomial from an XOF stream.
///
/// Each 3-byte read is masked to 23 bits and rejected when it is not below
/// Q.
pub(crate) fn sample_uniform(xof: &mut Xof128) -> NttPolynomial {
    let mut cs = NttPolynomial::default();
    let mut i = 0;
    while i < N {
        let [b0, b1, b2] = xof.read3();
        let d = (u32::from(b0) | u32::from(b1) << 8 | u32::from(b2) << 16) & 0x7F_FFFF;
        if d < Q {
            cs.0[i] = Elem::new(d);
            i += 1;
        }
    }
    cs
}

/// Sample a polynomial with coefficients in `[-ETA, ETA]` from an XOF
/// stream.
///
/// Each byte yields two 4-bit candidates; values up to 14 are accepted as
/// `(2 - (d mod 5)) mod Q`. Leftover nibbles of the final read are
/// discarded.
pub(crate) fn sample_leq_eta(xof: &mut Xof256) -> Polynomial {
    let mut cs = Polynomial::default();
    let mut i = 0;
    while i < N {
        for b in xof.read3() {
            for d in [b & 15, b >> 4] {
                if d <= 14 && i < N {
                    cs.0[i] = Elem::from_signed(2 - i32::from(d % 5));
                    i += 1;
                }
            }
        }
    }
    cs
}

/// Expand the public matrix A from `rho`, row by row in the NTT domain.
///
/// Entry `(i, j)` uses SHAKE-128 keyed with nonce `256 * i + j`.
pub(crate) fn expand_a(rho: &[u8]) -> NttMatrix {
    NttMatrix(array::from_fn(|i| {
        NttVector(array::from_fn(|j| {
            let mut xof = Xof128::new(rho, (256 * i + j) as u16);
            sample_uniform(&mut xof)
        }))
    }))
}

/// Expand the secret vectors `(s1, s2)` from `rho2`.
///
/// s1 rows use SHAKE-256 nonces `0..L`; s2 rows continue at `L..L+K`.
pub(crate) fn expand_s(rho2: &[u8]) -> (Vector, Vector) {
    let s1 = Vector(array::from_fn(|i| {
        let mut xof = Xof256::new(rho2, i as u16);
        sample_leq_eta(&mut xof)
    }));
    let s2 = Vector(array::from_fn(|i| {
        let mut xof = Xof256::new(rho2, (L + i) as u16);
        sample_leq_eta(&mut xof)
    }));
    (s1, s2)
}

/// Expand the masking vector y for one signing attempt.
///
/// Row `i` decodes 576 squeezed bytes of SHAKE-256 keyed with
/// `nonce + i` into coefficients in `[-GAMMA1+1, GAMMA1]`.
pub(crate) fn expand_mask(rho2: &[u8], nonce: u16) -> Vector {
    Vector(array::from_fn(|i| {
        let mut xof = Xof256::new(rho2, nonce + i as u16);
        let mut buf = [0u8; POLY_LE_GAMMA1_SIZE];
        xof.read(&mut buf);
        unpack_poly_le_gamma1(&buf)
    }))
}

/// TAU rounded up to a whole number of swap cycles.
const N_TAU: usize = TAU.div_ceil(POS_CYCLE_LEN) * POS_CYCLE_LEN;

/// Permutations needed to place TAU coefficients.
const NUM_CYCLES: usize = TAU.div_ceil(POS_CYCLE_LEN);

/// Sample the challenge polynomial: exactly TAU coefficients set to +/-1,
/// placed by Fisher-Yates style swaps driven by Poseidon state words.
///
/// Each cycle permutes the sponge state and performs eight swaps. Signs
/// come from state word 8, read as a base-256 remainder; swap targets come
/// from state words 0..8 by division with the slot-dependent modulus. A
/// quotient landing in the final, truncated block of the divided range
/// would bias the draw, so the whole transcript is rejected (`None`) and
/// the caller retries with a fresh challenge.
pub(crate) fn sample_in_ball(h: &mut Poseidon) -> Option<Polynomial> {
    let mut c = Polynomial::default();

    for i in 0..NUM_CYCLES {
        h.permute_state();
        let state = *h.state();

        let signs_word = state[POS_CYCLE_LEN].0;
        let (quot, mut rem) = (signs_word >> 8, signs_word & 0xFF);
        if quot == Q >> 8 {
            return None;
        }
        let signs: [Elem; POS_CYCLE_LEN] = array::from_fn(|_| {
            let sign = if rem & 1 == 0 { Elem::ONE } else { Elem::MINUS_ONE };
            rem >>= 1;
            sign
        });

        for (j, sign) in signs.into_iter().enumerate() {
            let base = N - N_TAU + i * POS_CYCLE_LEN + j;
            let word = state[j].0;
            let divisor = base as u32 + 1;
            let (quot, swap) = (word / divisor, (word % divisor) as usize);
            if quot == Q / divisor {
                return None;
            }
            c.0[base] = c.0[swap];
            c.0[swap] = sign;
        }
    }

    Some(c)
}
