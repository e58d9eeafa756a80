//! Bit-exact byte encodings for keys, signatures, and hashing.
//!
//! Three packings, all little-endian:
//! - 3 bytes per field element (public t, the challenge digest c~)
//! - 3 bits per coefficient for the eta range (secret vectors)
//! - 18 bits per coefficient for the gamma1 range (masking vector z)
//!
//! plus the byte-to-field-element embedding used before Poseidon hashing.

use crate::algebra::{Elem, Polynomial};
use crate::param::{ETA, GAMMA1, POLY_LEQ_ETA_SIZE, POLY_LE_GAMMA1_SIZE, POLY_PACKED_SIZE, Q};

/// Pack field elements at 3 bytes each into `out`.
///
/// # Panics
///
/// Panics if `out` is not exactly `3 * fes.len()` bytes.
pub fn pack_fes(fes: &[Elem], out: &mut [u8]) {
    assert_eq!(out.len(), 3 * fes.len());
    for (chunk, fe) in out.chunks_exact_mut(3).zip(fes) {
        chunk[0] = fe.0 as u8;
        chunk[1] = (fe.0 >> 8) as u8;
        chunk[2] = (fe.0 >> 16) as u8;
    }
}

/// Unpack 3-byte groups into field elements, reducing each modulo Q.
///
/// # Panics
///
/// Panics if `bs` is not exactly `3 * out.len()` bytes.
pub fn unpack_fes(bs: &[u8], out: &mut [Elem]) {
    assert_eq!(bs.len(), 3 * out.len());
    for (chunk, fe) in bs.chunks_exact(3).zip(out) {
        let v =
            u32::from(chunk[0]) | u32::from(chunk[1]) << 8 | u32::from(chunk[2]) << 16;
        *fe = Elem::new(v % Q);
    }
}

/// Embed a byte string into field elements for Poseidon hashing.
///
/// Every byte is incremented, the sequence is zero-padded to even length,
/// and pairs are packed as `x + 257 * y`. The increment keeps the padding
/// distinguishable, so `b"h"` and `b"h\0"` map to different sequences.
pub fn bytes_to_fes(bs: &[u8]) -> Vec<Elem> {
    let mut modified: Vec<u32> = bs.iter().map(|&b| u32::from(b) + 1).collect();
    if modified.len() % 2 == 1 {
        modified.push(0);
    }

    modified
        .chunks_exact(2)
        .map(|pair| Elem::new(pair[0] + 257 * pair[1]))
        .collect()
}

/// Pack a polynomial at 3 bytes per coefficient.
pub fn pack_poly(p: &Polynomial) -> [u8; POLY_PACKED_SIZE] {
    let mut out = [0u8; POLY_PACKED_SIZE];
    pack_fes(&p.0, &mut out);
    out
}

/// Unpack a 3-byte-per-coefficient polynomial.
pub fn unpack_poly(bs: &[u8; POLY_PACKED_SIZE]) -> Polynomial {
    let mut p = Polynomial::default();
    unpack_fes(bs, &mut p.0);
    p
}

/// Pack a polynomial with coefficients in `[-ETA, ETA]` at 3 bits each.
///
/// Each coefficient is stored as `(ETA - c) mod Q`, a value in `[0, 2*ETA]`;
/// eight coefficients fill three bytes.
pub fn pack_poly_leq_eta(p: &Polynomial) -> [u8; POLY_LEQ_ETA_SIZE] {
    let mut out = [0u8; POLY_LEQ_ETA_SIZE];
    for (chunk, cs) in out.chunks_exact_mut(3).zip(p.0.chunks_exact(8)) {
        let c: [u32; 8] = core::array::from_fn(|i| (Elem::new(ETA) - cs[i]).0);
        chunk[0] = (c[0] | c[1] << 3 | c[2] << 6) as u8;
        chunk[1] = (c[2] >> 2 | c[3] << 1 | c[4] << 4 | c[5] << 7) as u8;
        chunk[2] = (c[5] >> 1 | c[6] << 2 | c[7] << 5) as u8;
    }
    out
}

/// Unpack a 3-bit-per-coefficient polynomial back to `[-ETA, ETA]` mod Q.
pub fn unpack_poly_leq_eta(bs: &[u8; POLY_LEQ_ETA_SIZE]) -> Polynomial {
    let mut p = Polynomial::default();
    for (chunk, cs) in bs.chunks_exact(3).zip(p.0.chunks_exact_mut(8)) {
        let raw = [
            chunk[0] & 7,
            (chunk[0] >> 3) & 7,
            (chunk[0] >> 6) | ((chunk[1] << 2) & 7),
            (chunk[1] >> 1) & 7,
            (chunk[1] >> 4) & 7,
            (chunk[1] >> 7) | ((chunk[2] << 1) & 7),
            (chunk[2] >> 2) & 7,
            (chunk[2] >> 5) & 7,
        ];
        for (c, r) in cs.iter_mut().zip(raw) {
            *c = Elem::from_signed(ETA as i32 - i32::from(r));
        }
    }
    p
}

/// Pack a polynomial with coefficients in `[-GAMMA1+1, GAMMA1]` at 18 bits
/// each.
///
/// Each coefficient is stored as `(GAMMA1 - c) mod Q`, a value in
/// `[0, 2*GAMMA1)`; four coefficients fill nine bytes.
pub fn pack_poly_le_gamma1(p: &Polynomial) -> [u8; POLY_LE_GAMMA1_SIZE] {
    let mut out = [0u8; POLY_LE_GAMMA1_SIZE];
    for (chunk, cs) in out.chunks_exact_mut(9).zip(p.0.chunks_exact(4)) {
        let c0 = (Elem::new(GAMMA1) - cs[0]).0;
        let c1 = (Elem::new(GAMMA1) - cs[1]).0;
        let c2 = (Elem::new(GAMMA1) - cs[2]).0;
        let c3 = (Elem::new(GAMMA1) - cs[3]).0;

        chunk[0] = c0 as u8;
        chunk[1] = (c0 >> 8) as u8;
        chunk[2] = (c0 >> 16 | c1 << 2) as u8;
        chunk[3] = (c1 >> 6) as u8;
        chunk[4] = (c1 >> 14 | c2 << 4) as u8;
        chunk[5] = (c2 >> 4) as u8;
        chunk[6] = (c2 >> 12 | c3 << 6) as u8;
        chunk[7] = (c3 >> 2) as u8;
        chunk[8] = (c3 >> 10) as u8;
    }
    out
}

/// Unpack an 18-bit-per-coefficient polynomial back to
/// `[-GAMMA1+1, GAMMA1]` mod Q.
pub fn unpack_poly_le_gamma1(bs: &[u8; POLY_LE_GAMMA1_SIZE]) -> Polynomial {
    let mut p = Polynomial::default();
    for (chunk, cs) in bs.chunks_exact(9).zip(p.0.chunks_exact_mut(4)) {
        let b: [u32; 9] = core::array::from_fn(|i| u32::from(chunk[i]));
        let c0 = b[0] | b[1] << 8 | (b[2] & 0x3) << 16;
        let c1 = b[2] >> 2 | b[3] << 6 | (b[4] & 0xF) << 14;
        let c2 = b[4] >> 4 | b[5] << 4 | (b[6] & 0x3F) << 12;
        let c3 = b[6] >> 6 | b[7] << 2 | b[8] << 10;

        for (c, raw) in cs.iter_mut().zip([c0, c1, c2, c3]) {
            *c = Elem::from_signed(GAMMA1 as i32 - raw as i32);
        }
    }
    p
}
