//! SHAKE-backed XOFs for seed expansion and rejection sampling.
//!
//! Every SHAKE use in this scheme keys the state completely before any
//! output is taken: the uniform and bounded samplers walk a nonce-keyed
//! stream in 3-byte steps, the mask sampler reads fixed 576-byte rows, and
//! the hashes absorb a known sequence of parts. The types here encode that
//! one-way flow. Keyed streams are born squeezing, and [`Hash256`] must be
//! consumed to obtain its output stream, so absorbing after squeezing is
//! unrepresentable instead of a runtime error.

use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake128, Shake128Reader, Shake256, Shake256Reader,
};

/// A SHAKE-128 stream keyed with `seed || nonce`, the nonce as two
/// little-endian bytes. Drives uniform sampling of the matrix A.
pub struct Xof128 {
    reader: Shake128Reader,
}

impl Xof128 {
    /// Key a stream for one matrix entry.
    pub fn new(seed: &[u8], nonce: u16) -> Self {
        let mut shake = Shake128::default();
        shake.update(seed);
        shake.update(&nonce.to_le_bytes());
        Self {
            reader: shake.finalize_xof(),
        }
    }

    /// The next 3 bytes of the stream: one candidate coefficient.
    pub fn read3(&mut self) -> [u8; 3] {
        let mut out = [0u8; 3];
        self.reader.read(&mut out);
        out
    }
}

/// A SHAKE-256 stream keyed like [`Xof128`]. Drives bounded sampling of
/// the secret vectors and range sampling of the masking vector.
pub struct Xof256 {
    reader: Shake256Reader,
}

impl Xof256 {
    /// Key a stream for one secret or mask row.
    pub fn new(seed: &[u8], nonce: u16) -> Self {
        let mut shake = Shake256::default();
        shake.update(seed);
        shake.update(&nonce.to_le_bytes());
        Self {
            reader: shake.finalize_xof(),
        }
    }

    /// The next 3 bytes of the stream: one candidate coefficient.
    pub fn read3(&mut self) -> [u8; 3] {
        let mut out = [0u8; 3];
        self.reader.read(&mut out);
        out
    }

    /// Fill `out` with the next bytes of the stream.
    pub fn read(&mut self, out: &mut [u8]) {
        self.reader.read(out);
    }
}

/// An incremental SHAKE-256 hash.
///
/// Absorb the message parts, then trade the hasher for a
/// [`Hash256Stream`] with [`Self::finalize`]. Used for seed expansion,
/// the public-key digest tr, and the deterministic mask seed.
#[derive(Default)]
pub struct Hash256 {
    state: Shake256,
}

impl Hash256 {
    /// An empty hash state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb input bytes.
    pub fn absorb(&mut self, input: &[u8]) {
        self.state.update(input);
    }

    /// Finish absorbing and start streaming output.
    pub fn finalize(self) -> Hash256Stream {
        Hash256Stream {
            reader: self.state.finalize_xof(),
        }
    }
}

/// The output side of a [`Hash256`].
pub struct Hash256Stream {
    reader: Shake256Reader,
}

impl Hash256Stream {
    /// Read a fixed-size block of output. Consecutive reads continue the
    /// stream, which is how one expanded seed yields rho, rho', and key.
    pub fn read<const M: usize>(&mut self) -> [u8; M] {
        let mut out = [0u8; M];
        self.reader.read(&mut out);
        out
    }
}

/// SHAKE-256 of the concatenation of `parts`.
pub fn hash256<const M: usize>(parts: &[&[u8]]) -> [u8; M] {
    let mut h = Hash256::new();
    for part in parts {
        h.absorb(part);
    }
    h.finalize().read()
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn xof128_keyed_stream_known_bytes() {
        let mut xof = Xof128::new(&[0u8; 32], 0);
        let mut out = [0u8; 9];
        for chunk in out.chunks_exact_mut(3) {
            chunk.copy_from_slice(&xof.read3());
        }
        assert_eq!(out, hex!("49dfd9809bbc54014a"));

        // The nonce keys a distinct stream per matrix entry.
        let mut xof = Xof128::new(&[0u8; 32], 259);
        let mut out = [0u8; 9];
        for chunk in out.chunks_exact_mut(3) {
            chunk.copy_from_slice(&xof.read3());
        }
        assert_eq!(out, hex!("ea90ea1f353ac783e8"));
    }

    #[test]
    fn xof256_keyed_stream_known_bytes() {
        let mut xof = Xof256::new(&[0u8; 64], 0);
        let mut out = [0u8; 9];
        for chunk in out.chunks_exact_mut(3) {
            chunk.copy_from_slice(&xof.read3());
        }
        assert_eq!(out, hex!("4c838207f7a3088bf0"));
    }

    #[test]
    fn nonce_is_encoded_little_endian() {
        // Nonce 0x0201 must absorb as the bytes 01 02.
        let mut x128 = Xof128::new(&[7u8; 32], 0x0201);
        assert_eq!(x128.read3(), hex!("0226a2"));

        let mut x256 = Xof256::new(&[7u8; 64], 0x0201);
        assert_eq!(x256.read3(), hex!("98a8fc"));
    }

    #[test]
    fn read3_continues_the_stream() {
        let mut bulk = Xof256::new(&[0u8; 64], 5);
        let mut whole = [0u8; 9];
        bulk.read(&mut whole);

        let mut stepped = Xof256::new(&[0u8; 64], 5);
        let mut pieces = [0u8; 9];
        for chunk in pieces.chunks_exact_mut(3) {
            chunk.copy_from_slice(&stepped.read3());
        }
        assert_eq!(whole, pieces);
    }

    #[test]
    fn hash256_known_vector() {
        assert_eq!(
            hash256::<32>(&[b"zkdilithium"]),
            hex!("18467170f5585ea580a01328d220b5bc5b88aa41d83aa2f692a091d180d63b55")
        );
    }

    #[test]
    fn hash256_absorbs_parts_as_concatenation() {
        let split: [u8; 32] = hash256(&[b"zk", b"dilithium"]);
        let whole: [u8; 32] = hash256(&[b"zkdilithium"]);
        assert_eq!(split, whole);
    }

    #[test]
    fn hash_stream_reads_are_consecutive() {
        let mut h = Hash256::new();
        h.absorb(b"stream");
        let mut stream = h.finalize();
        let first: [u8; 32] = stream.read();
        let second: [u8; 32] = stream.read();

        let joined: [u8; 64] = hash256(&[b"stream"]);
        assert_eq!(&joined[..32], &first);
        assert_eq!(&joined[32..], &second);
    }
}
