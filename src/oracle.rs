//! Component: the hash and extendable-output functions the IND-CCA
//! transform binds ciphertexts to (spec §4.6, §11). Grounded in the
//! teacher's `helpers.rs`, which reaches for the same `sha3` crate
//! primitives (`Sha3_256`/`Sha3_512`, `Shake128`/`Shake256`) through small
//! free functions; here they sit behind two traits instead, because (unlike
//! the teacher's fixed ML-KEM hash suite) each security level pairs a
//! different digest/XOF construction, matching `original_source`'s
//! `hash.py`.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_384, Sha3_512, Shake128, Shake256};

use crate::params::SecurityLevel;

/// A fixed-output hash function bound to a ciphertext's verifier tag (spec
/// §4.6 steps 2 and 8).
pub trait Hasher {
    /// Output length in bytes.
    fn digest_size(&self) -> usize;
    /// `H(data)`.
    fn hash(&self, data: &[u8]) -> Vec<u8>;
}

/// An extendable-output function used as a keystream generator, keyed by
/// the injected error (spec §4.6 steps 3 and 9).
pub trait Xof {
    /// `XOF(data)`, squeezed to exactly `len` bytes.
    fn squeeze(&self, data: &[u8], len: usize) -> Vec<u8>;
}

/// The hash construction for one security level: SHA3-256 at 128-bit,
/// SHA3-384 at 192-bit, SHA3-512 at 256-bit (`hash.py`'s `SHA3` table).
#[derive(Clone, Copy, Debug)]
pub struct Sha3Hasher(pub SecurityLevel);

impl Hasher for Sha3Hasher {
    fn digest_size(&self) -> usize {
        match self.0 {
            SecurityLevel::L128 => 32,
            SecurityLevel::L192 => 48,
            SecurityLevel::L256 => 64,
        }
    }

    fn hash(&self, data: &[u8]) -> Vec<u8> {
        match self.0 {
            SecurityLevel::L128 => Sha3_256::digest(data).to_vec(),
            SecurityLevel::L192 => Sha3_384::digest(data).to_vec(),
            SecurityLevel::L256 => Sha3_512::digest(data).to_vec(),
        }
    }
}

/// The XOF construction for one security level: SHAKE128 at 128-bit,
/// SHAKE256 at 192-bit and 256-bit (`hash.py`'s `SHAKE` table).
#[derive(Clone, Copy, Debug)]
pub struct ShakeXof(pub SecurityLevel);

impl Xof for ShakeXof {
    fn squeeze(&self, data: &[u8], len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        match self.0 {
            SecurityLevel::L128 => {
                let mut hasher = Shake128::default();
                hasher.update(data);
                hasher.finalize_xof().read(&mut out);
            }
            SecurityLevel::L192 | SecurityLevel::L256 => {
                let mut hasher = Shake256::default();
                hasher.update(data);
                hasher.finalize_xof().read(&mut out);
            }
        }
        out
    }
}
