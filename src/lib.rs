#![deny(clippy::pedantic, missing_docs, unsafe_code)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]
#![deny(absolute_paths_not_starting_with_crate, box_pointers, dead_code)]
#![deny(elided_lifetimes_in_paths, explicit_outlives_requirements, keyword_idents)]
#![deny(let_underscore_drop, macro_use_extern_crate, meta_variable_misuse, missing_abi)]
#![deny(non_ascii_idents, rust_2021_incompatible_closure_captures)]
#![deny(rust_2021_incompatible_or_patterns, rust_2021_prefixes_incompatible_syntax)]
#![deny(rust_2021_prelude_collisions, single_use_lifetimes, trivial_casts)]
#![deny(trivial_numeric_casts, unreachable_pub, unsafe_op_in_unsafe_fn, unstable_features)]
#![deny(unused_extern_crates, unused_import_braces, unused_lifetimes, unused_macro_rules)]
#![doc = include_str!("../README.md")]

// Implements an IND-CCA secure public-key encryption scheme in the rank
// metric: the Shehhi-Bellini-Borba-Caullery-Manzano-Mateu hybrid transform
// over Loidreau's rank-metric trapdoor (a masked Gabidulin code).
//
// Component map, leaves first:
//
// Field arithmetic over F_{2^m}                 --> field.rs
// Fixed-width big-endian bit codec               --> codec.rs
// Dense linear algebra over F_{2^m}               --> linalg.rs
// Uniform matrix/vector samplers                 --> sampling.rs
// Gabidulin code construction and decoder         --> gabidulin.rs
// Hash/XOF oracle traits and SHA-3 instances      --> oracle.rs
// Secret/public key types, generation, ASN.1/PEM  --> keys.rs, der.rs, pem.rs
// Encrypt/decrypt transform                       --> cipher.rs
//
// The per-level convenience modules (`level_128`, `level_192`, `level_256`,
// below) bundle a `SecurityLevel` with its canonical hash/XOF pair, mirroring
// how the three parameter sets are exposed as separate modules with injected
// constants rather than one generic type carrying runtime parameters.

/// The `rand_core` types are re-exported so that users of this crate do not
/// have to worry about matching the exact version used internally.
pub use rand_core::{CryptoRng, Error as RngError, RngCore};

#[cfg(feature = "default-rng")]
pub use rand_core::OsRng;

pub mod cipher;
pub mod codec;
mod der;
pub mod error;
pub mod field;
pub mod gabidulin;
pub mod keys;
pub mod linalg;
pub mod oracle;
pub mod params;
mod pem;
pub mod sampling;

pub use error::{Error, Result};
pub use keys::{PublicKey, SecretKey};
pub use oracle::{Hasher, Sha3Hasher, ShakeXof, Xof};
pub use params::{Params, SecurityLevel};

/// Builds the canonical hash/XOF pair for a security level (spec §6):
/// SHA3-256 and SHAKE128 at 128-bit, SHA3-384 and SHAKE256 at 192-bit,
/// SHA3-512 and SHAKE256 at 256-bit.
#[must_use]
pub fn canonical_oracle(level: SecurityLevel) -> (Sha3Hasher, ShakeXof) {
    (Sha3Hasher(level), ShakeXof(level))
}

// This common functionality is injected into each per-level module, mirroring
// the teacher's `functionality!()` macro: one expansion site per recognized
// security level, rather than a single generic type parameterized at runtime.
macro_rules! level_module {
    ($name:ident, $level:expr) => {
        pub mod $name {
            //! Convenience bindings for this security level: key generation,
            //! encryption, and decryption pre-wired to the canonical hash/XOF
            //! pair (see [`crate::canonical_oracle`]), so callers do not have
            //! to construct a [`crate::Sha3Hasher`]/[`crate::ShakeXof`] pair
            //! by hand.

            use crate::keys::{PublicKey as GenericPublicKey, SecretKey as GenericSecretKey};
            use crate::oracle::{Sha3Hasher, ShakeXof};
            use crate::params::SecurityLevel;
            use crate::Result;
            use rand_core::{CryptoRng, RngCore};

            /// This module's fixed security level.
            pub const LEVEL: SecurityLevel = $level;

            /// Secret key type for this level (a type alias over the
            /// level-generic [`crate::SecretKey`]).
            pub type SecretKey = GenericSecretKey;
            /// Public key type for this level (a type alias over the
            /// level-generic [`crate::PublicKey`]).
            pub type PublicKey = GenericPublicKey;

            /// Plaintext length in bytes at this level, `⌊m·k/8⌋ - |H|`.
            #[must_use]
            pub fn plaintext_len() -> usize {
                LEVEL
                    .params()
                    .plaintext_len(Sha3Hasher(LEVEL).digest_size())
                    .expect("a recognized SecurityLevel always satisfies L_pt > 0")
            }

            /// Ciphertext length in bytes at this level, `⌊m·n/8⌋`.
            #[must_use]
            pub fn ciphertext_len() -> usize {
                LEVEL.params().ciphertext_len()
            }

            /// Generates a fresh key pair at this level (spec §4.5).
            pub fn generate(rng: &mut (impl RngCore + CryptoRng)) -> Result<(SecretKey, PublicKey)> {
                let sk = SecretKey::generate(LEVEL, rng)?;
                let pk = sk.public_key()?;
                Ok((sk, pk))
            }

            /// Encrypts `plaintext` (must be exactly [`plaintext_len`] bytes)
            /// under `pk` (spec §4.6 steps 1-7).
            pub fn encrypt(
                pk: &PublicKey, plaintext: &[u8], rng: &mut (impl RngCore + CryptoRng),
            ) -> Result<Vec<u8>> {
                crate::cipher::encrypt(pk, &Sha3Hasher(LEVEL), &ShakeXof(LEVEL), plaintext, rng)
            }

            /// Decrypts `ciphertext` (must be exactly [`ciphertext_len`]
            /// bytes) under `sk` (spec §4.6 steps 8-15).
            pub fn decrypt(sk: &SecretKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
                crate::cipher::decrypt(sk, &Sha3Hasher(LEVEL), &ShakeXof(LEVEL), ciphertext)
            }

            #[cfg(test)]
            mod tests {
                use super::*;
                use rand_chacha::ChaCha8Rng;
                use rand_core::SeedableRng;

                #[test]
                fn round_trips_a_handful_of_keys_and_messages() {
                    let mut rng = ChaCha8Rng::seed_from_u64(123);
                    for i in 0..5u8 {
                        let (sk, pk) = generate(&mut rng).unwrap();
                        let pt: Vec<u8> =
                            (0..plaintext_len()).map(|j| (j as u8).wrapping_mul(7).wrapping_add(i)).collect();
                        let ct = encrypt(&pk, &pt, &mut rng).unwrap();
                        assert_eq!(ct.len(), ciphertext_len());
                        let recovered = decrypt(&sk, &ct).unwrap();
                        assert_eq!(recovered, pt);
                    }
                }
            }
        }
    };
}

/// Convenience bindings for the 128-bit-equivalent parameter set
/// `(m=64, n=58, k=28, lambda=3)`.
#[cfg(feature = "level-128")]
level_module!(level_128, SecurityLevel::L128);

/// Convenience bindings for the 192-bit-equivalent parameter set
/// `(m=96, n=62, k=32, lambda=3)`.
#[cfg(feature = "level-192")]
level_module!(level_192, SecurityLevel::L192);

/// Convenience bindings for the 256-bit-equivalent parameter set
/// `(m=128, n=64, k=28, lambda=3)`.
#[cfg(feature = "level-256")]
level_module!(level_256, SecurityLevel::L256);
