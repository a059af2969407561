//! Component F: the encryption and decryption operations (spec §4.6),
//! grounded directly on `original_source/alshehhi/cipher.py`'s `Enc`/`Dec`
//! classes. Free functions rather than stateful objects: everything the
//! reference's `Cipher` base class stores on `self` (the key, the hash, the
//! XOF) is either derivable from the key's [`SecurityLevel`] or passed in
//! explicitly, so there is nothing left to hold across calls.

use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use crate::error::{ensure, Error, Result};
use crate::field::Field;
use crate::keys::{PublicKey, SecretKey};
use crate::linalg::Matrix;
use crate::oracle::{Hasher, Xof};
use crate::{codec, sampling};

fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// Encrypts `plaintext` under `key` (spec §4.6 steps 1-7). `plaintext` must
/// be exactly [`crate::params::Params::plaintext_len`] bytes for `key`'s
/// level and `hash`'s digest size.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(key, hash, xof, plaintext, rng)))]
pub fn encrypt(
    key: &PublicKey,
    hash: &impl Hasher,
    xof: &impl Xof,
    plaintext: &[u8],
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<Vec<u8>> {
    let params = key.level().params();
    let field = Field::new(params.m)?;
    ensure!(
        plaintext.len() == params.plaintext_len(hash.digest_size())?,
        Error::ParameterError("plaintext length does not match (m, k) and the hash digest size")
    );

    // 1: sample a rank-`t` error and its byte encoding.
    let rank = params.decoding_radius();
    let error_vector = sampling::random_rank_vector(field, params.n as usize, rank, rng)?;
    let error_bytes = codec::encode_vector(field, &error_vector);

    // 2-4: bind the plaintext to the error, then mask it with the XOF
    // keystream the error drives.
    let verifier_hash = hash.hash(&[error_bytes.as_slice(), plaintext].concat());
    let extended_plaintext = [plaintext, &verifier_hash].concat();
    let keystream = xof.squeeze(&error_bytes, extended_plaintext.len());
    let message_bytes = xor(&extended_plaintext, &keystream);
    let message = codec::decode_vector(field, &message_bytes, params.k as usize)?;

    // 5-7: encode the masked message through the public generator matrix,
    // then hide the codeword in the error's rank-metric noise.
    let generator = key.generator_matrix(field)?;
    let codeword_row = Matrix::row_vector(field, message).mul(&generator)?;
    let codeword_bytes = codec::encode_vector(field, &codeword_row.row(0));
    Ok(xor(&codeword_bytes, &error_bytes))
}

/// Decrypts `ciphertext` under `key` (spec §4.6 steps 8-15). Returns
/// [`Error::DecodingError`] if the ciphertext does not decrypt to a
/// consistent plaintext — this single outcome covers a failed rank-metric
/// decode, a failed verifier-hash check, and a failed rank check, so that no
/// distinguishable failure mode leaks to a caller (the oracle hardening the
/// scheme's IND-CCA security rests on).
///
/// The reference implementation rejects only when *both* the hash check and
/// the rank check fail (`if not hash_verified and not rank_verified`); that
/// AND accepts a ciphertext whose rank check fails as long as the hash
/// happens to verify, which is backwards for a re-encryption-style check
/// meant to catch a tampered or oversized error. This port rejects when
/// *either* check fails.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(key, hash, xof, ciphertext)))]
pub fn decrypt(key: &SecretKey, hash: &impl Hasher, xof: &impl Xof, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let params = key.level().params();
    let field = Field::new(params.m)?;
    ensure!(
        ciphertext.len() == params.ciphertext_len(),
        Error::DecodingError("ciphertext length does not match (m, n)")
    );

    // 8: recover the received word and push it through the secret scramblers.
    let received_word = codec::decode_vector(field, ciphertext, params.n as usize)?;
    let scrambled = Matrix::row_vector(field, received_word.clone()).mul(key.p())?;
    let codeword = key.code().decode_to_code(&scrambled.row(0))?;

    // 9: recover the masked message and undo the row scrambler.
    let unencoded = key.code().unencode(&codeword)?;
    let message_row = Matrix::row_vector(field, unencoded).mul(key.s())?;
    let message_bytes = codec::encode_vector(field, &message_row.row(0));

    // 10: recover the injected error as `received - codeword * P^-1`.
    let shifted_back = Matrix::row_vector(field, codeword).mul(&key.p().invert()?)?;
    let error_vector: Vec<_> =
        received_word.iter().zip(shifted_back.row(0)).map(|(&a, b)| field.add(a, b)).collect();
    let error_bytes = codec::encode_vector(field, &error_vector);

    // 11-12: undo the XOF mask and split off the verifier hash.
    let keystream = xof.squeeze(&error_bytes, message_bytes.len());
    let extended_plaintext = xor(&message_bytes, &keystream);
    let plaintext_len = params.plaintext_len(hash.digest_size())?;
    ensure!(
        extended_plaintext.len() > plaintext_len,
        Error::DecodingError("recovered message is too short to contain a verifier hash")
    );
    let (plaintext, verifier_hash) = extended_plaintext.split_at(plaintext_len);

    // 13-14: the two oracle checks, per spec §4.6/§11 and the fix above. The
    // hash comparison runs in constant time (spec §9: implementers SHOULD
    // make this comparison branchless even though the scheme claims no
    // overall constant-time guarantee).
    let recomputed_hash = hash.hash(&[error_bytes.as_slice(), plaintext].concat());
    let hash_verified: bool = verifier_hash.ct_eq(&recomputed_hash).into();
    let rank_verified = crate::field::rank_f2(&error_vector) == params.decoding_radius();
    if !(hash_verified && rank_verified) {
        #[cfg(feature = "tracing")]
        tracing::debug!(hash_verified, rank_verified, "ciphertext failed re-encryption check");
        return Err(Error::DecodingError("ciphertext failed re-encryption check"));
    }

    Ok(plaintext.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{Sha3Hasher, ShakeXof};
    use crate::params::SecurityLevel;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sk = SecretKey::generate(SecurityLevel::L128, &mut rng).unwrap();
        let pk = sk.public_key().unwrap();
        let hash = Sha3Hasher(SecurityLevel::L128);
        let xof = ShakeXof(SecurityLevel::L128);

        let len = SecurityLevel::L128.params().plaintext_len(hash.digest_size()).unwrap();
        let plaintext: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();

        let ciphertext = encrypt(&pk, &hash, &xof, &plaintext, &mut rng).unwrap();
        assert_eq!(ciphertext.len(), SecurityLevel::L128.params().ciphertext_len());
        let recovered = decrypt(&sk, &hash, &xof, &ciphertext).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let sk = SecretKey::generate(SecurityLevel::L128, &mut rng).unwrap();
        let pk = sk.public_key().unwrap();
        let hash = Sha3Hasher(SecurityLevel::L128);
        let xof = ShakeXof(SecurityLevel::L128);

        let len = SecurityLevel::L128.params().plaintext_len(hash.digest_size()).unwrap();
        let plaintext = vec![0x42u8; len];
        let mut ciphertext = encrypt(&pk, &hash, &xof, &plaintext, &mut rng).unwrap();
        ciphertext[0] ^= 0xff;

        assert!(decrypt(&sk, &hash, &xof, &ciphertext).is_err());
    }

    #[test]
    fn wrong_length_plaintext_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sk = SecretKey::generate(SecurityLevel::L128, &mut rng).unwrap();
        let pk = sk.public_key().unwrap();
        let hash = Sha3Hasher(SecurityLevel::L128);
        let xof = ShakeXof(SecurityLevel::L128);

        assert!(encrypt(&pk, &hash, &xof, b"too short", &mut rng).is_err());
    }
}
