use rand_chacha::rand_core::SeedableRng;
use rand_core::RngCore;
use rmpke::params::SecurityLevel;
use rmpke::{canonical_oracle, Hasher, PublicKey, SecretKey};

#[test]
fn random_bytes_are_rejected_as_a_der_public_key() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
    let mut garbage = [0u8; 512];
    rng.fill_bytes(&mut garbage);
    assert!(PublicKey::from_der(&garbage).is_err());
}

#[test]
fn random_bytes_are_rejected_as_pem() {
    assert!(PublicKey::from_pem("not a pem document at all").is_err());
}

#[test]
fn pem_with_mismatched_marker_is_rejected() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(2);
    let sk = SecretKey::generate(SecurityLevel::L128, &mut rng).unwrap();
    let pk_pem = sk.public_key().unwrap().to_pem();
    assert!(SecretKey::from_pem(&pk_pem).is_err());
}

#[test]
fn tampered_ciphertext_byte_is_rejected() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
    let sk = SecretKey::generate(SecurityLevel::L128, &mut rng).unwrap();
    let pk = sk.public_key().unwrap();
    let (hash, xof) = canonical_oracle(SecurityLevel::L128);
    let len = SecurityLevel::L128.params().plaintext_len(hash.digest_size()).unwrap();
    let plaintext = vec![0xAAu8; len];

    let mut ciphertext = rmpke::cipher::encrypt(&pk, &hash, &xof, &plaintext, &mut rng).unwrap();
    for i in 0..ciphertext.len() {
        let mut tampered = ciphertext.clone();
        tampered[i] ^= 0x01;
        assert!(rmpke::cipher::decrypt(&sk, &hash, &xof, &tampered).is_err(), "byte {i} flip was not caught");
    }
    // sanity: the untouched ciphertext still decrypts.
    ciphertext.clone_from(&rmpke::cipher::encrypt(&pk, &hash, &xof, &plaintext, &mut rng).unwrap());
    assert!(rmpke::cipher::decrypt(&sk, &hash, &xof, &ciphertext).is_ok());
}

#[test]
fn truncated_ciphertext_is_rejected() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(4);
    let sk = SecretKey::generate(SecurityLevel::L128, &mut rng).unwrap();
    let pk = sk.public_key().unwrap();
    let (hash, xof) = canonical_oracle(SecurityLevel::L128);
    let len = SecurityLevel::L128.params().plaintext_len(hash.digest_size()).unwrap();
    let plaintext = vec![0x11u8; len];
    let ciphertext = rmpke::cipher::encrypt(&pk, &hash, &xof, &plaintext, &mut rng).unwrap();
    assert!(rmpke::cipher::decrypt(&sk, &hash, &xof, &ciphertext[..ciphertext.len() - 1]).is_err());
}

#[test]
fn wrong_length_plaintext_is_rejected_at_every_level() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);
    for level in [SecurityLevel::L128, SecurityLevel::L192, SecurityLevel::L256] {
        let sk = SecretKey::generate(level, &mut rng).unwrap();
        let pk = sk.public_key().unwrap();
        let (hash, xof) = canonical_oracle(level);
        assert!(rmpke::cipher::encrypt(&pk, &hash, &xof, b"too short", &mut rng).is_err());
    }
}

#[test]
fn unknown_security_level_bit_count_is_a_parameter_error() {
    assert!(SecurityLevel::from_bits(64).is_err());
    assert!(SecurityLevel::from_bits(512).is_err());
}

#[test]
fn der_with_parameters_not_matching_a_recognized_level_is_rejected() {
    assert!(SecurityLevel::from_params(64, 58, 28, 4).is_err());
}
