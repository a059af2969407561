use rand_chacha::rand_core::SeedableRng;
use rmpke::params::SecurityLevel;
use rmpke::{canonical_oracle, Hasher, PublicKey, SecretKey};

fn plaintext_for(level: SecurityLevel, seed: u8) -> Vec<u8> {
    let (hash, _) = canonical_oracle(level);
    let len = level.params().plaintext_len(hash.digest_size()).unwrap();
    (0..len).map(|i| (i as u8).wrapping_mul(seed).wrapping_add(seed)).collect()
}

#[test]
fn expected_flow_at_every_level() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    for level in [SecurityLevel::L128, SecurityLevel::L192, SecurityLevel::L256] {
        for seed in 0..10u8 {
            // Alice generates a key pair and serializes the public half for Bob.
            let alice_sk = SecretKey::generate(level, &mut rng).unwrap();
            let alice_pk = alice_sk.public_key().unwrap();
            let pk_der = alice_pk.to_der();

            // Bob deserializes the public key, encrypts, and sends the ciphertext back.
            let bob_pk = PublicKey::from_der(&pk_der).unwrap();
            let (hash, xof) = canonical_oracle(level);
            let plaintext = plaintext_for(level, seed.wrapping_add(1));
            let ciphertext = rmpke::cipher::encrypt(&bob_pk, &hash, &xof, &plaintext, &mut rng).unwrap();
            assert_eq!(ciphertext.len(), level.params().ciphertext_len());

            // Alice decrypts with her secret key.
            let recovered = rmpke::cipher::decrypt(&alice_sk, &hash, &xof, &ciphertext).unwrap();
            assert_eq!(recovered, plaintext, "perfect correctness failed at level {level}");
        }
    }
}

#[test]
fn two_encryptions_of_the_same_plaintext_differ() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    let sk = SecretKey::generate(SecurityLevel::L128, &mut rng).unwrap();
    let pk = sk.public_key().unwrap();
    let (hash, xof) = canonical_oracle(SecurityLevel::L128);
    let plaintext = plaintext_for(SecurityLevel::L128, 9);

    let ct1 = rmpke::cipher::encrypt(&pk, &hash, &xof, &plaintext, &mut rng).unwrap();
    let ct2 = rmpke::cipher::encrypt(&pk, &hash, &xof, &plaintext, &mut rng).unwrap();
    assert_ne!(ct1, ct2, "fresh randomness should make repeated ciphertexts differ");
    assert_eq!(rmpke::cipher::decrypt(&sk, &hash, &xof, &ct1).unwrap(), plaintext);
    assert_eq!(rmpke::cipher::decrypt(&sk, &hash, &xof, &ct2).unwrap(), plaintext);
}

#[test]
fn secret_and_public_key_round_trip_der_and_pem_at_every_level() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(321);
    for level in [SecurityLevel::L128, SecurityLevel::L192, SecurityLevel::L256] {
        let sk = SecretKey::generate(level, &mut rng).unwrap();
        let pk = sk.public_key().unwrap();

        let sk_round = SecretKey::from_der(&sk.to_der()).unwrap();
        assert_eq!(sk_round.s().row_major(), sk.s().row_major());
        assert_eq!(sk_round.p().row_major(), sk.p().row_major());
        assert_eq!(sk_round.code().evaluation_points(), sk.code().evaluation_points());

        let pk_round = PublicKey::from_pem(&pk.to_pem()).unwrap();
        assert_eq!(pk_round, pk);

        let sk_pem_round = SecretKey::from_pem(&sk.to_pem()).unwrap();
        assert_eq!(sk_pem_round.s().row_major(), sk.s().row_major());
    }
}

#[test]
fn public_key_equals_separately_derived_public_key() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(55);
    let sk = SecretKey::generate(SecurityLevel::L192, &mut rng).unwrap();
    assert_eq!(sk.public_key().unwrap(), sk.public_key().unwrap());
}

// $ cargo test -- --ignored
#[ignore]
#[test]
fn soak_test_128() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(999);
    for i in 0..u64::MAX {
        let sk = SecretKey::generate(SecurityLevel::L128, &mut rng).unwrap();
        let pk = sk.public_key().unwrap();
        let (hash, xof) = canonical_oracle(SecurityLevel::L128);
        let plaintext = plaintext_for(SecurityLevel::L128, (i % 251) as u8);
        let ciphertext = rmpke::cipher::encrypt(&pk, &hash, &xof, &plaintext, &mut rng).unwrap();
        let recovered = rmpke::cipher::decrypt(&sk, &hash, &xof, &ciphertext).unwrap();
        assert_eq!(recovered, plaintext, "round trip failed on iteration {i}");
    }
}
