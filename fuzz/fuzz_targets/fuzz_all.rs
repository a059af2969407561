#![no_main]

use libfuzzer_sys::fuzz_target;
use rand_core::{CryptoRng, RngCore};
use rmpke::params::SecurityLevel;
use rmpke::{canonical_oracle, Hasher, PublicKey, SecretKey};

/// An RNG that replays fuzzer-supplied bytes instead of drawing from an
/// entropy source, so that `cargo fuzz` can steer key generation and
/// encryption down every code path a real `RngCore` could reach.
struct TestRng<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> TestRng<'a> {
    fn new(data: &'a [u8]) -> Self {
        TestRng { data, offset: 0 }
    }

    fn next_byte(&mut self) -> u8 {
        if self.data.is_empty() {
            return 0;
        }
        let byte = self.data[self.offset % self.data.len()];
        self.offset = self.offset.wrapping_add(1);
        byte
    }
}

impl RngCore for TestRng<'_> {
    fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes([self.next_byte(), self.next_byte(), self.next_byte(), self.next_byte()])
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32()) | (u64::from(self.next_u32()) << 32)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for TestRng<'_> {}

fn xor_mutate(bytes: &mut [u8], fuzz_input: &[u8]) {
    if fuzz_input.is_empty() {
        return;
    }
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte ^= fuzz_input[i % fuzz_input.len()];
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let level = match data[0] % 3 {
        0 => SecurityLevel::L128,
        1 => SecurityLevel::L192,
        _ => SecurityLevel::L256,
    };
    let (hash, xof) = canonical_oracle(level);
    let mut rng = TestRng::new(&data[1..]);

    // A well-formed key pair and ciphertext, generated entirely from
    // fuzzer-controlled randomness.
    let Ok(sk) = SecretKey::generate(level, &mut rng) else { return };
    let Ok(pk) = sk.public_key() else { return };

    let plaintext_len = level.params().plaintext_len(hash.digest_size()).unwrap_or(0);
    let plaintext = vec![0xAAu8; plaintext_len];
    let Ok(ciphertext) = rmpke::cipher::encrypt(&pk, &hash, &xof, &plaintext, &mut rng) else { return };
    let recovered = rmpke::cipher::decrypt(&sk, &hash, &xof, &ciphertext);
    assert_eq!(recovered.as_deref(), Ok(plaintext.as_slice()), "honest round trip must never fail");

    // None of the following may panic, regardless of how the fuzzer mangles
    // the serialized forms: malformed input must surface as an `Err`.
    let mut mutated_ciphertext = ciphertext.clone();
    xor_mutate(&mut mutated_ciphertext, data);
    let _ = rmpke::cipher::decrypt(&sk, &hash, &xof, &mutated_ciphertext);

    let mut mutated_pk_der = pk.to_der();
    xor_mutate(&mut mutated_pk_der, data);
    let _ = PublicKey::from_der(&mutated_pk_der);

    let mut mutated_sk_der = sk.to_der();
    xor_mutate(&mut mutated_sk_der, data);
    let _ = SecretKey::from_der(&mutated_sk_der);

    let _ = PublicKey::from_der(data);
    let _ = SecretKey::from_der(data);
    let _ = rmpke::cipher::decrypt(&sk, &hash, &xof, data);
});
