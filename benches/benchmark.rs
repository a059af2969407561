use criterion::{criterion_group, criterion_main, Criterion};
use rand_chacha::rand_core::SeedableRng;
use rmpke::params::SecurityLevel;
use rmpke::{canonical_oracle, Hasher, SecretKey};

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);

    for level in [SecurityLevel::L128, SecurityLevel::L192, SecurityLevel::L256] {
        let (hash, xof) = canonical_oracle(level);
        let plaintext = vec![0u8; level.params().plaintext_len(hash.digest_size()).unwrap()];

        c.bench_function(&format!("{level}  KeyGen"), |b| {
            b.iter(|| SecretKey::generate(level, &mut rng).unwrap())
        });

        let sk = SecretKey::generate(level, &mut rng).unwrap();
        let pk = sk.public_key().unwrap();
        let ciphertext = rmpke::cipher::encrypt(&pk, &hash, &xof, &plaintext, &mut rng).unwrap();

        c.bench_function(&format!("{level}  Encrypt"), |b| {
            b.iter(|| rmpke::cipher::encrypt(&pk, &hash, &xof, &plaintext, &mut rng).unwrap())
        });

        c.bench_function(&format!("{level}  Decrypt"), |b| {
            b.iter(|| rmpke::cipher::decrypt(&sk, &hash, &xof, &ciphertext).unwrap())
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
