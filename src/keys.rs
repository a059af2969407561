//! Component E: key generation and key serialization (spec §4.5), grounded
//! directly on `original_source/alshehhi/key.py`'s `generate`/`SecretKey`/
//! `PublicKey`. The wire format (four DER fields for the secret key, two for
//! the public key, both PEM-armored) mirrors `key.py`'s `export_der`/
//! `export_pem` byte-for-byte in structure.

use rand_core::{CryptoRng, RngCore};

use crate::codec;
use crate::der;
use crate::error::{ensure, Error, Result};
use crate::field::Field;
use crate::gabidulin::GabidulinCode;
use crate::linalg::Matrix;
use crate::params::{Params, SecurityLevel};
use crate::pem;

/// A generated key pair's private half: the Gabidulin code, row scrambler
/// `S`, and column scrambler `P` (spec §4.5). Zeroized on drop.
#[derive(Clone, Debug, zeroize::Zeroize, zeroize::ZeroizeOnDrop)]
pub struct SecretKey {
    #[zeroize(skip)]
    level: SecurityLevel,
    code: GabidulinCode,
    s: Matrix,
    p: Matrix,
}

/// A public key: the systematic generator matrix `[I_k | R]`, stored as just
/// `R` (spec §4.5 step 6 — the identity block carries no information).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    level: SecurityLevel,
    k: usize,
    n: usize,
    r: Matrix,
}

impl SecretKey {
    /// Generates a fresh key pair at the given security level (spec §4.5
    /// steps 1-6): sample a random full-rank Gabidulin code, a random
    /// invertible `k x k` row scrambler `S`, and a random `λ`-subspace-
    /// confined invertible `n x n` column scrambler `P`; rescale `S` so the
    /// public generator matrix comes out in systematic form. Restarts from
    /// scratch if the leading `k x k` block of `S · G(C) · P⁻¹` happens to
    /// be singular (spec §4.5 step 5), which the reference implementation
    /// leaves as an unhandled exception — retrying instead is the one
    /// deliberate robustness improvement this port makes over it.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(rng)))]
    pub fn generate(level: SecurityLevel, rng: &mut (impl RngCore + CryptoRng)) -> Result<SecretKey> {
        let params = level.params();
        let field = Field::new(params.m)?;
        loop {
            let points = crate::sampling::random_rank_vector(field, params.n as usize, params.n, rng)?;
            let code = GabidulinCode::new(field, params.k as usize, points)?;
            let s = crate::sampling::random_invertible(field, params.k as usize, rng);
            let p = crate::sampling::random_subspace_invertible(field, params.lambda, params.n as usize, rng)?;

            let t = s.mul(&code.generator_matrix())?.mul(&p.invert()?)?;
            let t1 = t.columns(0, params.k as usize);
            if t1.invert().is_err() {
                #[cfg(feature = "tracing")]
                tracing::trace!(level = %level, "leading k x k block singular, retrying key generation");
                continue;
            }
            let s_final = s.invert()?.mul(&t1)?;
            return Ok(SecretKey { level, code, s: s_final, p });
        }
    }

    /// The security level this key was generated at.
    #[must_use]
    pub fn level(&self) -> SecurityLevel {
        self.level
    }

    /// The secret Gabidulin code `C`.
    #[must_use]
    pub fn code(&self) -> &GabidulinCode {
        &self.code
    }

    /// The row scrambler `S`.
    #[must_use]
    pub fn s(&self) -> &Matrix {
        &self.s
    }

    /// The column scrambler `P`.
    #[must_use]
    pub fn p(&self) -> &Matrix {
        &self.p
    }

    /// Derives the public key `[I_k | R] = S⁻¹ · G(C) · P⁻¹` (spec §4.5
    /// step 6).
    pub fn public_key(&self) -> Result<PublicKey> {
        let g = self.s.invert()?.mul(&self.code.generator_matrix())?.mul(&self.p.invert()?)?;
        let r = g.columns(self.code.k(), self.code.n());
        Ok(PublicKey { level: self.level, k: self.code.k(), n: self.code.n(), r })
    }

    /// Serializes to DER: `SEQUENCE { evaluationPoints OCTET STRING, s OCTET
    /// STRING, p OCTET STRING, parameters SEQUENCE { m, n, k, lambda } }`.
    #[must_use]
    pub fn to_der(&self) -> Vec<u8> {
        let field = self.code.field();
        let points_bytes = codec::encode_vector(field, self.code.evaluation_points());
        let s_bytes = codec::encode_matrix(field, &self.s);
        let p_bytes = codec::encode_matrix(field, &self.p);
        der::encode_sequence(&[
            der::encode_octet_string(&points_bytes),
            der::encode_octet_string(&s_bytes),
            der::encode_octet_string(&p_bytes),
            parameters_der(self.level.params()),
        ])
    }

    /// Parses a secret key from its DER encoding (see [`SecretKey::to_der`]).
    pub fn from_der(bytes: &[u8]) -> Result<SecretKey> {
        let items = der::decode_sequence(bytes)?;
        ensure!(items.len() == 4, Error::SerializationError("secret key DER sequence must have four members"));
        let points_bytes = der::decode_octet_string(items[0])?;
        let s_bytes = der::decode_octet_string(items[1])?;
        let p_bytes = der::decode_octet_string(items[2])?;
        let params = decode_parameters(items[3])?;
        let level = SecurityLevel::from_params(params.m, params.n, params.k, params.lambda)?;

        let field = Field::new(params.m)?;
        let points = codec::decode_vector(field, points_bytes, params.n as usize)?;
        let code = GabidulinCode::new(field, params.k as usize, points)?;
        let s = codec::decode_matrix(field, s_bytes, params.k as usize, params.k as usize)?;
        let p = codec::decode_matrix(field, p_bytes, params.n as usize, params.n as usize)?;
        Ok(SecretKey { level, code, s, p })
    }

    /// PEM-armors [`SecretKey::to_der`] under the `PRIVATE KEY` marker.
    #[must_use]
    pub fn to_pem(&self) -> String {
        pem::encode(&self.to_der(), "PRIVATE KEY")
    }

    /// Parses a PEM-armored secret key, rejecting any marker other than
    /// `PRIVATE KEY`.
    pub fn from_pem(text: &str) -> Result<SecretKey> {
        let (label, der) = pem::decode(text)?;
        ensure!(label == "PRIVATE KEY", Error::SerializationError("PEM document is not a private key"));
        SecretKey::from_der(&der)
    }
}

impl PublicKey {
    /// The security level this key was generated at.
    #[must_use]
    pub fn level(&self) -> SecurityLevel {
        self.level
    }

    /// The code dimension `k`.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// The code length `n`.
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    /// The systematic generator matrix `[I_k | R]`.
    #[must_use]
    pub fn generator_matrix(&self, field: Field) -> Result<Matrix> {
        Matrix::identity(field, self.k).augment(&self.r)
    }

    /// Serializes to DER: `SEQUENCE { r BIT STRING, parameters SEQUENCE { m,
    /// n, k, lambda } }`.
    #[must_use]
    pub fn to_der(&self) -> Vec<u8> {
        let field = Field::new(self.level.params().m).expect("SecurityLevel always has a valid field degree");
        let r_bytes = codec::encode_matrix(field, &self.r);
        der::encode_sequence(&[der::encode_bit_string(&r_bytes), parameters_der(self.level.params())])
    }

    /// Parses a public key from its DER encoding (see [`PublicKey::to_der`]).
    pub fn from_der(bytes: &[u8]) -> Result<PublicKey> {
        let items = der::decode_sequence(bytes)?;
        ensure!(items.len() == 2, Error::SerializationError("public key DER sequence must have two members"));
        let r_bytes = der::decode_bit_string(items[0])?;
        let params = decode_parameters(items[1])?;
        let level = SecurityLevel::from_params(params.m, params.n, params.k, params.lambda)?;

        let field = Field::new(params.m)?;
        let cols = (params.n - params.k) as usize;
        let r = codec::decode_matrix(field, r_bytes, params.k as usize, cols)?;
        Ok(PublicKey { level, k: params.k as usize, n: params.n as usize, r })
    }

    /// PEM-armors [`PublicKey::to_der`] under the `PUBLIC KEY` marker.
    #[must_use]
    pub fn to_pem(&self) -> String {
        pem::encode(&self.to_der(), "PUBLIC KEY")
    }

    /// Parses a PEM-armored public key, rejecting any marker other than
    /// `PUBLIC KEY`.
    pub fn from_pem(text: &str) -> Result<PublicKey> {
        let (label, der) = pem::decode(text)?;
        ensure!(label == "PUBLIC KEY", Error::SerializationError("PEM document is not a public key"));
        PublicKey::from_der(&der)
    }
}

fn parameters_der(params: Params) -> Vec<u8> {
    der::encode_sequence(&[
        der::encode_integer(u64::from(params.m)),
        der::encode_integer(u64::from(params.n)),
        der::encode_integer(u64::from(params.k)),
        der::encode_integer(u64::from(params.lambda)),
    ])
}

fn decode_parameters(bytes: &[u8]) -> Result<Params> {
    let items = der::decode_sequence(bytes)?;
    ensure!(items.len() == 4, Error::SerializationError("parameters sequence must have four members"));
    Ok(Params {
        m: der::decode_integer(items[0])? as u32,
        n: der::decode_integer(items[1])? as u32,
        k: der::decode_integer(items[2])? as u32,
        lambda: der::decode_integer(items[3])? as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    #[test]
    fn public_key_is_systematic_form() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let sk = SecretKey::generate(SecurityLevel::L128, &mut rng).unwrap();
        let pk = sk.public_key().unwrap();
        let field = Field::new(SecurityLevel::L128.params().m).unwrap();
        let g = pk.generator_matrix(field).unwrap();
        for i in 0..pk.k() {
            for j in 0..pk.k() {
                let expected = if i == j { field.one() } else { field.zero() };
                assert_eq!(g.get(i, j), expected);
            }
        }
    }

    #[test]
    fn secret_key_der_round_trips() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let sk = SecretKey::generate(SecurityLevel::L128, &mut rng).unwrap();
        let der = sk.to_der();
        let decoded = SecretKey::from_der(&der).unwrap();
        assert_eq!(decoded.level(), sk.level());
        assert_eq!(decoded.s().row_major(), sk.s().row_major());
        assert_eq!(decoded.p().row_major(), sk.p().row_major());
        assert_eq!(decoded.code().evaluation_points(), sk.code().evaluation_points());
    }

    #[test]
    fn public_key_pem_round_trips() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let sk = SecretKey::generate(SecurityLevel::L192, &mut rng).unwrap();
        let pk = sk.public_key().unwrap();
        let pem_text = pk.to_pem();
        assert!(pem_text.starts_with("-----BEGIN PUBLIC KEY-----"));
        let decoded = PublicKey::from_pem(&pem_text).unwrap();
        assert_eq!(decoded, pk);
    }

    #[test]
    fn private_key_pem_rejects_public_key_marker() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let sk = SecretKey::generate(SecurityLevel::L128, &mut rng).unwrap();
        let pk_pem = sk.public_key().unwrap().to_pem();
        assert!(SecretKey::from_pem(&pk_pem).is_err());
    }
}
