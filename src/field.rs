//! Component A: arithmetic in `F_{2^m}`.
//!
//! An element is represented as an integer in `[0, 2^m)`, interpreted as the
//! coefficients of a polynomial over `F_2` in big-endian bit order (spec
//! §3/§4.1): `e = Σ c_i x^i ↔ Σ c_i 2^i`. Addition is XOR. Multiplication is
//! polynomial product modulo a fixed irreducible polynomial `f_m` of degree
//! `m`, found once per `m` and cached for the lifetime of the process (see
//! [`irreducible_polynomial`] below) rather than hand-asserted from a table —
//! every `f_m` this crate ever uses is verified irreducible by [`is_irreducible`]
//! before it is trusted. Two peers exchanging keys or ciphertexts must use the
//! same build of this crate (hence the same `f_m` per `m`), exactly as spec
//! §4.1 requires.
//!
//! `m` is capped at 128 because elements are stored in a `u128`; this covers
//! every degree the scheme's three security levels and its subfield
//! embeddings need (1, 2, 3, 4, 12 for tests; 64, 96, 128 for production).

use crate::error::{ensure, Error, Result};
use rand_core::RngCore;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use zeroize::Zeroize;

/// An element of some `F_{2^m}`, represented as its integer encoding. A bare
/// `FieldElement` carries no `m`; arithmetic is always performed through a
/// [`Field`], mirroring the way the scheme's linear algebra is always
/// performed relative to an explicit field parameter rather than a type.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Zeroize)]
pub struct FieldElement(pub(crate) u128);

impl FieldElement {
    /// The zero element, for any field.
    pub const ZERO: FieldElement = FieldElement(0);
    /// The multiplicative identity, for any field.
    pub const ONE: FieldElement = FieldElement(1);

    /// Integer encoding `Σ c_i 2^i`, exposed for the bit codec.
    #[must_use]
    pub fn to_u128(self) -> u128 {
        self.0
    }

    /// Builds an element directly from its integer encoding. Callers are
    /// responsible for ensuring `value < 2^m` for the field it is used with;
    /// every arithmetic operation on an out-of-range element would simply
    /// compute in the wrong coset, not panic, but [`Field::element`] should
    /// be preferred wherever the field is in scope.
    #[must_use]
    pub fn from_u128(value: u128) -> FieldElement {
        FieldElement(value)
    }
}

/// `F_{2^m}` for one fixed degree `m`, carrying the (verified-irreducible)
/// reduction polynomial used by [`Field::mul`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroize)]
pub struct Field {
    m: u32,
    /// The degree-`<m` part of `f_m`; the implicit leading term `x^m` is not
    /// stored (it would not fit in a `u128` when `m == 128`).
    modulus_low: u128,
}

impl Field {
    /// Constructs `F_{2^m}`, searching for (and caching) `f_m` on first use
    /// for this `m`.
    pub fn new(m: u32) -> Result<Field> {
        ensure!(m >= 1 && m <= 128, Error::ParameterError("field degree m must be in [1, 128]"));
        Ok(Field { m, modulus_low: irreducible_polynomial(m) })
    }

    /// Degree of this field's extension over `F_2`.
    #[must_use]
    pub fn m(self) -> u32 {
        self.m
    }

    /// `2^m`, the order of the field, as a `u128` (exact for `m <= 127`; for
    /// `m == 128` the true order does not fit in a `u128`, so this returns
    /// `u128::MAX` as a saturating sentinel — no caller in this crate needs
    /// the exact order at `m == 128`, only comparisons against element width).
    #[must_use]
    pub fn order(self) -> u128 {
        if self.m < 128 {
            1u128 << self.m
        } else {
            u128::MAX
        }
    }

    /// The zero element.
    #[must_use]
    pub fn zero(self) -> FieldElement {
        FieldElement::ZERO
    }

    /// The multiplicative identity.
    #[must_use]
    pub fn one(self) -> FieldElement {
        FieldElement::ONE
    }

    /// `a + b`, i.e. XOR (characteristic two).
    #[must_use]
    pub fn add(self, a: FieldElement, b: FieldElement) -> FieldElement {
        FieldElement(a.0 ^ b.0)
    }

    /// `a - b`; identical to [`Field::add`] in characteristic two, provided
    /// as a distinct name at call sites that are conceptually subtracting
    /// (spec §4.6 step 3, `e_vec := y − c' · P⁻¹`).
    #[must_use]
    pub fn sub(self, a: FieldElement, b: FieldElement) -> FieldElement {
        self.add(a, b)
    }

    /// `a * b` modulo `f_m`.
    #[must_use]
    pub fn mul(self, a: FieldElement, b: FieldElement) -> FieldElement {
        let (lo, hi) = mul_wide(a.0, b.0);
        FieldElement(reduce_wide(lo, hi, self.m, self.modulus_low))
    }

    /// `a^e` by square-and-multiply; `e` is taken as a plain `u128` since the
    /// largest exponent this crate ever raises to, `2^128 - 2` (field
    /// inversion at `m = 128`), still fits.
    #[must_use]
    pub fn pow(self, a: FieldElement, mut e: u128) -> FieldElement {
        let mut result = self.one();
        let mut base = a;
        while e > 0 {
            if e & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            e >>= 1;
        }
        result
    }

    /// `a^{-1}` via `a^{2^m - 2}` (Fermat's little theorem generalized to
    /// `F_{2^m}`; spec §4.1).
    pub fn inv(self, a: FieldElement) -> Result<FieldElement> {
        ensure!(a.0 != 0, Error::ParameterError("cannot invert the zero field element"));
        let exponent = if self.m < 128 { (1u128 << self.m) - 2 } else { u128::MAX - 1 };
        Ok(self.pow(a, exponent))
    }

    /// Frobenius endomorphism `a ↦ a^{2^j}`, used to build Gabidulin
    /// generator matrices (spec §4.4: `G[i,j] = g_j^{2^i}`).
    #[must_use]
    pub fn frobenius(self, a: FieldElement, j: u32) -> FieldElement {
        let mut v = a;
        for _ in 0..j {
            v = self.mul(v, v);
        }
        v
    }

    /// A uniformly random element, drawn `⌈m/8⌉` bytes at a time and masked
    /// down to `m` bits.
    pub fn sample(self, rng: &mut impl RngCore) -> FieldElement {
        let nbytes = self.m.div_ceil(8) as usize;
        let mut buf = [0u8; 16];
        rng.fill_bytes(&mut buf[..nbytes]);
        let mut value = 0u128;
        for &b in buf[..nbytes].iter() {
            value = (value << 8) | u128::from(b);
        }
        FieldElement(value & mask(self.m))
    }

    /// Wraps a plain integer encoding as an element of this field, masking
    /// off any bits at or above position `m`.
    #[must_use]
    pub fn element(self, value: u128) -> FieldElement {
        FieldElement(value & mask(self.m))
    }
}

fn mask(m: u32) -> u128 {
    if m >= 128 {
        u128::MAX
    } else {
        (1u128 << m) - 1
    }
}

/// The `F_2`-rank of a set of field elements: the dimension of their
/// `F_2`-linear span, viewing each element as a vector of `m` bits. Computed
/// with an XOR (linear) basis, the standard technique for rank/independence
/// over `F_2`. Used both to validate Gabidulin evaluation points (spec
/// §4.4) and to check a decrypted error vector's rank (spec §4.6 step 10).
#[must_use]
pub fn rank_f2(elems: &[FieldElement]) -> u32 {
    let mut basis: Vec<u128> = Vec::new();
    for &e in elems {
        let mut v = e.0;
        for &b in &basis {
            let lead = highest_bit(b);
            if (v >> lead) & 1 == 1 {
                v ^= b;
            }
        }
        if v != 0 {
            basis.push(v);
            basis.sort_unstable_by(|a, b| highest_bit(*b).cmp(&highest_bit(*a)));
        }
    }
    basis.len() as u32
}

/// True iff `elems` are `F_2`-linearly independent.
#[must_use]
pub fn is_f2_independent(elems: &[FieldElement]) -> bool {
    rank_f2(elems) as usize == elems.len()
}

fn highest_bit(v: u128) -> u32 {
    debug_assert!(v != 0);
    127 - v.leading_zeros()
}

// ---------------------------------------------------------------------
// Wide (double-width) carry-less polynomial arithmetic, used both for field
// multiplication (reduce a <256-bit product down to <m bits) and for the
// irreducibility search below (reduce a candidate polynomial, which may have
// degree exactly 128 and so not fit leading-bit-included in a u128, modulo a
// smaller polynomial).
// ---------------------------------------------------------------------

fn shl_wide(lo: u128, hi: u128, s: u32) -> (u128, u128) {
    if s == 0 {
        return (lo, hi);
    }
    let new_lo = lo << s;
    let new_hi = (hi << s) | (lo >> (128 - s));
    (new_lo, new_hi)
}

fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    let mut lo = 0u128;
    let mut hi = 0u128;
    let mut cur_lo = b;
    let mut cur_hi = 0u128;
    for i in 0..128 {
        if (a >> i) & 1 == 1 {
            lo ^= cur_lo;
            hi ^= cur_hi;
        }
        let (nl, nh) = shl_wide(cur_lo, cur_hi, 1);
        cur_lo = nl;
        cur_hi = nh;
    }
    (lo, hi)
}

/// Degree of the wide polynomial `(lo, hi)` (bit 0 of `lo` is the constant
/// term, bit 0 of `hi` is `x^128`), or `-1` for the zero polynomial.
fn deg_wide(lo: u128, hi: u128) -> i32 {
    if hi != 0 {
        128 + (127 - hi.leading_zeros() as i32)
    } else if lo != 0 {
        127 - lo.leading_zeros() as i32
    } else {
        -1
    }
}

/// Reduces a wide polynomial modulo the degree-`mod_deg` polynomial whose
/// sub-leading-term coefficients are `mod_low` (i.e. the modulus is
/// `x^mod_deg + mod_low`). The result has degree `< mod_deg` and so always
/// fits in a plain `u128`.
fn reduce_wide(mut lo: u128, mut hi: u128, mod_deg: u32, mod_low: u128) -> u128 {
    loop {
        let d = deg_wide(lo, hi);
        if d < mod_deg as i32 {
            break;
        }
        let shift = d as u32 - mod_deg;
        if d < 128 {
            lo &= !(1u128 << d);
        } else {
            hi &= !(1u128 << (d - 128));
        }
        let (slo, shi) = shl_wide(mod_low, 0, shift);
        lo ^= slo;
        hi ^= shi;
    }
    debug_assert_eq!(hi, 0);
    lo
}

fn deg1(v: u128) -> i32 {
    if v == 0 {
        -1
    } else {
        127 - v.leading_zeros() as i32
    }
}

/// GCD of two polynomials, each given in plain (leading-bit-included) form
/// and each of degree `< 128`.
fn poly_gcd(mut a: u128, mut b: u128) -> u128 {
    loop {
        if b == 0 {
            return a;
        }
        let da = deg1(a);
        let db = deg1(b);
        if da < db {
            core::mem::swap(&mut a, &mut b);
            continue;
        }
        let b_low = b ^ (1u128 << db);
        let r = reduce_wide(a, 0, db as u32, b_low);
        a = b;
        b = r;
    }
}

/// `x^(2^d)` modulo the degree-`m` candidate `x^m + low`.
fn pow_x_2_pow(d: u32, m: u32, low: u128) -> u128 {
    let mut val: u128 = 2; // the polynomial "x"
    for _ in 0..d {
        let (lo, hi) = mul_wide(val, val);
        val = reduce_wide(lo, hi, m, low);
    }
    val
}

fn prime_divisors(mut n: u32) -> Vec<u32> {
    let mut divisors = Vec::new();
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            divisors.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
        p += 1;
    }
    if n > 1 {
        divisors.push(n);
    }
    divisors
}

/// Ben-Or's irreducibility test: `x^m + low` is irreducible over `F_2` iff
/// `x^(2^m) ≡ x` modulo it, and for every prime `p | m`, `gcd(candidate,
/// x^(2^(m/p)) - x) == 1`.
fn is_irreducible(m: u32, low: u128) -> bool {
    if pow_x_2_pow(m, m, low) != 2 {
        return false;
    }
    for p in prime_divisors(m) {
        let e = m / p;
        let diff = pow_x_2_pow(e, m, low) ^ 2;
        if diff == 0 {
            return false;
        }
        // gcd(candidate, diff): lift candidate into wide form (it may have
        // degree == 128, which does not fit leading-bit-included in a u128)
        // and reduce modulo `diff`, whose degree is always < m.
        let (xm_lo, xm_hi) = if m < 128 { (1u128 << m, 0u128) } else { (0u128, 1u128) };
        let cand_lo = xm_lo ^ low;
        let cand_hi = xm_hi;
        let dd = deg1(diff) as u32;
        let diff_low = diff ^ (1u128 << dd);
        let r = reduce_wide(cand_lo, cand_hi, dd, diff_low);
        if poly_gcd(diff, r) != 1 {
            return false;
        }
    }
    true
}

/// Finds (and remembers, per `m`) a fixed irreducible polynomial of degree
/// `m` over `F_2`, returned as its sub-leading coefficients (`f_m = x^m +
/// low`). Search order is deterministic — lowest-weight trinomial first,
/// then pentanomials by increasing exponents — so the same `m` always
/// yields the same `f_m` within a build of this crate.
fn irreducible_polynomial(m: u32) -> u128 {
    static CACHE: OnceLock<Mutex<HashMap<u32, u128>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    if let Some(&low) = cache.lock().unwrap().get(&m) {
        return low;
    }
    let low = find_irreducible(m);
    cache.lock().unwrap().insert(m, low);
    low
}

fn find_irreducible(m: u32) -> u128 {
    if m == 1 {
        // No reduction is ever needed: the product of two degree-<1
        // polynomials already has degree < 1.
        return 0;
    }
    // Trinomials x^m + x^k + 1, 1 <= k < m.
    for k in 1..m {
        let low = (1u128 << k) | 1;
        if is_irreducible(m, low) {
            return low;
        }
    }
    // Pentanomials x^m + x^a + x^b + x^c + 1, 1 <= c < b < a < m.
    for a in 2..m {
        for b in 1..a {
            for c in 1..b {
                let low = (1u128 << a) | (1u128 << b) | (1u128 << c) | 1;
                if is_irreducible(m, low) {
                    return low;
                }
            }
        }
    }
    unreachable!("an irreducible polynomial of every degree m >= 1 exists over F_2")
}
