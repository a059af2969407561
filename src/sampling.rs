//! Component C: the three random samplers key generation and encryption draw
//! on — a uniformly random invertible matrix, an invertible matrix whose
//! entries are confined to a random `λ`-dimensional `F_2`-subspace of the
//! field (the column scrambler `P`), and a vector of prescribed `F_2`-rank
//! (the injected error `e`). All three are rejection samplers: draw, check
//! the required linear-algebra property, retry on failure. None of this
//! exists in the teacher (its sampling is rejection sampling over centered
//! binomial distributions, the old `sample_poly_cbd`); the retry-until-valid
//! shape is carried over from there, applied to a different property.

use crate::error::{ensure, Error, Result};
use crate::field::{rank_f2, Field, FieldElement};
use crate::linalg::Matrix;
use rand_core::RngCore;

/// A uniformly random invertible `order x order` matrix over `field`.
pub fn random_invertible(field: Field, order: usize, rng: &mut impl RngCore) -> Matrix {
    loop {
        let data: Vec<FieldElement> = (0..order * order).map(|_| field.sample(rng)).collect();
        let candidate = Matrix::from_row_major(field, order, order, data);
        if candidate.invert().is_ok() {
            return candidate;
        }
    }
}

/// A random `F_2`-independent basis of size `dim` inside `field`.
fn random_independent_basis(field: Field, dim: u32, rng: &mut impl RngCore) -> Vec<FieldElement> {
    loop {
        let basis: Vec<FieldElement> = (0..dim).map(|_| field.sample(rng)).collect();
        if rank_f2(&basis) == dim {
            return basis;
        }
    }
}

/// Maps a `GF(2^lambda)` element's bits through `basis` into `field`, i.e.
/// the linear embedding `e ↦ Σ_i bit_i(e) · basis[i]` that confines the
/// result to the `F_2`-span of `basis`.
fn embed(field: Field, basis: &[FieldElement], subfield_elem: u128) -> FieldElement {
    let mut acc = field.zero();
    for (i, &b) in basis.iter().enumerate() {
        if (subfield_elem >> i) & 1 == 1 {
            acc = field.add(acc, b);
        }
    }
    acc
}

/// An invertible `n x n` matrix over `field` whose entries all lie in a
/// random `λ`-dimensional `F_2`-subspace of `field` (the column scrambler
/// `P` of spec §4.5, grounded in `random_invertible_subpace_matrix`):
/// sample a random `λ`-dim subspace basis and a random invertible matrix
/// over the `2^λ`-element subfield, then lift the subfield matrix into
/// `field` entrywise through the basis, retrying until the lift is still
/// invertible over the full field.
pub fn random_subspace_invertible(field: Field, lambda: u32, n: usize, rng: &mut impl RngCore) -> Result<Matrix> {
    ensure!(lambda <= field.m(), Error::ParameterError("subspace dimension lambda must not exceed the field degree m"));
    let subfield = Field::new(lambda)?;
    loop {
        let basis = random_independent_basis(field, lambda, rng);
        let subfield_matrix = random_invertible(subfield, n, rng);
        let lifted: Vec<FieldElement> =
            subfield_matrix.row_major().into_iter().map(|e| embed(field, &basis, e.to_u128())).collect();
        let candidate = Matrix::from_row_major(field, n, n, lifted);
        if candidate.invert().is_ok() {
            return Ok(candidate);
        }
    }
}

/// A length-`n` vector over `field` with `F_2`-rank exactly `rank` (the
/// injected error `e` of spec §4.6 step 4, grounded in `random_rank_vector`):
/// sample a rank-sized independent basis, place it directly in the first
/// `rank` coordinates, fill the remainder with random `F_2`-combinations of
/// the same basis (so the span cannot grow past `rank`), then shuffle so the
/// basis is not predictably in the leading positions.
pub fn random_rank_vector(field: Field, n: usize, rank: u32, rng: &mut impl RngCore) -> Result<Vec<FieldElement>> {
    let cap = field.m().min(n as u32);
    ensure!(rank <= cap, Error::ParameterError("rank exceeds min(m, n)"));
    let basis = random_independent_basis(field, rank, rng);
    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&basis);
    for _ in basis.len()..n {
        let mut coeff = 0u128;
        for i in 0..rank {
            if rng.next_u32() & 1 == 1 {
                coeff |= 1 << i;
            }
        }
        out.push(embed(field, &basis, coeff));
    }
    shuffle(&mut out, rng);
    Ok(out)
}

/// In-place Fisher–Yates shuffle.
fn shuffle(v: &mut [FieldElement], rng: &mut impl RngCore) {
    for i in (1..v.len()).rev() {
        let j = (rng.next_u32() as usize) % (i + 1);
        v.swap(i, j);
    }
}
