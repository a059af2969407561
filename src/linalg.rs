//! Dense matrices over `F_{2^m}` and the linear algebra the scheme needs:
//! multiplication, inversion, and linear-system solving by Gauss–Jordan
//! elimination. The teacher has no analogous generic matrix type (its
//! linear algebra is all fixed-size NTT-domain array arithmetic); this
//! module's free-function-per-operation shape otherwise follows the
//! teacher's `helpers.rs` style.

use crate::error::{ensure, Error, Result};
use crate::field::{Field, FieldElement};
use zeroize::Zeroize;

/// A dense, row-major matrix over one fixed `Field`.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub struct Matrix {
    field: Field,
    rows: usize,
    cols: usize,
    data: Vec<FieldElement>,
}

impl Matrix {
    /// The all-zero `rows x cols` matrix.
    #[must_use]
    pub fn zero(field: Field, rows: usize, cols: usize) -> Matrix {
        Matrix { field, rows, cols, data: vec![FieldElement::ZERO; rows * cols] }
    }

    /// Builds a matrix from a row-major element list.
    pub fn from_row_major(field: Field, rows: usize, cols: usize, data: Vec<FieldElement>) -> Matrix {
        debug_assert_eq!(data.len(), rows * cols);
        Matrix { field, rows, cols, data }
    }

    /// The `n x n` identity matrix.
    #[must_use]
    pub fn identity(field: Field, n: usize) -> Matrix {
        let mut m = Matrix::zero(field, n, n);
        for i in 0..n {
            m.set(i, i, field.one());
        }
        m
    }

    /// Builds a matrix from explicit rows (each row the same length).
    pub fn from_rows(field: Field, rows: Vec<Vec<FieldElement>>) -> Matrix {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|r| r.len() == ncols));
        Matrix { field, rows: nrows, cols: ncols, data: rows.into_iter().flatten().collect() }
    }

    /// A single-row matrix (a "row vector") wrapping `v`.
    #[must_use]
    pub fn row_vector(field: Field, v: Vec<FieldElement>) -> Matrix {
        let cols = v.len();
        Matrix { field, rows: 1, cols, data: v }
    }

    /// The field this matrix's entries belong to.
    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }

    /// Row count.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The entry at row `i`, column `j`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> FieldElement {
        self.data[i * self.cols + j]
    }

    /// Sets the entry at row `i`, column `j`.
    pub fn set(&mut self, i: usize, j: usize, v: FieldElement) {
        self.data[i * self.cols + j] = v;
    }

    /// A copy of row `i`.
    #[must_use]
    pub fn row(&self, i: usize) -> Vec<FieldElement> {
        self.data[i * self.cols..(i + 1) * self.cols].to_vec()
    }

    /// The underlying elements, row-major (the codec's framing order).
    #[must_use]
    pub fn row_major(&self) -> Vec<FieldElement> {
        self.data.clone()
    }

    /// Matrix product `self * other`.
    pub fn mul(&self, other: &Matrix) -> Result<Matrix> {
        ensure!(self.cols == other.rows, Error::ParameterError("matrix dimensions do not match for multiplication"));
        let f = self.field;
        let mut out = Matrix::zero(f, self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut acc = f.zero();
                for l in 0..self.cols {
                    acc = f.add(acc, f.mul(self.get(i, l), other.get(l, j)));
                }
                out.set(i, j, acc);
            }
        }
        Ok(out)
    }

    /// Transpose.
    #[must_use]
    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zero(self.field, self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.set(j, i, self.get(i, j));
            }
        }
        out
    }

    /// Horizontal concatenation `[self | other]`; both must have the same
    /// row count.
    pub fn augment(&self, other: &Matrix) -> Result<Matrix> {
        ensure!(self.rows == other.rows, Error::ParameterError("matrices must have equal row counts to augment"));
        let mut out = Matrix::zero(self.field, self.rows, self.cols + other.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.set(i, j, self.get(i, j));
            }
            for j in 0..other.cols {
                out.set(i, self.cols + j, other.get(i, j));
            }
        }
        Ok(out)
    }

    /// Columns `[start, end)`.
    #[must_use]
    pub fn columns(&self, start: usize, end: usize) -> Matrix {
        let mut out = Matrix::zero(self.field, self.rows, end - start);
        for i in 0..self.rows {
            for (oj, j) in (start..end).enumerate() {
                out.set(i, oj, self.get(i, j));
            }
        }
        out
    }

    /// Matrix inverse via Gauss–Jordan elimination on `[self | I]`.
    pub fn invert(&self) -> Result<Matrix> {
        ensure!(self.rows == self.cols, Error::ParameterError("only square matrices can be inverted"));
        let n = self.rows;
        let f = self.field;
        let mut aug = self.augment(&Matrix::identity(f, n))?;

        for col in 0..n {
            let pivot_row = (col..n).find(|&r| aug.get(r, col) != FieldElement::ZERO);
            let pivot_row = pivot_row.ok_or(Error::ParameterError("matrix is singular"))?;
            if pivot_row != col {
                aug.swap_rows(pivot_row, col);
            }
            let inv_pivot = f.inv(aug.get(col, col))?;
            aug.scale_row(col, inv_pivot);
            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = aug.get(r, col);
                if factor != FieldElement::ZERO {
                    aug.add_scaled_row(r, col, factor);
                }
            }
        }
        Ok(aug.columns(n, 2 * n))
    }

    /// Solves the square linear system `self * x = rhs` for `x`, by
    /// Gauss–Jordan elimination on the augmented system.
    pub fn solve(&self, rhs: &[FieldElement]) -> Result<Vec<FieldElement>> {
        ensure!(self.rows == self.cols, Error::ParameterError("solve requires a square coefficient matrix"));
        ensure!(rhs.len() == self.rows, Error::ParameterError("right-hand side length mismatch"));
        let n = self.rows;
        let f = self.field;
        let mut aug = self.augment(&Matrix::row_vector(f, rhs.to_vec()).transpose())?;

        for col in 0..n {
            let pivot_row = (col..n).find(|&r| aug.get(r, col) != FieldElement::ZERO);
            let pivot_row = pivot_row.ok_or(Error::ParameterError("matrix is singular"))?;
            if pivot_row != col {
                aug.swap_rows(pivot_row, col);
            }
            let inv_pivot = f.inv(aug.get(col, col))?;
            aug.scale_row(col, inv_pivot);
            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = aug.get(r, col);
                if factor != FieldElement::ZERO {
                    aug.add_scaled_row(r, col, factor);
                }
            }
        }
        Ok((0..n).map(|r| aug.get(r, n)).collect())
    }

    /// `F_{2^m}`-rank, by counting pivots produced during Gauss–Jordan
    /// elimination (distinct from [`crate::field::rank_f2`], which computes
    /// `F_2`-rank of a set of field elements).
    #[must_use]
    pub fn rank(&self) -> usize {
        let f = self.field;
        let mut work = self.clone();
        let mut rank = 0;
        let mut row = 0;
        for col in 0..work.cols {
            if row >= work.rows {
                break;
            }
            let Some(pivot_row) = (row..work.rows).find(|&r| work.get(r, col) != FieldElement::ZERO) else {
                continue;
            };
            work.swap_rows(pivot_row, row);
            let inv_pivot = f.inv(work.get(row, col)).expect("nonzero pivot is invertible");
            work.scale_row(row, inv_pivot);
            for r in (row + 1)..work.rows {
                let factor = work.get(r, col);
                if factor != FieldElement::ZERO {
                    work.add_scaled_row(r, row, factor);
                }
            }
            rank += 1;
            row += 1;
        }
        rank
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }

    fn scale_row(&mut self, r: usize, factor: FieldElement) {
        let f = self.field;
        for c in 0..self.cols {
            let v = self.get(r, c);
            self.set(r, c, f.mul(v, factor));
        }
    }

    /// `row(r) += factor * row(src)`.
    fn add_scaled_row(&mut self, r: usize, src: usize, factor: FieldElement) {
        let f = self.field;
        for c in 0..self.cols {
            let scaled = f.mul(self.get(src, c), factor);
            let sum = f.add(self.get(r, c), scaled);
            self.set(r, c, sum);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_inverts_to_itself() {
        let field = Field::new(8).unwrap();
        let id = Matrix::identity(field, 4);
        assert_eq!(id.invert().unwrap(), id);
    }

    #[test]
    fn invert_then_multiply_is_identity() {
        let field = Field::new(8).unwrap();
        // A small fixed invertible matrix over F_256 (upper triangular with
        // nonzero diagonal is always invertible).
        let rows = vec![
            vec![field.element(1), field.element(5), field.element(9)],
            vec![field.element(0), field.element(3), field.element(2)],
            vec![field.element(0), field.element(0), field.element(7)],
        ];
        let m = Matrix::from_rows(field, rows);
        let inv = m.invert().unwrap();
        let product = m.mul(&inv).unwrap();
        assert_eq!(product, Matrix::identity(field, 3));
    }

    #[test]
    fn singular_matrix_fails_to_invert() {
        let field = Field::new(8).unwrap();
        let rows = vec![
            vec![field.element(1), field.element(1)],
            vec![field.element(1), field.element(1)],
        ];
        let m = Matrix::from_rows(field, rows);
        assert!(m.invert().is_err());
    }

    #[test]
    fn solve_recovers_known_solution() {
        let field = Field::new(8).unwrap();
        let rows = vec![
            vec![field.element(1), field.element(2)],
            vec![field.element(3), field.element(1)],
        ];
        let a = Matrix::from_rows(field, rows);
        let x = vec![field.element(6), field.element(9)];
        let b_vec = a.mul(&Matrix::row_vector(field, x.clone()).transpose()).unwrap();
        let b: Vec<FieldElement> = (0..2).map(|i| b_vec.get(i, 0)).collect();
        let solved = a.solve(&b).unwrap();
        assert_eq!(solved, x);
    }

    #[test]
    fn rank_counts_pivots() {
        let field = Field::new(8).unwrap();
        let rows = vec![
            vec![field.element(1), field.element(2), field.element(3)],
            vec![field.element(2), field.element(4), field.element(6)], // dependent (2x row 0)
            vec![field.element(0), field.element(1), field.element(1)],
        ];
        let m = Matrix::from_rows(field, rows);
        assert_eq!(m.rank(), 2);
    }
}
