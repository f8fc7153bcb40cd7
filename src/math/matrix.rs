use crate::error::{MatrixError, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Pivot magnitudes below this are treated as numerically zero.
pub const ZERO_THRESHOLD: f64 = 1e-10;

/// A dense, row-major matrix of `f64` values.
///
/// `data.len() == rows * cols` always holds. Every arithmetic operation
/// returns a new `Matrix`; operands are never mutated. The only mutation
/// path is per-element [`Matrix::set`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Builds a matrix from explicit dimensions and a flat row-major buffer.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::InvalidDimension { rows, cols });
        }
        if data.len() != rows * cols {
            return Err(MatrixError::DataLengthMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::InvalidDimension { rows, cols });
        }
        Ok(Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        })
    }

    /// The size x size identity matrix.
    pub fn identity(size: usize) -> Result<Matrix> {
        let mut res = Matrix::zeros(size, size)?;
        for i in 0..size {
            res.data[i * size + i] = 1.0;
        }
        Ok(res)
    }

    /// Matrix with entries drawn uniformly from [-1, 1).
    pub fn random(rows: usize, cols: usize) -> Result<Matrix> {
        let mut rng = rand::thread_rng();
        let mut res = Matrix::zeros(rows, cols)?;
        for v in res.data.iter_mut() {
            *v = rng.gen::<f64>() * 2.0 - 1.0;
        }
        Ok(res)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Reads the element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_index(row, col)?;
        Ok(self.data[row * self.cols + col])
    }

    /// Writes the element at (row, col). Out-of-range writes are rejected
    /// and never grow the buffer.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_index(row, col)?;
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    /// Borrows one row of the underlying buffer.
    pub fn row_slice(&self, row: usize) -> Result<&[f64]> {
        self.check_index(row, 0)?;
        let start = row * self.cols;
        Ok(&self.data[start..start + self.cols])
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Element-wise sum. Operands must have identical shape.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MatrixError::DimensionMismatch {
                left: (self.rows, self.cols),
                right: (other.rows, other.cols),
            });
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a + b)
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Multiplies every element by `scalar`.
    pub fn scale(&self, scalar: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v * scalar).collect(),
        }
    }

    /// Standard matrix product: (self.rows x other.cols).
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(MatrixError::DimensionMismatch {
                left: (self.rows, self.cols),
                right: (other.rows, other.cols),
            });
        }
        let mut res = Matrix::zeros(self.rows, other.cols)?;
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.data[i * self.cols + k] * other.data[k * other.cols + j];
                }
                res.data[i * other.cols + j] = sum;
            }
        }
        Ok(res)
    }

    pub fn transpose(&self) -> Matrix {
        let mut data = vec![0.0; self.data.len()];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Matrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Applies `functor` to every element, returning a new matrix.
    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| functor(v)).collect(),
        }
    }

    /// Determinant via LU decomposition with partial pivoting.
    ///
    /// A pivot below [`ZERO_THRESHOLD`] means the matrix is singular and the
    /// determinant is reported as exactly `0.0` — not an error, unlike
    /// [`Matrix::inverse`].
    pub fn determinant(&self) -> Result<f64> {
        if self.rows != self.cols {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let n = self.rows;
        match n {
            1 => return Ok(self.data[0]),
            2 => return Ok(self.data[0] * self.data[3] - self.data[1] * self.data[2]),
            _ => {}
        }

        let mut scratch = self.data.clone();
        let (_, sign) = match lu_factor(&mut scratch, n) {
            Ok(f) => f,
            Err(MatrixError::SingularMatrix) => return Ok(0.0),
            Err(e) => return Err(e),
        };

        let mut det = sign;
        for k in 0..n {
            let pivot = scratch[k * n + k];
            if pivot.abs() < ZERO_THRESHOLD {
                return Ok(0.0);
            }
            det *= pivot;
        }
        Ok(det)
    }

    /// Inverse via LU decomposition with partial pivoting, solving
    /// `A x = e_k` column by column (forward then backward substitution).
    ///
    /// Fails with `SingularMatrix` when any pivot falls below
    /// [`ZERO_THRESHOLD`].
    pub fn inverse(&self) -> Result<Matrix> {
        if self.rows != self.cols {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let n = self.rows;
        match n {
            1 => {
                let a = self.data[0];
                if a.abs() < ZERO_THRESHOLD {
                    return Err(MatrixError::SingularMatrix);
                }
                return Matrix::new(1, 1, vec![1.0 / a]);
            }
            2 => {
                let (a, b, c, d) = (self.data[0], self.data[1], self.data[2], self.data[3]);
                let det = a * d - b * c;
                if det.abs() < ZERO_THRESHOLD {
                    return Err(MatrixError::SingularMatrix);
                }
                return Matrix::new(2, 2, vec![d / det, -b / det, -c / det, a / det]);
            }
            _ => {}
        }

        // Factor into a scratch copy; the combined L/U buffer is never
        // observable by callers.
        let mut lu = self.data.clone();
        let (perm, _) = lu_factor(&mut lu, n)?;
        if lu[(n - 1) * n + (n - 1)].abs() < ZERO_THRESHOLD {
            return Err(MatrixError::SingularMatrix);
        }

        let mut inv = Matrix::zeros(n, n)?;
        let mut y = vec![0.0; n];
        for k in 0..n {
            // Forward substitution: L y = P e_k (unit lower-triangular L).
            for i in 0..n {
                let mut sum = if perm[i] == k { 1.0 } else { 0.0 };
                for j in 0..i {
                    sum -= lu[i * n + j] * y[j];
                }
                y[i] = sum;
            }
            // Backward substitution: U x = y, pivots on the diagonal.
            for i in (0..n).rev() {
                let mut sum = y[i];
                for j in (i + 1)..n {
                    sum -= lu[i * n + j] * inv.data[j * n + k];
                }
                inv.data[i * n + k] = sum / lu[i * n + i];
            }
        }
        Ok(inv)
    }
}

/// In-place LU factorization with partial pivoting.
///
/// On success `scratch` holds U on and above the diagonal and the
/// elimination factors of unit-lower L strictly below it. Returns the row
/// permutation (`perm[i]` is the original row now in position `i`) and the
/// determinant sign accumulated over the swaps performed. Fails with
/// `SingularMatrix` when a selected pivot is below [`ZERO_THRESHOLD`].
fn lu_factor(scratch: &mut [f64], n: usize) -> Result<(Vec<usize>, f64)> {
    let mut perm: Vec<usize> = (0..n).collect();
    let mut sign = 1.0;

    for k in 0..n - 1 {
        // Largest absolute value in column k, rows k..n.
        let mut p = k;
        for i in (k + 1)..n {
            if scratch[i * n + k].abs() > scratch[p * n + k].abs() {
                p = i;
            }
        }
        if p != k {
            for j in 0..n {
                scratch.swap(p * n + j, k * n + j);
            }
            perm.swap(p, k);
            sign = -sign;
        }

        let pivot = scratch[k * n + k];
        if pivot.abs() < ZERO_THRESHOLD {
            return Err(MatrixError::SingularMatrix);
        }

        for i in (k + 1)..n {
            let factor = scratch[i * n + k] / pivot;
            // Store the factor in the eliminated position: combined L/U buffer.
            scratch[i * n + k] = factor;
            for j in (k + 1)..n {
                scratch[i * n + j] -= factor * scratch[k * n + j];
            }
        }
    }

    Ok((perm, sign))
}
