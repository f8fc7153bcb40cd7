use std::fmt;

/// Errors raised by the dense matrix engine.
///
/// All variants are programmer/usage errors surfaced synchronously at the
/// call site; nothing is retried or recovered internally.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// A zero row or column count was supplied at construction.
    InvalidDimension { rows: usize, cols: usize },
    /// The supplied flat buffer length does not equal rows * cols.
    DataLengthMismatch { expected: usize, actual: usize },
    /// Operand shapes are incompatible for add/multiply.
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Determinant or inverse requested on a non-square matrix.
    NotSquare { rows: usize, cols: usize },
    /// Inverse requested on a matrix with a pivot below the zero threshold.
    SingularMatrix,
    /// Element access outside [0, rows) x [0, cols).
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::InvalidDimension { rows, cols } => {
                write!(f, "invalid matrix dimensions {rows}x{cols}: both must be positive")
            }
            MatrixError::DataLengthMismatch { expected, actual } => {
                write!(f, "data length mismatch: expected {expected} elements, got {actual}")
            }
            MatrixError::DimensionMismatch { left, right } => {
                write!(
                    f,
                    "dimension mismatch: {}x{} is incompatible with {}x{}",
                    left.0, left.1, right.0, right.1
                )
            }
            MatrixError::NotSquare { rows, cols } => {
                write!(f, "operation requires a square matrix, got {rows}x{cols}")
            }
            MatrixError::SingularMatrix => {
                write!(f, "singular matrix: pivot below zero threshold, cannot invert")
            }
            MatrixError::IndexOutOfBounds { row, col, rows, cols } => {
                write!(f, "index ({row}, {col}) out of bounds for {rows}x{cols} matrix")
            }
        }
    }
}

impl std::error::Error for MatrixError {}

/// Convenience alias used throughout the matrix engine.
pub type Result<T> = std::result::Result<T, MatrixError>;
