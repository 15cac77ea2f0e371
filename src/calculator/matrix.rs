//! # Matrix Workbench Module
//!
//! Two small dense matrices and the operations of the matrix-calculator
//! mode. Validation happens before any computation: add/subtract need equal
//! dimensions, multiply needs compatible ones, determinant and inverse need
//! a square operand, and an inverse is refused outright when the
//! determinant vanishes. Result entries within 1e-10 of zero are cleaned to
//! exact zeros before they are shown.

use nalgebra::DMatrix;
use std::fmt;
use strum_macros::{Display as StrumDisplay, EnumString};

const NEAR_ZERO: f64 = 1e-10;
pub const MAX_DIMENSION: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, StrumDisplay, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum MatrixOp {
    Add,
    Subtract,
    Multiply,
    DeterminantA,
    DeterminantB,
    InverseA,
    InverseB,
    TransposeA,
    TransposeB,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MatrixOutcome {
    Matrix(DMatrix<f64>),
    /// determinant result with its explanation text
    Scalar {
        label: String,
        value: f64,
        explanation: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum MatrixError {
    DimensionMismatch(String),
    NotSquare(String),
    Singular(String),
    BadDimension(String),
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatrixError::DimensionMismatch(msg)
            | MatrixError::NotSquare(msg)
            | MatrixError::Singular(msg)
            | MatrixError::BadDimension(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MatrixError {}

fn cleanup(matrix: DMatrix<f64>) -> DMatrix<f64> {
    matrix.map(|v| if v.abs() < NEAR_ZERO { 0.0 } else { v })
}

fn resized(matrix: &DMatrix<f64>, rows: usize, cols: usize) -> DMatrix<f64> {
    DMatrix::from_fn(rows, cols, |i, j| {
        if i < matrix.nrows() && j < matrix.ncols() {
            matrix[(i, j)]
        } else {
            0.0
        }
    })
}

pub struct MatrixWorkbench {
    pub matrix_a: DMatrix<f64>,
    pub matrix_b: DMatrix<f64>,
}

impl MatrixWorkbench {
    pub fn new() -> MatrixWorkbench {
        MatrixWorkbench {
            matrix_a: DMatrix::from_row_slice(
                3,
                3,
                &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
            ),
            matrix_b: DMatrix::from_row_slice(
                3,
                3,
                &[9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
            ),
        }
    }

    /// Resizes both operands, preserving the overlapping entries.
    pub fn set_dimensions(&mut self, rows: usize, cols: usize) -> Result<(), MatrixError> {
        if !(1..=MAX_DIMENSION).contains(&rows) || !(1..=MAX_DIMENSION).contains(&cols) {
            return Err(MatrixError::BadDimension(
                "Dimensions must be between 1 and 5".to_string(),
            ));
        }
        self.matrix_a = resized(&self.matrix_a, rows, cols);
        self.matrix_b = resized(&self.matrix_b, rows, cols);
        Ok(())
    }

    pub fn set_a(&mut self, row: usize, col: usize, value: f64) {
        assert!(
            row < self.matrix_a.nrows() && col < self.matrix_a.ncols(),
            "entry out of range"
        );
        self.matrix_a[(row, col)] = value;
    }

    pub fn set_b(&mut self, row: usize, col: usize, value: f64) {
        assert!(
            row < self.matrix_b.nrows() && col < self.matrix_b.ncols(),
            "entry out of range"
        );
        self.matrix_b[(row, col)] = value;
    }

    fn operand(&self, op: MatrixOp) -> (&DMatrix<f64>, &'static str) {
        match op {
            MatrixOp::DeterminantA | MatrixOp::InverseA | MatrixOp::TransposeA => {
                (&self.matrix_a, "A")
            }
            _ => (&self.matrix_b, "B"),
        }
    }

    fn determinant(&self, op: MatrixOp) -> Result<MatrixOutcome, MatrixError> {
        let (matrix, label) = self.operand(op);
        if !matrix.is_square() {
            return Err(MatrixError::NotSquare(format!(
                "Matrix {} must be square for this operation",
                label
            )));
        }
        let determinant = matrix.determinant();
        let value = if determinant.abs() < NEAR_ZERO {
            0.0
        } else {
            determinant
        };
        let mut explanation = format!("The determinant of matrix {} is {:.4}.\n", label, value);
        if value.abs() < NEAR_ZERO {
            explanation
                .push_str("This matrix is singular (determinant = 0), which means it's not invertible.");
        } else {
            explanation.push_str(&format!(
                "This non-zero determinant indicates that matrix {} is invertible.",
                label
            ));
        }
        Ok(MatrixOutcome::Scalar {
            label: format!("Determinant of {}: {:.4}", label, value),
            value,
            explanation,
        })
    }

    fn inverse(&self, op: MatrixOp) -> Result<MatrixOutcome, MatrixError> {
        let (matrix, label) = self.operand(op);
        if !matrix.is_square() {
            return Err(MatrixError::NotSquare(format!(
                "Matrix {} must be square for this operation",
                label
            )));
        }
        if matrix.determinant().abs() < NEAR_ZERO {
            return Err(MatrixError::Singular(format!(
                "Matrix {} is not invertible (determinant is zero)",
                label
            )));
        }
        match matrix.clone().try_inverse() {
            Some(inverse) => Ok(MatrixOutcome::Matrix(cleanup(inverse))),
            None => Err(MatrixError::Singular(format!(
                "Matrix {} is not invertible (determinant is zero)",
                label
            ))),
        }
    }

    pub fn calculate(&self, op: MatrixOp) -> Result<MatrixOutcome, MatrixError> {
        match op {
            MatrixOp::Add | MatrixOp::Subtract => {
                if self.matrix_a.shape() != self.matrix_b.shape() {
                    return Err(MatrixError::DimensionMismatch(
                        "Matrices must have the same dimensions for addition/subtraction"
                            .to_string(),
                    ));
                }
                let result = if op == MatrixOp::Add {
                    &self.matrix_a + &self.matrix_b
                } else {
                    &self.matrix_a - &self.matrix_b
                };
                Ok(MatrixOutcome::Matrix(cleanup(result)))
            }
            MatrixOp::Multiply => {
                if self.matrix_a.ncols() != self.matrix_b.nrows() {
                    return Err(MatrixError::DimensionMismatch(
                        "Number of columns in Matrix A must equal number of rows in Matrix B for multiplication"
                            .to_string(),
                    ));
                }
                Ok(MatrixOutcome::Matrix(cleanup(&self.matrix_a * &self.matrix_b)))
            }
            MatrixOp::DeterminantA | MatrixOp::DeterminantB => self.determinant(op),
            MatrixOp::InverseA | MatrixOp::InverseB => self.inverse(op),
            MatrixOp::TransposeA => Ok(MatrixOutcome::Matrix(self.matrix_a.transpose())),
            MatrixOp::TransposeB => Ok(MatrixOutcome::Matrix(self.matrix_b.transpose())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_addition_of_defaults() {
        let bench = MatrixWorkbench::new();
        match bench.calculate(MatrixOp::Add).unwrap() {
            MatrixOutcome::Matrix(m) => {
                assert!(m.iter().all(|v| *v == 10.0));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_multiplication_by_identity() {
        let mut bench = MatrixWorkbench::new();
        bench.matrix_b = DMatrix::identity(3, 3);
        match bench.calculate(MatrixOp::Multiply).unwrap() {
            MatrixOutcome::Matrix(m) => assert_eq!(m, bench.matrix_a),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_default_a_is_singular() {
        let bench = MatrixWorkbench::new();
        match bench.calculate(MatrixOp::DeterminantA).unwrap() {
            MatrixOutcome::Scalar {
                value, explanation, ..
            } => {
                assert_eq!(value, 0.0);
                assert!(explanation.contains("singular"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        match bench.calculate(MatrixOp::InverseA) {
            Err(MatrixError::Singular(msg)) => assert!(msg.contains("Matrix A")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_inverse_of_diagonal() {
        let mut bench = MatrixWorkbench::new();
        bench.set_dimensions(2, 2).unwrap();
        bench.matrix_a = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 4.0]);
        match bench.calculate(MatrixOp::InverseA).unwrap() {
            MatrixOutcome::Matrix(m) => {
                assert_relative_eq!(m[(0, 0)], 0.5);
                assert_relative_eq!(m[(1, 1)], 0.25);
                assert_eq!(m[(0, 1)], 0.0);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_transpose() {
        let mut bench = MatrixWorkbench::new();
        bench.set_dimensions(2, 3).unwrap();
        match bench.calculate(MatrixOp::TransposeA).unwrap() {
            MatrixOutcome::Matrix(m) => {
                assert_eq!(m.shape(), (3, 2));
                assert_eq!(m[(1, 0)], bench.matrix_a[(0, 1)]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_non_square_determinant_is_rejected() {
        let mut bench = MatrixWorkbench::new();
        bench.set_dimensions(2, 3).unwrap();
        assert!(matches!(
            bench.calculate(MatrixOp::DeterminantA),
            Err(MatrixError::NotSquare(_))
        ));
        // add/subtract still fine, both operands were resized together
        assert!(bench.calculate(MatrixOp::Add).is_ok());
    }

    #[test]
    fn test_resize_preserves_overlap_and_validates() {
        let mut bench = MatrixWorkbench::new();
        bench.set_dimensions(2, 2).unwrap();
        assert_eq!(bench.matrix_a[(1, 1)], 5.0);
        bench.set_dimensions(3, 3).unwrap();
        assert_eq!(bench.matrix_a[(2, 2)], 0.0);
        assert!(matches!(
            bench.set_dimensions(0, 3),
            Err(MatrixError::BadDimension(_))
        ));
        assert!(matches!(
            bench.set_dimensions(3, 6),
            Err(MatrixError::BadDimension(_))
        ));
    }

    #[test]
    fn test_near_zero_cleanup() {
        let mut bench = MatrixWorkbench::new();
        bench.set_dimensions(1, 1).unwrap();
        bench.set_a(0, 0, 1e-12);
        bench.set_b(0, 0, 0.0);
        match bench.calculate(MatrixOp::Add).unwrap() {
            MatrixOutcome::Matrix(m) => assert_eq!(m[(0, 0)], 0.0),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_op_from_str() {
        assert_eq!("determinantA".parse::<MatrixOp>(), Ok(MatrixOp::DeterminantA));
        assert_eq!("add".parse::<MatrixOp>(), Ok(MatrixOp::Add));
        assert!("trace".parse::<MatrixOp>().is_err());
    }
}
