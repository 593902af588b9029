//! 2x2 Boltzmann transfer matrices and the operations coarse graining composes.
//!
//! Every element of a transfer matrix is an exponential of a coupling, so the
//! matrix is stored in the log domain: element-wise multiplication becomes
//! addition, renormalisation becomes subtraction of the maximum log weight,
//! and entries such as `exp(-10_000)` remain exactly representable. Couplings
//! grow without bound along ferromagnetic and spin-glass trajectories, which
//! would underflow a linear `f64` representation within a handful of
//! generations. Callers observe ordinary linear-domain values through
//! [`TransferMatrix::element`].

use mk_core::errors::{ErrorInfo, MkError};
use serde::{Deserialize, Serialize};

/// Symmetric 2x2 transfer matrix of Boltzmann weights.
///
/// Invariant: every matrix returned by a building or combining operation is
/// renormalised so its maximum element equals one (maximum log weight equals
/// zero).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferMatrix {
    /// Natural logarithms of the matrix elements.
    log: [[f64; 2]; 2],
}

impl TransferMatrix {
    /// Creates a matrix from log-domain weights.
    pub fn from_log_weights(log: [[f64; 2]; 2]) -> Self {
        Self { log }
    }

    /// Creates a matrix from linear-domain elements.
    ///
    /// Non-positive elements map to a log weight of negative infinity and are
    /// rejected by [`TransferMatrix::normalized`] once the whole matrix has
    /// vanished.
    pub fn from_elements(elements: [[f64; 2]; 2]) -> Self {
        Self {
            log: elements.map(|row| row.map(f64::ln)),
        }
    }

    /// Returns the linear-domain element at `(row, col)`.
    pub fn element(&self, row: usize, col: usize) -> f64 {
        self.log[row][col].exp()
    }

    /// Largest linear-domain element of the matrix.
    pub fn max_element(&self) -> f64 {
        self.max_log().exp()
    }

    fn max_log(&self) -> f64 {
        let mut max = f64::NEG_INFINITY;
        for row in &self.log {
            for &weight in row {
                if weight > max {
                    max = weight;
                }
            }
        }
        max
    }

    /// Divides every element by the maximum element.
    ///
    /// Errors when the maximum is zero or non-finite, which is the log-domain
    /// image of the divide-by-zero the linear formulation would hit.
    pub fn normalized(&self) -> Result<Self, MkError> {
        let max = self.max_log();
        if !max.is_finite() {
            return Err(MkError::Numeric(
                ErrorInfo::new(
                    "N001",
                    "cannot renormalise matrix: maximum element is zero or non-finite",
                )
                .with_context("max_log_weight", max.to_string()),
            ));
        }
        Ok(Self {
            log: self.log.map(|row| row.map(|weight| weight - max)),
        })
    }

    /// Element-wise product of two matrices. The caller renormalises.
    pub fn hadamard(&self, other: &Self) -> Self {
        let mut log = [[0.0; 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                log[i][j] = self.log[i][j] + other.log[i][j];
            }
        }
        Self { log }
    }

    /// Ordinary matrix product of two matrices. The caller renormalises.
    pub fn matmul(&self, other: &Self) -> Self {
        let mut log = [[0.0; 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                log[i][j] = log_add(
                    self.log[i][0] + other.log[0][j],
                    self.log[i][1] + other.log[1][j],
                );
            }
        }
        Self { log }
    }

    /// Recovers the coupling encoded by a normalised matrix,
    /// `ln(t00 / t01) / 2`. Exact in the log domain even for couplings whose
    /// linear-domain off-diagonal has underflowed to zero.
    pub fn coupling(&self) -> f64 {
        (self.log[0][0] - self.log[0][1]) / 2.0
    }
}

/// Stable `ln(exp(a) + exp(b))`.
fn log_add(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    if lo == f64::NEG_INFINITY {
        return hi;
    }
    hi + (lo - hi).exp().ln_1p()
}
