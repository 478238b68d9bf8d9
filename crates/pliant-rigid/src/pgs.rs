//! Projected Gauss-Seidel for the rigid body constraint system.
//!
//! Solves `A·λ = b` with per-row clamping `λᵢ ∈ [loᵢ, hiᵢ]`, where
//! `A = J·M⁻¹·Jᵀ` is the effective-mass matrix. Gauss-Seidel: each row
//! update reads the latest values of all other multipliers within the
//! same sweep.

use faer::Mat;
use pliant_types::Real;
use tracing::trace;

/// Iteration control for the PGS sweep.
#[derive(Debug, Clone, Copy)]
pub struct PgsSolver {
    pub max_iterations: u32,
    /// Convergence tolerance on the largest multiplier change per sweep.
    pub epsilon: Real,
}

impl PgsSolver {
    pub fn new(max_iterations: u32, epsilon: Real) -> Self {
        Self {
            max_iterations,
            epsilon,
        }
    }

    /// Solve for the clamped multipliers.
    ///
    /// Rows with a (near) zero diagonal are degenerate and keep a zero
    /// multiplier.
    pub fn solve(&self, a: &Mat<f64>, b: &[Real], ranges: &[(Real, Real)]) -> Vec<Real> {
        let n = b.len();
        debug_assert_eq!(a.nrows(), n);
        debug_assert_eq!(a.ncols(), n);
        debug_assert_eq!(ranges.len(), n);

        let mut lambda = vec![0.0; n];
        for sweep in 0..self.max_iterations {
            let mut max_delta: Real = 0.0;
            for i in 0..n {
                let diag = a[(i, i)];
                if diag.abs() < 1.0e-12 {
                    continue;
                }
                let mut residual = b[i];
                for (j, &l) in lambda.iter().enumerate() {
                    residual -= a[(i, j)] * l;
                }
                let (lo, hi) = ranges[i];
                let updated = (lambda[i] + residual / diag).clamp(lo, hi);
                max_delta = max_delta.max((updated - lambda[i]).abs());
                lambda[i] = updated;
            }
            if max_delta < self.epsilon {
                trace!(sweeps = sweep + 1, "PGS converged");
                break;
            }
        }
        lambda
    }
}
