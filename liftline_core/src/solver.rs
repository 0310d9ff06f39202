//! Gauss-Jordan elimination for dense square systems.
//!
//! The elimination runs on private copies of the inputs, normalizes each
//! pivot row and subtracts it from every other row, leaving the solution in
//! the right-hand-side scratch vector. Pivoting is deliberately minimal: a
//! near-zero diagonal entry is swapped with the immediately following row
//! only, which keeps the pass cheap but cannot recover every ill-conditioned
//! system.

use crate::errors::{WingError, WingResult};

/// Pivot magnitudes below this count as zero.
pub const DEFAULT_EPSILON: f64 = 1e-14;

/// Solve `matrix * x = rhs` for a dense row-major `order x order` matrix.
///
/// Inputs are untouched. A zero pivot on the last row reports
/// [`WingError::SingularSystem`]; the elimination pass still runs to
/// completion first, so the failure is a signal rather than an abort.
pub fn solve(matrix: &[f64], rhs: &[f64], order: usize) -> WingResult<Vec<f64>> {
    solve_with_epsilon(matrix, rhs, order, DEFAULT_EPSILON)
}

/// [`solve`] with an explicit zero-pivot threshold.
pub fn solve_with_epsilon(
    matrix: &[f64],
    rhs: &[f64],
    order: usize,
    epsilon: f64,
) -> WingResult<Vec<f64>> {
    debug_assert_eq!(matrix.len(), order * order);
    debug_assert_eq!(rhs.len(), order);

    let mut m = matrix.to_vec();
    let mut x = rhs.to_vec();
    let mut singular_row = None;

    for r in 0..order {
        if m[r * order + r].abs() < epsilon.abs() {
            if r < order - 1 {
                swap_rows(&mut m, order, r, r + 1);
                x.swap(r, r + 1);
            } else if singular_row.is_none() {
                singular_row = Some(r);
            }
        }

        let pivot_inv = 1.0 / m[r * order + r];
        for c in 0..order {
            m[r * order + c] *= pivot_inv;
        }
        x[r] *= pivot_inv;

        for i in 0..order {
            if i == r {
                continue;
            }
            let factor = m[i * order + r];
            for c in 0..order {
                m[i * order + c] -= factor * m[r * order + c];
            }
            x[i] -= factor * x[r];
        }
    }

    match singular_row {
        Some(pivot_row) => Err(WingError::SingularSystem { pivot_row }),
        None => Ok(x),
    }
}

fn swap_rows(m: &mut [f64], order: usize, row1: usize, row2: usize) {
    for c in 0..order {
        m.swap(row1 * order + c, row2 * order + c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_known_system() {
        // [[2, 1], [1, 3]] * x = [5, 10]  =>  x = [1, 3]
        let m = vec![2.0, 1.0, 1.0, 3.0];
        let rhs = vec![5.0, 10.0];

        let x = solve(&m, &rhs, 2).unwrap();
        assert!(approx_eq(x[0], 1.0, 1e-9));
        assert!(approx_eq(x[1], 3.0, 1e-9));
    }

    #[test]
    fn test_three_by_three() {
        // x = [1, -2, 3]
        let m = vec![
            1.0, 2.0, 1.0, //
            3.0, 1.0, 2.0, //
            2.0, 3.0, 4.0, //
        ];
        let rhs = vec![0.0, 7.0, 8.0];

        let x = solve(&m, &rhs, 3).unwrap();
        assert!(approx_eq(x[0], 1.0, 1e-9));
        assert!(approx_eq(x[1], -2.0, 1e-9));
        assert!(approx_eq(x[2], 3.0, 1e-9));
    }

    #[test]
    fn test_zero_leading_pivot_recovers_by_row_swap() {
        // first pivot is zero, next row fills in
        let m = vec![0.0, 1.0, 1.0, 0.0];
        let rhs = vec![2.0, 3.0];

        let x = solve(&m, &rhs, 2).unwrap();
        assert!(approx_eq(x[0], 3.0, 1e-9));
        assert!(approx_eq(x[1], 2.0, 1e-9));
    }

    #[test]
    fn test_singular_system_reports_failure() {
        let m = vec![1.0, 1.0, 1.0, 1.0];
        let rhs = vec![2.0, 2.0];

        let err = solve(&m, &rhs, 2).unwrap_err();
        assert_eq!(err.error_code(), "SINGULAR_SYSTEM");
    }

    #[test]
    fn test_inputs_untouched() {
        let m = vec![2.0, 1.0, 1.0, 3.0];
        let rhs = vec![5.0, 10.0];
        let m_before = m.clone();
        let rhs_before = rhs.clone();

        let _ = solve(&m, &rhs, 2).unwrap();
        assert_eq!(m, m_before);
        assert_eq!(rhs, rhs_before);
    }
}
