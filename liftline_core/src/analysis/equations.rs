//! Assembly of the lifting-line Fourier coefficient equations.
//!
//! At a control station with angular coordinate `phi` and solidity `mu`, the
//! monoplane equation for the coefficients `A_n` reads
//!
//! ```text
//! sum_n ( sin(phi) + n * mu ) * sin(n * phi) * A_n
//!     = sin(phi) * mu * ( alpha - alpha_0 )
//! ```
//!
//! One row is written per control station: `(order + 1) / 2 - 1` rows on the
//! port half walking from near the tip toward the root, one row on the
//! symmetry plane, and the starboard rows mirrored around it. The left-hand
//! matrix is shared by the whole sweep; each angle of attack only changes
//! the right-hand side.

use serde::{Deserialize, Serialize};

use crate::analysis::fullspan::FullSpanStations;

/// Assembled equation system for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquationSystem {
    /// System order (odd)
    pub order: usize,
    /// Span coordinate of the control station behind each row
    pub control_span: Vec<f64>,
    /// Row-major `order x order` coefficient matrix, shared across the sweep
    pub lhs: Vec<f64>,
    /// One right-hand-side vector per angle of attack, `rhs[aoa][row]`
    pub rhs: Vec<Vec<f64>>,
}

impl EquationSystem {
    /// Row `i` of the coefficient matrix.
    pub fn lhs_row(&self, i: usize) -> &[f64] {
        &self.lhs[i * self.order..(i + 1) * self.order]
    }
}

/// Pick control stations from `full` and assemble the system of `order`
/// equations with one right-hand side per entry of `aoa_rad`.
///
/// `span_stations` is the semi-span station count used to locate the
/// symmetry plane inside the sorted full-span array.
pub fn assemble(
    full: &FullSpanStations,
    aoa_rad: &[f64],
    order: usize,
    span_stations: usize,
) -> EquationSystem {
    debug_assert_eq!(full.len(), 2 * span_stations - 1);
    debug_assert_eq!(order % 2, 1);

    let half = (order + 1) / 2;
    let step = station_stride(span_stations, order);
    let total = full.len();

    let mut system = EquationSystem {
        order,
        control_span: vec![0.0; order],
        lhs: vec![0.0; order * order],
        rhs: vec![vec![0.0; order]; aoa_rad.len()],
    };

    for row in 0..order {
        let station = if row < half - 1 {
            // port half, walking inboard from near the tip
            (row + 1) * step
        } else if row == half - 1 {
            // symmetry plane: the root sits in the middle of the sorted array
            span_stations - 1
        } else {
            // starboard half, mirror image of the port ordering
            total - 1 - (order - row) * step
        };
        fill_row(&mut system, row, station, full, aoa_rad);
    }

    system
}

/// Stride used to spread the control stations over the semi-span.
fn station_stride(span_stations: usize, order: usize) -> usize {
    let step = ((span_stations as f64 - 2.0) / ((order as f64 + 1.0) / 2.0)).floor() as usize;
    step.max(1)
}

fn fill_row(
    system: &mut EquationSystem,
    row: usize,
    station: usize,
    full: &FullSpanStations,
    aoa_rad: &[f64],
) {
    let order = system.order;
    let phi = full.phi[station];
    let mu = full.mu[station];
    let sin_phi = phi.sin();

    for n in 1..=order {
        system.lhs[row * order + (n - 1)] =
            (sin_phi + n as f64 * mu) * (n as f64 * phi).sin();
    }
    for (a, &alpha) in aoa_rad.iter().enumerate() {
        system.rhs[a][row] = sin_phi * mu * (alpha - full.zero_lift_rad[station]);
    }
    system.control_span[row] = full.y[station];
}
