//! Mirroring of semi-span stations into the full-span station set.

use serde::{Deserialize, Serialize};

use crate::analysis::interpolation::SemiSpanStations;

/// Full-span station data, sorted ascending by `y` from the port tip
/// (`y = -span/2`) to the starboard tip (`y = +span/2`).
///
/// `phi` is the angular span coordinate `acos(-2y / span)` in `[0, pi]`;
/// `mu` the local solidity parameter `chord * slope / (4 * span)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullSpanStations {
    pub y: Vec<f64>,
    pub chord: Vec<f64>,
    pub lift_curve_slope: Vec<f64>,
    pub zero_lift_deg: Vec<f64>,
    pub zero_lift_rad: Vec<f64>,
    pub phi: Vec<f64>,
    pub mu: Vec<f64>,
}

impl FullSpanStations {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// Mirror `semi` about the symmetry plane into `2n - 1` stations.
///
/// The root station appears once; every outboard station is duplicated with
/// negated `y` and identical section properties. The merged set is re-sorted
/// by `y` (stable) because the mirrored stations arrive in reverse order.
pub fn build(semi: &SemiSpanStations, wing_span: f64) -> FullSpanStations {
    let n = semi.len();
    let mut rows: Vec<(f64, f64, f64, f64, f64)> = Vec::with_capacity(2 * n - 1);

    for i in 0..n {
        rows.push((
            semi.y[i],
            semi.chord[i],
            semi.lift_curve_slope[i],
            semi.zero_lift_deg[i],
            semi.zero_lift_rad[i],
        ));
    }
    for i in 1..n {
        rows.push((
            -semi.y[i],
            semi.chord[i],
            semi.lift_curve_slope[i],
            semi.zero_lift_deg[i],
            semi.zero_lift_rad[i],
        ));
    }

    rows.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut out = FullSpanStations::default();
    for (y, chord, slope, a0_deg, a0_rad) in rows {
        out.y.push(y);
        out.chord.push(chord);
        out.lift_curve_slope.push(slope);
        out.zero_lift_deg.push(a0_deg);
        out.zero_lift_rad.push(a0_rad);
        out.phi.push((-2.0 * y / wing_span).acos());
        out.mu.push(0.25 * chord * slope / wing_span);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn semi_rect(stations: usize, semi_span: f64) -> SemiSpanStations {
        let mut semi = SemiSpanStations::default();
        for i in 0..stations {
            semi.y
                .push(semi_span * i as f64 / (stations as f64 - 1.0));
            semi.chord.push(1.0);
            semi.lift_curve_slope.push(5.0);
            semi.zero_lift_deg.push(0.0);
            semi.zero_lift_rad.push(0.0);
        }
        semi
    }

    #[test]
    fn test_mirror_length_and_order() {
        let full = build(&semi_rect(5, 4.0), 8.0);

        assert_eq!(full.len(), 9);
        for pair in full.y.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        // port tip, root, starboard tip
        assert!(approx_eq(full.y[0], -4.0, 1e-12));
        assert!(approx_eq(full.y[4], 0.0, 1e-12));
        assert!(approx_eq(full.y[8], 4.0, 1e-12));
    }

    #[test]
    fn test_phi_spans_zero_to_pi() {
        let full = build(&semi_rect(5, 4.0), 8.0);

        assert!(approx_eq(full.phi[0], 0.0, 1e-12));
        assert!(approx_eq(full.phi[4], PI / 2.0, 1e-12));
        assert!(approx_eq(full.phi[8], PI, 1e-12));
        for pair in full.phi.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_solidity_parameter() {
        let full = build(&semi_rect(3, 4.0), 8.0);
        // 0.25 * chord * slope / span = 0.25 * 1 * 5 / 8
        for i in 0..full.len() {
            assert!(approx_eq(full.mu[i], 0.15625, 1e-12));
        }
    }

    #[test]
    fn test_mirrored_stations_share_section_values() {
        let mut semi = semi_rect(4, 3.0);
        // taper so mirrored pairs are distinguishable from neighbours
        semi.chord = vec![2.0, 1.6, 1.2, 0.8];

        let full = build(&semi, 6.0);
        let n = full.len();
        for i in 0..n {
            let j = n - 1 - i;
            assert!(approx_eq(full.y[i], -full.y[j], 1e-12));
            assert!(approx_eq(full.chord[i], full.chord[j], 1e-12));
            assert!(approx_eq(full.phi[i], PI - full.phi[j], 1e-12));
        }
    }
}
