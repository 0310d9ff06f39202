//! Circulation, lift, and induced-drag characteristics from solved Fourier
//! coefficients.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::analysis::fullspan::FullSpanStations;

/// Spanwise distributions and integrated coefficients, per angle of attack.
///
/// Outer index is the angle of attack, inner index the full-span station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Characteristics {
    /// Circulation Gamma (m^2/s)
    pub gamma: Vec<Vec<f64>>,
    /// Local lift coefficient
    pub lift_coefficient_distribution: Vec<Vec<f64>>,
    /// Induced velocity ratio (zero at both tips)
    pub induced_velocity_distribution: Vec<Vec<f64>>,
    /// Local induced-drag coefficient
    pub induced_drag_coefficient_distribution: Vec<Vec<f64>>,
    /// Integrated wing lift coefficient
    pub lift_coefficient: Vec<f64>,
    /// Integrated wing induced-drag coefficient
    pub induced_drag_coefficient: Vec<f64>,
}

/// Evaluate the characteristics for every angle of attack.
///
/// `fourier[aoa]` holds the solved coefficients `A_1 .. A_order`. The
/// integrated lift coefficient comes from trapezoidal integration of the
/// local lift over the span; the induced drag from the series identity
/// `Cdi = pi * AR * sum n * A_n^2`. Induced velocity is pinned to zero at
/// the two tip stations where `sin(phi)` vanishes.
pub fn calculate(
    full: &FullSpanStations,
    fourier: &[Vec<f64>],
    wing_span: f64,
    velocity: f64,
    aspect_ratio: f64,
) -> Characteristics {
    let stations = full.len();
    let sweep = fourier.len();

    let mut out = Characteristics {
        gamma: Vec::with_capacity(sweep),
        lift_coefficient_distribution: Vec::with_capacity(sweep),
        induced_velocity_distribution: Vec::with_capacity(sweep),
        induced_drag_coefficient_distribution: Vec::with_capacity(sweep),
        lift_coefficient: Vec::with_capacity(sweep),
        induced_drag_coefficient: Vec::with_capacity(sweep),
    };

    for terms in fourier {
        let mut gamma = vec![0.0; stations];
        let mut cl_dist = vec![0.0; stations];
        let mut vi_dist = vec![0.0; stations];
        let mut cdi_dist = vec![0.0; stations];
        let mut cl = 0.0;

        for i in 0..stations {
            let phi = full.phi[i];
            let mut gamma_sum = 0.0;
            let mut n_an_sin = 0.0;
            for (n, a_n) in terms.iter().enumerate() {
                let mode = (n + 1) as f64;
                let sin_n_phi = (mode * phi).sin();
                gamma_sum += sin_n_phi * a_n;
                n_an_sin += mode * sin_n_phi * a_n;
            }

            gamma[i] = 2.0 * wing_span * velocity * gamma_sum;
            cl_dist[i] = 2.0 * gamma[i] / (velocity * full.chord[i]);
            vi_dist[i] = if i != 0 && i != stations - 1 {
                -n_an_sin / phi.sin()
            } else {
                0.0
            };
            cdi_dist[i] = -vi_dist[i] * gamma[i] / (velocity * velocity * full.chord[i]);

            if i > 0 {
                cl += (full.y[i] - full.y[i - 1]) * (cl_dist[i] + cl_dist[i - 1]) / 2.0;
            }
        }

        let n_an2: f64 = terms
            .iter()
            .enumerate()
            .map(|(n, a_n)| (n + 1) as f64 * a_n * a_n)
            .sum();

        out.gamma.push(gamma);
        out.lift_coefficient_distribution.push(cl_dist);
        out.induced_velocity_distribution.push(vi_dist);
        out.induced_drag_coefficient_distribution.push(cdi_dist);
        out.lift_coefficient.push(cl / wing_span);
        out.induced_drag_coefficient
            .push(PI * aspect_ratio * n_an2);
    }

    out
}
