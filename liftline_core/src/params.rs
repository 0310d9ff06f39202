//! # Run Parameters
//!
//! The knobs of a computation run: angle-of-attack sweep, fluid state, and
//! the discretization of the span and the Fourier series. Parameters are
//! validated as a unit before a session accepts them; a rejected set leaves
//! the session untouched.

use serde::{Deserialize, Serialize};

use crate::errors::{WingError, WingResult};

/// Parameters of a single analysis run.
///
/// `fourier_order` is the user-facing series order. The engine allocates
/// `2 * fourier_order - 1` equations internally so the control stations can
/// be split symmetrically into port wing, symmetry plane, and starboard wing
/// rows; [`RunParameters::stored_fourier_order`] yields that odd count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    /// First angle of attack of the sweep (deg)
    pub aoa_start: f64,
    /// Last angle of attack of the sweep (deg)
    pub aoa_finish: f64,
    /// Number of sweep points, >= 1
    pub aoa_count: usize,
    /// Freestream velocity (m/s), > 0
    pub fluid_velocity: f64,
    /// Fluid density (kg/m^3), > 0
    pub fluid_density: f64,
    /// Number of interpolated semi-span stations
    pub span_stations: usize,
    /// Fourier series order (number of odd sine terms requested)
    pub fourier_order: usize,
}

impl Default for RunParameters {
    fn default() -> Self {
        RunParameters {
            aoa_start: 0.0,
            aoa_finish: 0.0,
            aoa_count: 1,
            fluid_velocity: 0.0,
            // air at 0 Celsius and 1013.25 hPa
            fluid_density: 1.225,
            span_stations: 2,
            fourier_order: 1,
        }
    }
}

impl RunParameters {
    /// Internal (odd) equation-system order: `2 * fourier_order - 1`.
    pub fn stored_fourier_order(&self) -> usize {
        2 * self.fourier_order - 1
    }

    /// Sweep increment between consecutive angles of attack (deg).
    pub fn aoa_step(&self) -> f64 {
        if self.aoa_count > 1 {
            (self.aoa_finish - self.aoa_start) / (self.aoa_count as f64 - 1.0)
        } else {
            0.0
        }
    }

    /// Validate the parameter set against the current section table size.
    ///
    /// All checks run against the set as a unit; the first violated rule is
    /// reported and nothing is partially accepted.
    pub fn validate(&self, section_count: usize) -> WingResult<()> {
        if self.aoa_start == self.aoa_finish {
            if self.aoa_count != 1 {
                return Err(WingError::invalid_input(
                    "aoa_count",
                    self.aoa_count.to_string(),
                    "A single-angle sweep requires exactly one iteration",
                ));
            }
        } else if self.aoa_start < self.aoa_finish {
            if self.aoa_count <= 1 {
                return Err(WingError::invalid_input(
                    "aoa_count",
                    self.aoa_count.to_string(),
                    "An ascending sweep requires more than one iteration",
                ));
            }
        } else {
            return Err(WingError::invalid_input(
                "aoa_start",
                self.aoa_start.to_string(),
                "Sweep start must not exceed sweep finish",
            ));
        }

        if !(self.fluid_velocity > 0.0) {
            return Err(WingError::invalid_input(
                "fluid_velocity",
                self.fluid_velocity.to_string(),
                "Fluid velocity must be positive",
            ));
        }
        if !(self.fluid_density > 0.0) {
            return Err(WingError::invalid_input(
                "fluid_density",
                self.fluid_density.to_string(),
                "Fluid density must be positive",
            ));
        }
        if self.fourier_order < 1 {
            return Err(WingError::invalid_input(
                "fourier_order",
                self.fourier_order.to_string(),
                "Fourier series order must be at least 1",
            ));
        }
        if self.span_stations < section_count {
            return Err(WingError::invalid_input(
                "span_stations",
                self.span_stations.to_string(),
                "Station count must not be below the number of sections",
            ));
        }
        if self.span_stations <= self.fourier_order {
            return Err(WingError::invalid_input(
                "fourier_order",
                self.fourier_order.to_string(),
                "Fourier series order must be below the station count",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RunParameters {
        RunParameters {
            aoa_start: 0.0,
            aoa_finish: 5.0,
            aoa_count: 6,
            fluid_velocity: 50.0,
            fluid_density: 1.225,
            span_stations: 10,
            fourier_order: 4,
        }
    }

    #[test]
    fn test_valid_set_passes() {
        assert!(valid().validate(2).is_ok());
    }

    #[test]
    fn test_sweep_consistency() {
        let mut p = valid();
        p.aoa_finish = 0.0; // equal endpoints
        assert!(p.validate(2).is_err());
        p.aoa_count = 1;
        assert!(p.validate(2).is_ok());

        let mut p = valid();
        p.aoa_count = 1; // ascending sweep with one point
        assert!(p.validate(2).is_err());

        let mut p = valid();
        p.aoa_finish = -5.0; // descending sweep
        assert!(p.validate(2).is_err());
    }

    #[test]
    fn test_fluid_state_must_be_positive() {
        let mut p = valid();
        p.fluid_velocity = 0.0;
        assert!(p.validate(2).is_err());

        let mut p = valid();
        p.fluid_density = -1.0;
        assert!(p.validate(2).is_err());
    }

    #[test]
    fn test_discretization_bounds() {
        let mut p = valid();
        p.span_stations = 1; // below section count
        assert!(p.validate(2).is_err());

        let mut p = valid();
        p.fourier_order = 10; // not below station count
        assert!(p.validate(2).is_err());

        let mut p = valid();
        p.fourier_order = 0;
        assert!(p.validate(2).is_err());
    }

    #[test]
    fn test_stored_order_is_odd() {
        for order in 1..8 {
            let mut p = valid();
            p.fourier_order = order;
            assert_eq!(p.stored_fourier_order() % 2, 1);
            assert_eq!(p.stored_fourier_order(), 2 * order - 1);
        }
    }

    #[test]
    fn test_aoa_step() {
        let p = valid();
        assert!((p.aoa_step() - 1.0).abs() < 1e-12);

        let mut p = valid();
        p.aoa_finish = 0.0;
        p.aoa_count = 1;
        assert_eq!(p.aoa_step(), 0.0);
    }
}
