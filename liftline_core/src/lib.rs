//! # liftline_core - Lifting-Line Wing Analysis Engine
//!
//! `liftline_core` estimates the lift and induced-drag characteristics of a
//! finite wing with classical Prandtl lifting-line theory. The spanwise
//! circulation distribution is expanded in a truncated Fourier sine series
//! and the coefficients are found by Gauss-Jordan elimination, one linear
//! system per angle of attack.
//!
//! ## Design Philosophy
//!
//! - **Session-owned state**: one [`wing::Wing`] owns the geometry, the run
//!   parameters, and the result arena; every run rebuilds the arena from
//!   scratch, so no stale array sizes can leak between runs
//! - **Structured errors**: every fallible call returns a typed
//!   [`errors::WingError`], not a bare boolean
//! - **JSON-friendly**: inputs and results implement Serialize/Deserialize
//!   for front ends and tooling; the `.wng` disk format stays a flat numeric
//!   dump for compatibility
//!
//! ## Quick Start
//!
//! ```rust
//! use liftline_core::geometry::Section;
//! use liftline_core::params::RunParameters;
//! use liftline_core::wing::Wing;
//!
//! let mut wing = Wing::new();
//! wing.insert_section(Section::new(0.0, 0.0, 1.0, 5.9, -1.2)).unwrap();
//! wing.insert_section(Section::new(4.0, 0.1, 0.9, 5.9, -1.2)).unwrap();
//!
//! wing.set_parameters(RunParameters {
//!     aoa_start: -2.0,
//!     aoa_finish: 8.0,
//!     aoa_count: 11,
//!     fluid_velocity: 40.0,
//!     fluid_density: 1.225,
//!     span_stations: 20,
//!     fourier_order: 5,
//! }).unwrap();
//!
//! wing.compute().unwrap();
//! println!("Cl at first angle: {}", wing.lift_coefficient(0).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - section table and planform metrics
//! - [`params`] - run parameters and validation
//! - [`analysis`] - interpolation, mirroring, equation assembly, characteristics
//! - [`solver`] - Gauss-Jordan elimination
//! - [`wing`] - the analysis session and its accessors
//! - [`file_io`] - `.wng` persistence with atomic saves and locking
//! - [`export`] - optional per-stage diagnostic dumps
//! - [`errors`] - structured error types

pub mod analysis;
pub mod errors;
pub mod export;
pub mod file_io;
pub mod geometry;
pub mod params;
pub mod solver;
pub mod wing;

// Re-export commonly used types at crate root for convenience
pub use errors::{WingError, WingResult};
pub use file_io::{load_wing, save_wing, FileLock};
pub use geometry::{PlanformMetrics, Section, SectionTable};
pub use params::RunParameters;
pub use wing::{Wing, WingResults};
