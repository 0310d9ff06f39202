//! # Spanwise Analysis Pipeline
//!
//! The stages that turn a section table and run parameters into aerodynamic
//! characteristics. Each stage is a pure function over the previous stage's
//! output:
//!
//! ```text
//! SectionTable
//!   -> interpolation::interpolate   (semi-span stations)
//!   -> fullspan::build              (mirrored, angle-parameterized stations)
//!   -> equations::assemble          (Fourier coefficient system, one rhs per AoA)
//!   -> solver::solve                (per AoA)
//!   -> characteristics::calculate   (circulation, lift, induced drag)
//! ```
//!
//! The stages hold no state of their own; [`crate::wing::Wing`] owns the
//! ordering and the result arena.

pub mod characteristics;
pub mod equations;
pub mod fullspan;
pub mod interpolation;

pub use characteristics::Characteristics;
pub use equations::EquationSystem;
pub use fullspan::FullSpanStations;
pub use interpolation::SemiSpanStations;
