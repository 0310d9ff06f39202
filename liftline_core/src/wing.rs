//! # Wing Session
//!
//! [`Wing`] owns one wing's section table, run parameters, and the result
//! arena of the last computation. All geometry and parameter changes go
//! through the session so staleness tracking stays correct: any successful
//! mutation invalidates previously computed results, and [`Wing::compute`]
//! rebuilds every derived array from scratch.
//!
//! ## Example
//!
//! ```rust
//! use liftline_core::geometry::Section;
//! use liftline_core::params::RunParameters;
//! use liftline_core::wing::Wing;
//!
//! let mut wing = Wing::new();
//! wing.insert_section(Section::new(0.0, 0.0, 1.0, 5.0, 0.0)).unwrap();
//! wing.insert_section(Section::new(5.0, 0.0, 1.0, 5.0, 0.0)).unwrap();
//! wing.set_parameters(RunParameters {
//!     aoa_start: 0.0,
//!     aoa_finish: 5.0,
//!     aoa_count: 2,
//!     fluid_velocity: 50.0,
//!     fluid_density: 1.225,
//!     span_stations: 10,
//!     fourier_order: 4,
//! }).unwrap();
//!
//! wing.compute().unwrap();
//! assert!(wing.is_results_up_to_date());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::{characteristics, equations, fullspan, interpolation};
use crate::analysis::{Characteristics, EquationSystem, FullSpanStations, SemiSpanStations};
use crate::errors::{WingError, WingResult};
use crate::export::{PipelineStage, StageSink};
use crate::geometry::{PlanformMetrics, Section, SectionTable};
use crate::params::RunParameters;
use crate::solver;

/// Result arena of one computation run.
///
/// Every array is rebuilt by each run; a failed solve leaves the arrays
/// assembled up to that point with [`Wing::is_results_up_to_date`] false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WingResults {
    /// Swept angles of attack (deg)
    pub aoa_deg: Vec<f64>,
    /// Swept angles of attack (rad)
    pub aoa_rad: Vec<f64>,
    /// Mirrored full-span stations
    pub fullspan: FullSpanStations,
    /// Assembled Fourier coefficient system
    pub equations: EquationSystem,
    /// Solved coefficients, `fourier_terms[aoa][n]`
    pub fourier_terms: Vec<Vec<f64>>,
    /// Distributions and integrated coefficients
    pub characteristics: Characteristics,
}

/// A single wing analysis session.
pub struct Wing {
    sections: SectionTable,
    params: RunParameters,
    parameters_saved: bool,
    aoa_step: f64,
    results: Option<WingResults>,
    results_up_to_date: bool,
    file_path: Option<PathBuf>,
    stage_sink: Option<Box<dyn StageSink>>,
}

impl Default for Wing {
    fn default() -> Self {
        Wing {
            sections: SectionTable::new(),
            params: RunParameters::default(),
            parameters_saved: false,
            aoa_step: 0.0,
            results: None,
            results_up_to_date: false,
            file_path: None,
            stage_sink: None,
        }
    }
}

impl fmt::Debug for Wing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wing")
            .field("sections", &self.sections)
            .field("params", &self.params)
            .field("parameters_saved", &self.parameters_saved)
            .field("results_up_to_date", &self.results_up_to_date)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl Wing {
    /// Create an empty session.
    pub fn new() -> Self {
        Wing::default()
    }

    // ------------------------------------------------------------------
    // geometry
    // ------------------------------------------------------------------

    /// The section table, root to tip.
    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    /// Planform metrics of the current table.
    pub fn metrics(&self) -> PlanformMetrics {
        self.sections.metrics()
    }

    /// Insert a section; invalidates previous results on success.
    pub fn insert_section(&mut self, section: Section) -> WingResult<()> {
        self.sections.insert(section)?;
        self.results_up_to_date = false;
        Ok(())
    }

    /// Edit the section at `row`; invalidates previous results on success.
    pub fn edit_section(&mut self, section: Section, row: usize) -> WingResult<()> {
        self.sections.edit(section, row)?;
        self.results_up_to_date = false;
        Ok(())
    }

    /// Delete the section at `row`; invalidates previous results on success.
    pub fn delete_section(&mut self, row: usize) -> WingResult<()> {
        self.sections.delete(row)?;
        self.results_up_to_date = false;
        Ok(())
    }

    // ------------------------------------------------------------------
    // parameters
    // ------------------------------------------------------------------

    /// The last accepted run parameters (defaults before any acceptance).
    pub fn parameters(&self) -> &RunParameters {
        &self.params
    }

    /// Validate and accept a parameter set as a unit.
    pub fn set_parameters(&mut self, params: RunParameters) -> WingResult<()> {
        params.validate(self.sections.len())?;
        self.params = params;
        self.parameters_saved = true;
        self.results_up_to_date = false;
        Ok(())
    }

    /// True once a parameter set has been accepted (or loaded from file).
    pub fn is_parameters_saved(&self) -> bool {
        self.parameters_saved
    }

    /// Sweep increment of the last run (deg); zero before the first run.
    pub fn aoa_step(&self) -> f64 {
        self.aoa_step
    }

    /// Internal (odd) equation-system order.
    pub fn fourier_order(&self) -> usize {
        self.params.stored_fourier_order()
    }

    // ------------------------------------------------------------------
    // results
    // ------------------------------------------------------------------

    /// Result arena of the last run, if any. Check
    /// [`Wing::is_results_up_to_date`] before trusting its contents.
    pub fn results(&self) -> Option<&WingResults> {
        self.results.as_ref()
    }

    /// True when the stored results match the current geometry and
    /// parameters and the last run solved every angle of attack.
    pub fn is_results_up_to_date(&self) -> bool {
        self.results_up_to_date
    }

    /// Angle of attack `aoa` of the sweep (deg).
    pub fn aoa_deg(&self, aoa: usize) -> Option<f64> {
        self.results.as_ref()?.aoa_deg.get(aoa).copied()
    }

    /// Integrated lift coefficient at sweep index `aoa`.
    pub fn lift_coefficient(&self, aoa: usize) -> Option<f64> {
        self.results
            .as_ref()?
            .characteristics
            .lift_coefficient
            .get(aoa)
            .copied()
    }

    /// Integrated induced-drag coefficient at sweep index `aoa`.
    pub fn induced_drag_coefficient(&self, aoa: usize) -> Option<f64> {
        self.results
            .as_ref()?
            .characteristics
            .induced_drag_coefficient
            .get(aoa)
            .copied()
    }

    /// Circulation at (`aoa`, full-span `station`).
    pub fn gamma(&self, aoa: usize, station: usize) -> Option<f64> {
        self.results
            .as_ref()?
            .characteristics
            .gamma
            .get(aoa)?
            .get(station)
            .copied()
    }

    /// Local lift coefficient at (`aoa`, full-span `station`).
    pub fn lift_coefficient_dist(&self, aoa: usize, station: usize) -> Option<f64> {
        self.results
            .as_ref()?
            .characteristics
            .lift_coefficient_distribution
            .get(aoa)?
            .get(station)
            .copied()
    }

    /// Induced velocity ratio at (`aoa`, full-span `station`).
    pub fn induced_velocity_dist(&self, aoa: usize, station: usize) -> Option<f64> {
        self.results
            .as_ref()?
            .characteristics
            .induced_velocity_distribution
            .get(aoa)?
            .get(station)
            .copied()
    }

    /// Local induced-drag coefficient at (`aoa`, full-span `station`).
    pub fn induced_drag_coefficient_dist(&self, aoa: usize, station: usize) -> Option<f64> {
        self.results
            .as_ref()?
            .characteristics
            .induced_drag_coefficient_distribution
            .get(aoa)?
            .get(station)
            .copied()
    }

    /// Span fraction `2 y / span` of a full-span station, in `[-1, 1]`.
    pub fn span_fraction(&self, station: usize) -> Option<f64> {
        let y = self.results.as_ref()?.fullspan.y.get(station)?;
        Some(2.0 * y / self.metrics().wing_span)
    }

    // ------------------------------------------------------------------
    // diagnostics and persistence plumbing
    // ------------------------------------------------------------------

    /// Install (or clear) the stage-dump sink.
    pub fn set_stage_sink(&mut self, sink: Option<Box<dyn StageSink>>) {
        self.stage_sink = sink;
    }

    /// Remove and return the installed stage-dump sink.
    pub fn take_stage_sink(&mut self) -> Option<Box<dyn StageSink>> {
        self.stage_sink.take()
    }

    /// Path of the last successful save or load.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Save the session to `path`, remembering it for [`Wing::save`].
    pub fn save_to(&mut self, path: &Path) -> WingResult<()> {
        crate::file_io::save_wing(self, path)?;
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Save to the remembered path; fails when the session has never been
    /// saved or loaded.
    pub fn save(&mut self) -> WingResult<()> {
        let path = self.file_path.clone().ok_or_else(|| {
            WingError::not_ready("No file path recorded; use save_to first")
        })?;
        crate::file_io::save_wing(self, &path)
    }

    /// Load a session from `path`.
    pub fn load(path: &Path) -> WingResult<Self> {
        crate::file_io::load_wing(path)
    }

    /// Reassemble a session from persisted state (file load only).
    pub(crate) fn restore(
        sections: SectionTable,
        params: RunParameters,
        aoa_step: f64,
        results: Option<WingResults>,
        results_up_to_date: bool,
        file_path: PathBuf,
    ) -> Self {
        Wing {
            sections,
            params,
            parameters_saved: true,
            aoa_step,
            results,
            results_up_to_date,
            file_path: Some(file_path),
            stage_sink: None,
        }
    }

    // ------------------------------------------------------------------
    // computation
    // ------------------------------------------------------------------

    /// Run the full pipeline for the current geometry and parameters.
    ///
    /// Requires at least two sections and an accepted parameter set. The
    /// previous result arena is dropped up front; on a singular equation
    /// system the arrays assembled so far are kept for inspection, the
    /// up-to-date flag stays false, and the first solver error is returned.
    pub fn compute(&mut self) -> WingResult<()> {
        if self.sections.len() < 2 {
            return Err(WingError::not_ready(
                "At least two sections are required",
            ));
        }
        if !self.parameters_saved {
            return Err(WingError::not_ready("Run parameters have not been set"));
        }

        self.results = None;
        self.results_up_to_date = false;

        let metrics = self.sections.metrics();
        let order = self.params.stored_fourier_order();
        let span_stations = self.params.span_stations;
        let velocity = self.params.fluid_velocity;
        self.aoa_step = self.params.aoa_step();

        self.dump(PipelineStage::Parameters, |w| w.format_parameters());

        let (aoa_deg, aoa_rad) = self.iterate_aoa();
        self.dump(PipelineStage::AngleSweep, |_| {
            format_angle_sweep(&aoa_deg, &aoa_rad)
        });

        let semi = interpolation::interpolate(self.sections.sections(), span_stations);
        self.dump(PipelineStage::Interpolated, |_| format_semi_span(&semi));

        let full = fullspan::build(&semi, metrics.wing_span);
        self.dump(PipelineStage::FullSpan, |_| format_full_span(&full));

        let system = equations::assemble(&full, &aoa_rad, order, span_stations);
        self.dump(PipelineStage::EquationsLhs, |_| format_lhs(&system));
        self.dump(PipelineStage::EquationsRhs, |_| format_rhs(&system));

        let mut fourier_terms = vec![vec![0.0; order]; aoa_rad.len()];
        let mut first_failure = None;
        for (a, rhs) in system.rhs.iter().enumerate() {
            match solver::solve(&system.lhs, rhs, order) {
                Ok(x) => fourier_terms[a] = x,
                Err(e) => {
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                }
            }
        }

        if let Some(failure) = first_failure {
            self.results = Some(WingResults {
                aoa_deg,
                aoa_rad,
                fullspan: full,
                equations: system,
                fourier_terms,
                characteristics: Characteristics::default(),
            });
            return Err(failure);
        }

        self.dump(PipelineStage::FourierTerms, |_| {
            format_fourier(&fourier_terms)
        });

        let characteristics = characteristics::calculate(
            &full,
            &fourier_terms,
            metrics.wing_span,
            velocity,
            metrics.aspect_ratio,
        );

        self.results = Some(WingResults {
            aoa_deg,
            aoa_rad,
            fullspan: full,
            equations: system,
            fourier_terms,
            characteristics,
        });
        self.results_up_to_date = true;
        Ok(())
    }

    fn iterate_aoa(&self) -> (Vec<f64>, Vec<f64>) {
        let count = self.params.aoa_count;
        let mut deg = Vec::with_capacity(count);
        let mut rad = Vec::with_capacity(count);
        for i in 0..count {
            let a = self.params.aoa_start + self.aoa_step * i as f64;
            deg.push(a);
            rad.push(a.to_radians());
        }
        (deg, rad)
    }

    fn dump(&mut self, stage: PipelineStage, format: impl Fn(&Wing) -> String) {
        if self.stage_sink.is_some() {
            let contents = format(self);
            if let Some(sink) = self.stage_sink.as_mut() {
                sink.write_stage(stage, &contents);
            }
        }
    }

    fn format_parameters(&self) -> String {
        let p = &self.params;
        format!(
            "aoa_start = {:.6}\naoa_finish = {:.6}\naoa_count = {}\naoa_step = {:.6}\n\
             fluid_velocity = {:.6}\nfluid_density = {:.6}\nspan_stations = {}\nfourier_order = {}\n",
            p.aoa_start,
            p.aoa_finish,
            p.aoa_count,
            self.aoa_step,
            p.fluid_velocity,
            p.fluid_density,
            p.span_stations,
            p.fourier_order,
        )
    }
}

fn format_angle_sweep(deg: &[f64], rad: &[f64]) -> String {
    let mut s = String::new();
    for (d, r) in deg.iter().zip(rad) {
        s.push_str(&format!("{:.6}\t{:.6}\n", d, r));
    }
    s
}

fn format_semi_span(semi: &SemiSpanStations) -> String {
    let mut s = String::new();
    for i in 0..semi.len() {
        s.push_str(&format!(
            "{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\n",
            semi.y[i],
            semi.chord[i],
            semi.lift_curve_slope[i],
            semi.zero_lift_deg[i],
            semi.zero_lift_rad[i],
        ));
    }
    s
}

fn format_full_span(full: &FullSpanStations) -> String {
    let mut s = String::new();
    for i in 0..full.len() {
        s.push_str(&format!(
            "{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\n",
            full.y[i],
            full.chord[i],
            full.lift_curve_slope[i],
            full.zero_lift_deg[i],
            full.zero_lift_rad[i],
            full.phi[i],
            full.mu[i],
        ));
    }
    s
}

fn format_lhs(system: &EquationSystem) -> String {
    let mut s = String::new();
    for i in 0..system.order {
        s.push_str(&format!("{:.6}\t", system.control_span[i]));
        for value in system.lhs_row(i) {
            s.push_str(&format!("\t{:.6}", value));
        }
        s.push('\n');
    }
    s
}

fn format_rhs(system: &EquationSystem) -> String {
    let mut s = String::new();
    for i in 0..system.order {
        s.push_str(&format!("{:.6}\t", system.control_span[i]));
        for rhs in &system.rhs {
            s.push_str(&format!("\t{:.6}", rhs[i]));
        }
        s.push('\n');
    }
    s
}

fn format_fourier(fourier: &[Vec<f64>]) -> String {
    let mut s = String::new();
    if fourier.is_empty() {
        return s;
    }
    for n in 0..fourier[0].len() {
        for terms in fourier {
            s.push_str(&format!("{:.6}\t", terms[n]));
        }
        s.push('\n');
    }
    s
}
