//! # Wing Geometry
//!
//! The section table holds the cross-section definitions of the starboard
//! semi-span, sorted root to tip, and derives the planform metrics (span,
//! area, aspect ratio, taper ratio) after every mutation.
//!
//! ## Conventions
//!
//! - `span_y` runs from 0 at the wing root outward; only the starboard half
//!   is described, the port half is mirrored during analysis.
//! - Chord is measured along x: `trailing_edge_x - leading_edge_x`.
//! - `lift_curve_slope` is per radian; `zero_lift_angle_deg` in degrees.
//!
//! ## Example
//!
//! ```rust
//! use liftline_core::geometry::{Section, SectionTable};
//!
//! let mut table = SectionTable::new();
//! table.insert(Section::new(0.0, 0.0, 1.2, 5.9, -1.5)).unwrap();
//! table.insert(Section::new(4.5, 0.2, 1.0, 5.9, -1.5)).unwrap();
//!
//! let metrics = table.metrics();
//! assert!(metrics.wing_span > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{WingError, WingResult};

/// A single wing cross-section definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Spanwise station of the section, measured from the root (m), >= 0
    pub span_y: f64,
    /// Leading edge x coordinate (m)
    pub leading_edge_x: f64,
    /// Trailing edge x coordinate (m), must exceed `leading_edge_x`
    pub trailing_edge_x: f64,
    /// Airfoil lift curve slope (1/rad)
    pub lift_curve_slope: f64,
    /// Airfoil angle of zero lift (deg)
    pub zero_lift_angle_deg: f64,
}

impl Section {
    /// Create a section from raw values.
    pub fn new(
        span_y: f64,
        leading_edge_x: f64,
        trailing_edge_x: f64,
        lift_curve_slope: f64,
        zero_lift_angle_deg: f64,
    ) -> Self {
        Section {
            span_y,
            leading_edge_x,
            trailing_edge_x,
            lift_curve_slope,
            zero_lift_angle_deg,
        }
    }

    /// Local chord length (m)
    pub fn chord(&self) -> f64 {
        self.trailing_edge_x - self.leading_edge_x
    }
}

/// Planform metrics derived from the section table.
///
/// All fields are zero while the table holds fewer than two sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanformMetrics {
    /// Full wing span, twice the described semi-span (m)
    pub wing_span: f64,
    /// Planform area of both halves (m^2)
    pub wing_area: f64,
    /// span^2 / area
    pub aspect_ratio: f64,
    /// Tip chord divided by root chord
    pub taper_ratio: f64,
}

/// Ordered collection of wing cross sections.
///
/// The table is always sorted ascending by `span_y`, with the root
/// (`span_y == 0`) as its first row. Mutations re-sort the table and
/// recompute [`PlanformMetrics`]; callers must treat any previously computed
/// results as stale after a successful mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionTable {
    sections: Vec<Section>,
    metrics: PlanformMetrics,
}

impl SectionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        SectionTable::default()
    }

    /// Number of sections in the table.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True when the table holds no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections sorted ascending by `span_y`.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section at `row`, if in range.
    pub fn get(&self, row: usize) -> Option<&Section> {
        self.sections.get(row)
    }

    /// Current planform metrics.
    pub fn metrics(&self) -> PlanformMetrics {
        self.metrics
    }

    /// Semi-span of the described half (m); zero with fewer than 2 sections.
    pub fn semi_span(&self) -> f64 {
        self.metrics.wing_span / 2.0
    }

    /// Insert a new section.
    ///
    /// Fails when the table is empty and `span_y != 0` (the first section
    /// must be the root), when `span_y` is negative or duplicates an existing
    /// station, or when the trailing edge does not lie behind the leading
    /// edge. On success the table is re-sorted and metrics recomputed.
    pub fn insert(&mut self, section: Section) -> WingResult<()> {
        if self.sections.is_empty() && section.span_y != 0.0 {
            return Err(WingError::invalid_input(
                "span_y",
                section.span_y.to_string(),
                "First section must be the wing root (span_y = 0)",
            ));
        }
        self.validate_common(&section)?;
        if self.station_exists(section.span_y) {
            return Err(duplicate_station(section.span_y));
        }

        self.sections.push(section);
        self.sections
            .sort_by(|a, b| a.span_y.total_cmp(&b.span_y));
        self.recompute_metrics();
        Ok(())
    }

    /// Replace the section at `row`.
    ///
    /// The root row keeps `span_y == 0`; moving it fails. Other rows may
    /// change station as long as the new value stays unique.
    pub fn edit(&mut self, section: Section, row: usize) -> WingResult<()> {
        if row >= self.sections.len() {
            return Err(WingError::RowOutOfRange {
                row,
                rows: self.sections.len(),
            });
        }
        if row == 0 && section.span_y != 0.0 {
            return Err(WingError::invalid_input(
                "span_y",
                section.span_y.to_string(),
                "Root section cannot be moved off span_y = 0",
            ));
        }
        self.validate_common(&section)?;
        if section.span_y != self.sections[row].span_y && self.station_exists(section.span_y) {
            return Err(duplicate_station(section.span_y));
        }

        self.sections[row] = section;
        self.sections
            .sort_by(|a, b| a.span_y.total_cmp(&b.span_y));
        self.recompute_metrics();
        Ok(())
    }

    /// Delete the section at `row`.
    ///
    /// The root can only be deleted once it is the last remaining row.
    pub fn delete(&mut self, row: usize) -> WingResult<()> {
        if row >= self.sections.len() {
            return Err(WingError::RowOutOfRange {
                row,
                rows: self.sections.len(),
            });
        }
        if row == 0 && self.sections.len() > 1 {
            return Err(WingError::invalid_input(
                "row",
                row.to_string(),
                "Root section cannot be deleted while other sections remain",
            ));
        }

        self.sections.remove(row);
        self.recompute_metrics();
        Ok(())
    }

    /// Rebuild a table from raw rows without input validation (file load).
    pub(crate) fn from_rows(mut rows: Vec<Section>) -> Self {
        rows.sort_by(|a, b| a.span_y.total_cmp(&b.span_y));
        let mut table = SectionTable {
            sections: rows,
            metrics: PlanformMetrics::default(),
        };
        table.recompute_metrics();
        table
    }

    fn validate_common(&self, section: &Section) -> WingResult<()> {
        if section.span_y < 0.0 {
            return Err(WingError::invalid_input(
                "span_y",
                section.span_y.to_string(),
                "Span coordinate must be >= 0",
            ));
        }
        if section.trailing_edge_x <= section.leading_edge_x {
            return Err(WingError::invalid_input(
                "trailing_edge_x",
                section.trailing_edge_x.to_string(),
                "Trailing edge must lie behind the leading edge",
            ));
        }
        Ok(())
    }

    fn station_exists(&self, span_y: f64) -> bool {
        self.sections.iter().any(|s| s.span_y == span_y)
    }

    fn recompute_metrics(&mut self) {
        self.metrics = PlanformMetrics::default();

        if self.sections.len() < 2 {
            return;
        }

        let root = &self.sections[0];
        let tip = &self.sections[self.sections.len() - 1];

        // full span covers both the described and the mirrored half
        self.metrics.wing_span = 2.0 * (tip.span_y - root.span_y);

        let mut area = 0.0;
        for pair in self.sections.windows(2) {
            area += (pair[0].chord() + pair[1].chord()) / 2.0 * (pair[1].span_y - pair[0].span_y);
        }
        self.metrics.wing_area = 2.0 * area;

        self.metrics.aspect_ratio =
            self.metrics.wing_span * self.metrics.wing_span / self.metrics.wing_area;
        self.metrics.taper_ratio = tip.chord() / root.chord();
    }
}

fn duplicate_station(span_y: f64) -> WingError {
    WingError::invalid_input(
        "span_y",
        span_y.to_string(),
        "A section at this span station already exists",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Section {
        Section::new(0.0, 0.0, 1.0, 6.0, -1.0)
    }

    fn tip(span_y: f64) -> Section {
        Section::new(span_y, 0.25, 0.75, 6.0, -1.0)
    }

    #[test]
    fn test_first_section_must_be_root() {
        let mut table = SectionTable::new();
        assert!(table.insert(tip(3.0)).is_err());
        assert!(table.insert(root()).is_ok());
        assert!(table.insert(tip(3.0)).is_ok());
    }

    #[test]
    fn test_insert_rejects_bad_sections() {
        let mut table = SectionTable::new();
        table.insert(root()).unwrap();

        // negative station
        assert!(table.insert(Section::new(-1.0, 0.0, 1.0, 6.0, 0.0)).is_err());
        // trailing edge not behind leading edge
        assert!(table.insert(Section::new(2.0, 1.0, 1.0, 6.0, 0.0)).is_err());
        assert!(table.insert(Section::new(2.0, 1.5, 1.0, 6.0, 0.0)).is_err());
        // duplicate station
        assert!(table.insert(Section::new(0.0, 0.0, 1.0, 6.0, 0.0)).is_err());

        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_stays_sorted() {
        let mut table = SectionTable::new();
        table.insert(root()).unwrap();
        table.insert(tip(5.0)).unwrap();
        table.insert(tip(2.0)).unwrap();
        table.insert(tip(3.5)).unwrap();

        let stations: Vec<f64> = table.sections().iter().map(|s| s.span_y).collect();
        assert_eq!(stations, vec![0.0, 2.0, 3.5, 5.0]);

        // moving a row keeps the order
        table.edit(tip(4.9), 1).unwrap();
        let stations: Vec<f64> = table.sections().iter().map(|s| s.span_y).collect();
        assert_eq!(stations, vec![0.0, 3.5, 4.9, 5.0]);
    }

    #[test]
    fn test_root_is_pinned() {
        let mut table = SectionTable::new();
        table.insert(root()).unwrap();
        table.insert(tip(4.0)).unwrap();

        // root station is immutable...
        assert!(table.edit(Section::new(1.0, 0.0, 1.0, 6.0, 0.0), 0).is_err());
        // ...but its other fields may change
        assert!(table.edit(Section::new(0.0, 0.1, 1.1, 6.2, -2.0), 0).is_ok());

        // root cannot be deleted while the tip remains
        assert!(table.delete(0).is_err());
        table.delete(1).unwrap();
        assert!(table.delete(0).is_ok());
        assert!(table.is_empty());
    }

    #[test]
    fn test_edit_rejects_duplicate_station_except_own() {
        let mut table = SectionTable::new();
        table.insert(root()).unwrap();
        table.insert(tip(2.0)).unwrap();
        table.insert(tip(4.0)).unwrap();

        // re-saving a row with its own station is fine
        assert!(table.edit(tip(2.0), 1).is_ok());
        // taking another row's station is not
        assert!(table.edit(tip(4.0), 1).is_err());
        // out of range
        assert!(table.edit(tip(6.0), 3).is_err());
    }

    #[test]
    fn test_rectangular_planform_metrics() {
        let mut table = SectionTable::new();
        table.insert(Section::new(0.0, 0.0, 1.0, 6.0, 0.0)).unwrap();
        table.insert(Section::new(5.0, 0.0, 1.0, 6.0, 0.0)).unwrap();

        let m = table.metrics();
        assert_eq!(m.wing_span, 10.0);
        assert_eq!(m.wing_area, 10.0);
        assert_eq!(m.aspect_ratio, 10.0);
        assert_eq!(m.taper_ratio, 1.0);
    }

    #[test]
    fn test_tapered_planform_metrics() {
        let mut table = SectionTable::new();
        table.insert(Section::new(0.0, 0.0, 2.0, 6.0, 0.0)).unwrap();
        table.insert(Section::new(4.0, 0.5, 1.5, 6.0, 0.0)).unwrap();

        let m = table.metrics();
        assert_eq!(m.wing_span, 8.0);
        // trapezoid: (2.0 + 1.0) / 2 * 4 = 6, both halves = 12
        assert!((m.wing_area - 12.0).abs() < 1e-12);
        assert!((m.aspect_ratio - 64.0 / 12.0).abs() < 1e-12);
        assert_eq!(m.taper_ratio, 0.5);
    }

    #[test]
    fn test_metrics_zeroed_below_two_sections() {
        let mut table = SectionTable::new();
        table.insert(root()).unwrap();
        assert_eq!(table.metrics(), PlanformMetrics::default());
    }
}
