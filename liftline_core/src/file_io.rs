//! # File I/O Module
//!
//! Persistence for wing sessions with safety features:
//! - **Atomic saves**: write to .tmp, sync, rename to prevent corruption
//! - **File locking**: prevent concurrent edits on shared drives
//!
//! ## File Format
//!
//! Sessions are saved as `.wng` files: a flat, whitespace-delimited numeric
//! dump in a fixed field order — section count and rows, run parameters, a
//! results-present flag, and (when present) the angle sweep, full-span
//! station arrays, the equation system, Fourier coefficients, every
//! per-(angle, station) distribution, and the integrated coefficients.
//! Floats are written with six decimal places. Lock files use the
//! `.wng.lock` extension with JSON metadata about who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use liftline_core::file_io::{save_wing, load_wing, FileLock};
//! use liftline_core::wing::Wing;
//! use std::path::Path;
//!
//! let path = Path::new("glider.wng");
//! let lock = FileLock::acquire(path, "engineer@example.com")?;
//!
//! let wing = load_wing(path)?;
//! save_wing(&wing, path)?;
//!
//! drop(lock); // releases the lock
//! # Ok::<(), liftline_core::errors::WingError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::analysis::{Characteristics, EquationSystem, FullSpanStations};
use crate::errors::{WingError, WingResult};
use crate::geometry::{Section, SectionTable};
use crate::params::RunParameters;
use crate::wing::{Wing, WingResults};

/// Save a wing session to `path` with atomic write semantics.
///
/// The whole dump is rendered first, written to a `.tmp` sibling, synced,
/// and renamed over the target, so an interrupted save never leaves a
/// half-written `.wng` file behind.
pub fn save_wing(wing: &Wing, path: &Path) -> WingResult<()> {
    let contents = render_wing(wing);

    let tmp_path = path.with_extension("wng.tmp");
    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        WingError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents.as_bytes()).map_err(|e| {
        WingError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        WingError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        WingError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a wing session from `path`.
///
/// Sections and parameters are taken as stored (planform metrics are
/// re-derived from the table); the results arena is restored verbatim when
/// the results flag is set, without re-running the pipeline.
pub fn load_wing(path: &Path) -> WingResult<Wing> {
    let mut file = File::open(path)
        .map_err(|e| WingError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| WingError::file_error("read", path.display().to_string(), e.to_string()))?;

    parse_wing(&contents, path)
}

fn render_wing(wing: &Wing) -> String {
    let mut out = String::new();
    let params = wing.parameters();

    out.push_str(&format!("{}\n", wing.sections().len()));
    for s in wing.sections().sections() {
        out.push_str(&format!(
            "{:.6} {:.6} {:.6} {:.6} {:.6}\n",
            s.span_y, s.leading_edge_x, s.trailing_edge_x, s.lift_curve_slope, s.zero_lift_angle_deg
        ));
    }

    out.push_str(&format!(
        "{:.6} {:.6} {} {:.6} {:.6} {:.6} {} {}\n",
        params.aoa_start,
        params.aoa_finish,
        params.aoa_count,
        wing.aoa_step(),
        params.fluid_velocity,
        params.fluid_density,
        params.span_stations,
        params.stored_fourier_order(),
    ));

    let results = match wing.results() {
        Some(r) if wing.is_results_up_to_date() => r,
        _ => {
            out.push_str("0\n");
            return out;
        }
    };
    out.push_str("1\n");

    for (deg, rad) in results.aoa_deg.iter().zip(&results.aoa_rad) {
        out.push_str(&format!("{:.6} {:.6}\n", deg, rad));
    }

    let full = &results.fullspan;
    for i in 0..full.len() {
        out.push_str(&format!(
            "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}\n",
            full.y[i],
            full.chord[i],
            full.lift_curve_slope[i],
            full.zero_lift_deg[i],
            full.zero_lift_rad[i],
            full.phi[i],
            full.mu[i],
        ));
    }

    let system = &results.equations;
    for span in &system.control_span {
        out.push_str(&format!("{:.6}\n", span));
    }
    for i in 0..system.order {
        push_row(&mut out, system.lhs_row(i).iter());
    }
    for i in 0..system.order {
        push_row(&mut out, system.rhs.iter().map(|rhs| &rhs[i]));
    }
    for n in 0..system.order {
        push_row(&mut out, results.fourier_terms.iter().map(|terms| &terms[n]));
    }

    let chars = &results.characteristics;
    push_station_major(&mut out, &chars.gamma, full.len());
    push_station_major(&mut out, &chars.lift_coefficient_distribution, full.len());
    push_station_major(&mut out, &chars.induced_velocity_distribution, full.len());
    push_station_major(&mut out, &chars.induced_drag_coefficient_distribution, full.len());

    for cl in &chars.lift_coefficient {
        out.push_str(&format!("{:.6}\n", cl));
    }
    for cdi in &chars.induced_drag_coefficient {
        out.push_str(&format!("{:.6}\n", cdi));
    }

    out
}

fn push_row<'a>(out: &mut String, values: impl Iterator<Item = &'a f64>) {
    let mut first = true;
    for value in values {
        if !first {
            out.push(' ');
        }
        out.push_str(&format!("{:.6}", value));
        first = false;
    }
    out.push('\n');
}

/// Per-(angle, station) arrays are stored one station per line, one column
/// per angle of attack.
fn push_station_major(out: &mut String, rows: &[Vec<f64>], stations: usize) {
    for i in 0..stations {
        push_row(out, rows.iter().map(|per_aoa| &per_aoa[i]));
    }
}

struct Tokens<'a> {
    iter: SplitWhitespace<'a>,
    path: &'a Path,
}

impl<'a> Tokens<'a> {
    fn new(contents: &'a str, path: &'a Path) -> Self {
        Tokens {
            iter: contents.split_whitespace(),
            path,
        }
    }

    fn next(&mut self) -> WingResult<&'a str> {
        self.iter.next().ok_or_else(|| {
            WingError::malformed_file(self.path.display().to_string(), "Unexpected end of file")
        })
    }

    fn f64(&mut self) -> WingResult<f64> {
        let token = self.next()?;
        token.parse().map_err(|_| {
            WingError::malformed_file(
                self.path.display().to_string(),
                format!("Expected a number, found '{}'", token),
            )
        })
    }

    fn usize(&mut self) -> WingResult<usize> {
        let token = self.next()?;
        token.parse().map_err(|_| {
            WingError::malformed_file(
                self.path.display().to_string(),
                format!("Expected a count, found '{}'", token),
            )
        })
    }

    fn f64_vec(&mut self, len: usize) -> WingResult<Vec<f64>> {
        let mut v = Vec::with_capacity(len);
        for _ in 0..len {
            v.push(self.f64()?);
        }
        Ok(v)
    }
}

fn parse_wing(contents: &str, path: &Path) -> WingResult<Wing> {
    let mut t = Tokens::new(contents, path);

    let section_count = t.usize()?;
    let mut rows = Vec::with_capacity(section_count);
    for _ in 0..section_count {
        rows.push(Section::new(
            t.f64()?,
            t.f64()?,
            t.f64()?,
            t.f64()?,
            t.f64()?,
        ));
    }
    let table = SectionTable::from_rows(rows);

    let aoa_start = t.f64()?;
    let aoa_finish = t.f64()?;
    let aoa_count = t.usize()?;
    let aoa_step = t.f64()?;
    let fluid_velocity = t.f64()?;
    let fluid_density = t.f64()?;
    let span_stations = t.usize()?;
    let stored_order = t.usize()?;

    let params = RunParameters {
        aoa_start,
        aoa_finish,
        aoa_count,
        fluid_velocity,
        fluid_density,
        span_stations,
        fourier_order: (stored_order + 1) / 2,
    };

    let has_results = t.usize()? > 0;
    let results = if has_results {
        Some(parse_results(&mut t, aoa_count, span_stations, stored_order)?)
    } else {
        None
    };

    Ok(Wing::restore(
        table,
        params,
        aoa_step,
        results,
        has_results,
        path.to_path_buf(),
    ))
}

fn parse_results(
    t: &mut Tokens<'_>,
    aoa_count: usize,
    span_stations: usize,
    order: usize,
) -> WingResult<WingResults> {
    let stations = 2 * span_stations - 1;

    let mut aoa_deg = Vec::with_capacity(aoa_count);
    let mut aoa_rad = Vec::with_capacity(aoa_count);
    for _ in 0..aoa_count {
        aoa_deg.push(t.f64()?);
        aoa_rad.push(t.f64()?);
    }

    let mut full = FullSpanStations::default();
    for _ in 0..stations {
        full.y.push(t.f64()?);
        full.chord.push(t.f64()?);
        full.lift_curve_slope.push(t.f64()?);
        full.zero_lift_deg.push(t.f64()?);
        full.zero_lift_rad.push(t.f64()?);
        full.phi.push(t.f64()?);
        full.mu.push(t.f64()?);
    }

    let control_span = t.f64_vec(order)?;
    let lhs = t.f64_vec(order * order)?;

    let mut rhs = vec![Vec::with_capacity(order); aoa_count];
    for _ in 0..order {
        for per_aoa in rhs.iter_mut() {
            per_aoa.push(t.f64()?);
        }
    }

    let mut fourier_terms = vec![Vec::with_capacity(order); aoa_count];
    for _ in 0..order {
        for per_aoa in fourier_terms.iter_mut() {
            per_aoa.push(t.f64()?);
        }
    }

    let gamma = parse_station_major(t, aoa_count, stations)?;
    let lift_coefficient_distribution = parse_station_major(t, aoa_count, stations)?;
    let induced_velocity_distribution = parse_station_major(t, aoa_count, stations)?;
    let induced_drag_coefficient_distribution = parse_station_major(t, aoa_count, stations)?;

    let lift_coefficient = t.f64_vec(aoa_count)?;
    let induced_drag_coefficient = t.f64_vec(aoa_count)?;

    Ok(WingResults {
        aoa_deg,
        aoa_rad,
        fullspan: full,
        equations: EquationSystem {
            order,
            control_span,
            lhs,
            rhs,
        },
        fourier_terms,
        characteristics: Characteristics {
            gamma,
            lift_coefficient_distribution,
            induced_velocity_distribution,
            induced_drag_coefficient_distribution,
            lift_coefficient,
            induced_drag_coefficient,
        },
    })
}

fn parse_station_major(
    t: &mut Tokens<'_>,
    aoa_count: usize,
    stations: usize,
) -> WingResult<Vec<Vec<f64>>> {
    let mut rows = vec![Vec::with_capacity(stations); aoa_count];
    for _ in 0..stations {
        for per_aoa in rows.iter_mut() {
            per_aoa.push(t.f64()?);
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// file locking
// ---------------------------------------------------------------------------

/// Lock file metadata stored in `.wng.lock` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where the lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::env::var("COMPUTERNAME").ok())
        .or_else(|| std::env::var("HOST").ok())
}

/// File lock guard that releases the lock when dropped.
///
/// Combines an OS-level advisory lock (via fs2) with a `.lock` metadata file
/// so other users can see who holds the lock and since when.
pub struct FileLock {
    lock_path: PathBuf,
    _lock_file: File,
    /// Lock metadata of this holder
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a wing file.
    ///
    /// Fails with [`WingError::FileLocked`] when another live process holds
    /// the lock; a stale lock (dead pid on this machine, or older than a
    /// day) is taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> WingResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(WingError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                WingError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        lock_file.try_lock_exclusive().map_err(|_| {
            WingError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json =
            serde_json::to_string_pretty(&info).map_err(|e| WingError::SerializationError {
                reason: e.to_string(),
            })?;
        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            WingError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;
        lock_file.sync_all().map_err(|e| {
            WingError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check whether a wing file is locked without acquiring the lock.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // OS lock is released with the handle; the metadata file goes too
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut lock_path = path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> WingResult<LockInfo> {
    let contents = fs::read_to_string(lock_path).map_err(|e| {
        WingError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;
    serde_json::from_str(&contents).map_err(|e| WingError::SerializationError {
        reason: e.to_string(),
    })
}

fn is_lock_stale(info: &LockInfo) -> bool {
    #[cfg(unix)]
    {
        if hostname().as_deref() == Some(info.machine.as_str())
            && fs::metadata(format!("/proc/{}", info.pid)).is_err()
        {
            return true;
        }
    }

    Utc::now() - info.locked_at > chrono::Duration::hours(24)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RunParameters;
    use std::env::temp_dir;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn temp_wing_path(name: &str) -> PathBuf {
        temp_dir().join(format!("liftline_test_{}.wng", name))
    }

    fn computed_wing() -> Wing {
        let mut wing = Wing::new();
        wing.insert_section(Section::new(0.0, 0.0, 1.0, 5.0, -1.0))
            .unwrap();
        wing.insert_section(Section::new(5.0, 0.1, 0.9, 5.0, -1.0))
            .unwrap();
        wing.set_parameters(RunParameters {
            aoa_start: 0.0,
            aoa_finish: 5.0,
            aoa_count: 2,
            fluid_velocity: 50.0,
            fluid_density: 1.225,
            span_stations: 10,
            fourier_order: 4,
        })
        .unwrap();
        wing.compute().unwrap();
        wing
    }

    #[test]
    fn test_roundtrip_with_results() {
        let path = temp_wing_path("roundtrip");
        let mut wing = computed_wing();
        wing.save_to(&path).unwrap();

        let loaded = load_wing(&path).unwrap();
        assert!(loaded.is_parameters_saved());
        assert!(loaded.is_results_up_to_date());
        assert_eq!(loaded.sections().len(), 2);
        assert_eq!(loaded.parameters(), wing.parameters());
        assert!(approx_eq(loaded.aoa_step(), wing.aoa_step(), 1e-6));

        let a = wing.results().unwrap();
        let b = loaded.results().unwrap();
        assert_eq!(a.fullspan.len(), b.fullspan.len());
        for i in 0..a.fullspan.len() {
            assert!(approx_eq(a.fullspan.y[i], b.fullspan.y[i], 1e-6));
            assert!(approx_eq(a.fullspan.phi[i], b.fullspan.phi[i], 1e-6));
            assert!(approx_eq(a.fullspan.mu[i], b.fullspan.mu[i], 1e-6));
        }
        for aoa in 0..2 {
            assert!(approx_eq(
                wing.lift_coefficient(aoa).unwrap(),
                loaded.lift_coefficient(aoa).unwrap(),
                1e-6
            ));
            assert!(approx_eq(
                wing.induced_drag_coefficient(aoa).unwrap(),
                loaded.induced_drag_coefficient(aoa).unwrap(),
                1e-6
            ));
            for i in 0..a.fullspan.len() {
                assert!(approx_eq(
                    wing.gamma(aoa, i).unwrap(),
                    loaded.gamma(aoa, i).unwrap(),
                    1e-6
                ));
                assert!(approx_eq(
                    wing.lift_coefficient_dist(aoa, i).unwrap(),
                    loaded.lift_coefficient_dist(aoa, i).unwrap(),
                    1e-6
                ));
                assert!(approx_eq(
                    wing.induced_velocity_dist(aoa, i).unwrap(),
                    loaded.induced_velocity_dist(aoa, i).unwrap(),
                    1e-6
                ));
                assert!(approx_eq(
                    wing.induced_drag_coefficient_dist(aoa, i).unwrap(),
                    loaded.induced_drag_coefficient_dist(aoa, i).unwrap(),
                    1e-6
                ));
            }
            for n in 0..wing.fourier_order() {
                assert!(approx_eq(
                    a.fourier_terms[aoa][n],
                    b.fourier_terms[aoa][n],
                    1e-6
                ));
            }
        }

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_roundtrip_without_results() {
        let path = temp_wing_path("no_results");
        let mut wing = Wing::new();
        wing.insert_section(Section::new(0.0, 0.0, 1.0, 5.0, 0.0))
            .unwrap();
        wing.insert_section(Section::new(4.0, 0.0, 1.0, 5.0, 0.0))
            .unwrap();
        wing.set_parameters(RunParameters {
            aoa_start: 1.0,
            aoa_finish: 3.0,
            aoa_count: 3,
            fluid_velocity: 20.0,
            fluid_density: 1.0,
            span_stations: 8,
            fourier_order: 3,
        })
        .unwrap();

        wing.save_to(&path).unwrap();
        let loaded = load_wing(&path).unwrap();

        assert!(loaded.results().is_none());
        assert!(!loaded.is_results_up_to_date());
        assert!(loaded.is_parameters_saved());
        assert_eq!(loaded.parameters(), wing.parameters());
        assert!(approx_eq(loaded.metrics().wing_span, 8.0, 1e-6));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_records_file_path() {
        let path = temp_wing_path("default_path");
        let mut wing = computed_wing();

        // never saved: no remembered path
        assert!(wing.save().is_err());

        wing.save_to(&path).unwrap();
        assert_eq!(wing.file_path(), Some(path.as_path()));
        // save to the remembered path now succeeds
        wing.save().unwrap();

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_wing_path("atomic");
        let tmp_path = path.with_extension("wng.tmp");

        let mut wing = computed_wing();
        wing.save_to(&path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let path = temp_wing_path("malformed");
        fs::write(&path, "2\n0.0 0.0 1.0 not_a_number 0.0\n").unwrap();

        let err = load_wing(&path).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_FILE");

        // truncated file
        fs::write(&path, "3\n0.0 0.0 1.0 5.0 0.0\n").unwrap();
        let err = load_wing(&path).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_FILE");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_lock_path_generation() {
        let path = Path::new("/path/to/glider.wng");
        assert_eq!(lock_path_for(path), Path::new("/path/to/glider.wng.lock"));
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_wing_path("lock");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.user_id, "test@example.com");
        assert!(lock.info.pid > 0);

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());
        assert!(FileLock::check(&path).is_some());

        drop(lock);
        assert!(!lock_path.exists());
        assert!(FileLock::check(&path).is_none());

        let _ = fs::remove_file(&path);
    }
}
