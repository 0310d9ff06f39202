//! # Liftline CLI Application
//!
//! Terminal front end for the lifting-line engine. Loads a `.wng` session
//! when given a path, otherwise walks through a trapezoidal-wing demo from
//! a few prompts. Pass `--dump <dir>` to capture the intermediate pipeline
//! arrays as text files.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;

use liftline_core::export::DirectorySink;
use liftline_core::{RunParameters, Section, Wing, WingError};

#[derive(Serialize)]
struct SweepSummary {
    wing_span: f64,
    wing_area: f64,
    aspect_ratio: f64,
    taper_ratio: f64,
    aoa_deg: Vec<f64>,
    lift_coefficient: Vec<f64>,
    induced_drag_coefficient: Vec<f64>,
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn main() -> ExitCode {
    println!("Liftline CLI - Lifting-Line Wing Analysis");
    println!("=========================================");
    println!();

    let mut args = env::args().skip(1);
    let mut wing_path: Option<PathBuf> = None;
    let mut dump_dir: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        if arg == "--dump" {
            dump_dir = args.next().map(PathBuf::from);
        } else {
            wing_path = Some(PathBuf::from(arg));
        }
    }

    let result = match wing_path {
        Some(path) => run_file(&path, dump_dir),
        None => run_demo(dump_dir),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run_file(path: &Path, dump_dir: Option<PathBuf>) -> Result<(), WingError> {
    println!("Loading {} ...", path.display());
    let mut wing = Wing::load(path)?;
    install_dump(&mut wing, dump_dir)?;

    println!(
        "  {} sections, {} swept angles",
        wing.sections().len(),
        wing.parameters().aoa_count
    );

    if !wing.is_results_up_to_date() {
        println!("  stored results are stale, recomputing...");
        wing.compute()?;
        wing.save()?;
        println!("  recomputed and saved");
    }

    print_report(&wing);
    Ok(())
}

fn run_demo(dump_dir: Option<PathBuf>) -> Result<(), WingError> {
    println!("No wing file given. Running trapezoidal-wing demo...");
    println!();

    let semi_span = prompt_f64("Semi-span (m) [5.0]: ", 5.0);
    let root_chord = prompt_f64("Root chord (m) [1.2]: ", 1.2);
    let tip_chord = prompt_f64("Tip chord (m) [0.8]: ", 0.8);
    let slope = prompt_f64("Lift curve slope (1/rad) [5.9]: ", 5.9);
    let alpha0 = prompt_f64("Zero-lift angle (deg) [-1.5]: ", -1.5);
    let aoa_start = prompt_f64("Sweep start (deg) [0.0]: ", 0.0);
    let aoa_finish = prompt_f64("Sweep finish (deg) [8.0]: ", 8.0);
    let velocity = prompt_f64("Velocity (m/s) [40.0]: ", 40.0);

    let mut wing = Wing::new();
    wing.insert_section(Section::new(0.0, 0.0, root_chord, slope, alpha0))?;
    wing.insert_section(Section::new(
        semi_span,
        (root_chord - tip_chord) / 2.0,
        (root_chord + tip_chord) / 2.0,
        slope,
        alpha0,
    ))?;

    wing.set_parameters(RunParameters {
        aoa_start,
        aoa_finish,
        aoa_count: if aoa_start == aoa_finish { 1 } else { 9 },
        fluid_velocity: velocity,
        fluid_density: 1.225,
        span_stations: 20,
        fourier_order: 5,
    })?;

    install_dump(&mut wing, dump_dir)?;

    println!();
    println!("Computing...");
    wing.compute()?;

    print_report(&wing);
    Ok(())
}

fn install_dump(wing: &mut Wing, dump_dir: Option<PathBuf>) -> Result<(), WingError> {
    if let Some(dir) = dump_dir {
        println!("  dumping pipeline stages to {}", dir.display());
        wing.set_stage_sink(Some(Box::new(DirectorySink::create(dir)?)));
    }
    Ok(())
}

fn print_report(wing: &Wing) {
    let metrics = wing.metrics();
    let count = wing.parameters().aoa_count;

    println!();
    println!("═══════════════════════════════════════");
    println!("  WING CHARACTERISTICS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Planform:");
    println!("  Span:         {:.3} m", metrics.wing_span);
    println!("  Area:         {:.3} m²", metrics.wing_area);
    println!("  Aspect ratio: {:.3}", metrics.aspect_ratio);
    println!("  Taper ratio:  {:.3}", metrics.taper_ratio);
    println!();
    println!("  {:>8}  {:>10}  {:>10}", "AoA [°]", "Cl", "Cdi");
    println!("  {:->8}  {:->10}  {:->10}", "", "", "");
    for a in 0..count {
        println!(
            "  {:>8.2}  {:>10.5}  {:>10.6}",
            wing.aoa_deg(a).unwrap_or(0.0),
            wing.lift_coefficient(a).unwrap_or(0.0),
            wing.induced_drag_coefficient(a).unwrap_or(0.0),
        );
    }

    let summary = SweepSummary {
        wing_span: metrics.wing_span,
        wing_area: metrics.wing_area,
        aspect_ratio: metrics.aspect_ratio,
        taper_ratio: metrics.taper_ratio,
        aoa_deg: (0..count).filter_map(|a| wing.aoa_deg(a)).collect(),
        lift_coefficient: (0..count).filter_map(|a| wing.lift_coefficient(a)).collect(),
        induced_drag_coefficient: (0..count)
            .filter_map(|a| wing.induced_drag_coefficient(a))
            .collect(),
    };

    println!();
    println!("JSON Output (for tooling/API use):");
    if let Ok(json) = serde_json::to_string_pretty(&summary) {
        println!("{}", json);
    }
}
