use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::{
    control::sweep::{FlightResult, SweepOutcome},
    errors::SimulationError,
};

use super::telemetry::{metric_to_g, SimulationRun, TrajectorySample};

#[derive(Debug, Serialize)]
struct StepRow {
    time_s: f64,
    altitude_m: f64,
    altitude_agl_m: f64,
    velocity_ms: f64,
    acceleration_ms2: f64,
    acceleration_g: f64,
    drag_n: f64,
    mass_kg: f64,
    mach: f64,
    thrust_n: f64,
    cd: f64,
    phase: &'static str,
}

impl StepRow {
    fn new(sample: &TrajectorySample, launch_altitude: f64) -> Self {
        StepRow {
            time_s: sample.time,
            altitude_m: sample.altitude,
            altitude_agl_m: sample.altitude - launch_altitude,
            velocity_ms: sample.velocity,
            acceleration_ms2: sample.acceleration,
            acceleration_g: metric_to_g(sample.acceleration),
            drag_n: sample.drag,
            mass_kg: sample.mass,
            mach: sample.mach,
            thrust_n: sample.thrust,
            cd: sample.drag_coefficient,
            phase: sample.phase.label(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    configuration: String,
    tank_od_in: f64,
    throat_in: f64,
    dry_mass_kg: f64,
    total_impulse_ns: f64,
    isp_s: f64,
    apogee_m: f64,
    apogee_time_s: f64,
    max_velocity_ms: f64,
    max_mach: f64,
    max_acceleration_g: f64,
    max_drag_n: f64,
    burnout_time_s: Option<f64>,
    flight_time_s: f64,
    reference_apogee_m: Option<f64>,
    apogee_error_m: Option<f64>,
}

impl From<&FlightResult> for SummaryRow {
    fn from(result: &FlightResult) -> Self {
        let summary = &result.summary;
        SummaryRow {
            configuration: result.configuration.label(),
            tank_od_in: result.configuration.tank_outer_diameter,
            throat_in: result.configuration.throat_diameter,
            dry_mass_kg: result.configuration.dry_mass,
            total_impulse_ns: result.total_impulse,
            isp_s: result.specific_impulse,
            apogee_m: summary.apogee,
            apogee_time_s: summary.apogee_time,
            max_velocity_ms: summary.max_velocity,
            max_mach: summary.max_mach,
            max_acceleration_g: summary.max_acceleration_g(),
            max_drag_n: summary.max_drag,
            burnout_time_s: summary.burnout_time,
            flight_time_s: summary.flight_time,
            reference_apogee_m: result.reference_apogee,
            apogee_error_m: result.apogee_error(),
        }
    }
}

/// One row per recorded step, launch sample first.
pub fn write_run_csv<W: Write>(writer: W, run: &SimulationRun) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for sample in run.samples() {
        wtr.serialize(StepRow::new(sample, run.launch_altitude()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per successful configuration; failed outcomes are left out.
pub fn write_summary_csv<W: Write>(writer: W, outcomes: &[SweepOutcome]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for result in outcomes.iter().filter_map(|o| o.result.as_ref().ok()) {
        wtr.serialize(SummaryRow::from(result))?;
    }
    wtr.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<File, SimulationError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SimulationError::io(parent, e))?;
        }
    }
    File::create(path).map_err(|e| SimulationError::io(path, e))
}

pub fn write_run_csv_file(path: &Path, run: &SimulationRun) -> Result<(), SimulationError> {
    write_run_csv(create(path)?, run).map_err(|e| SimulationError::csv(path, e))
}

pub fn write_summary_csv_file(path: &Path, outcomes: &[SweepOutcome]) -> Result<(), SimulationError> {
    write_summary_csv(create(path)?, outcomes).map_err(|e| SimulationError::csv(path, e))
}
