use std::fmt;

use crate::{
    control::{
        propulsion::{specific_impulse, ThrustProfile},
        vehicle::Airframe,
    },
    errors::SimulationError,
    telemetry_system::telemetry::{FlightSummary, SimulationRun},
    trajectory_system::{aerodynamics::DragTable, kinematics::{simulate, IntegratorConfig}},
    utils::units::diameter_code,
};

/// One point of the design grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configuration {
    pub tank_outer_diameter: f64, // in
    pub throat_diameter: f64,     // in
    pub dry_mass: f64,            // kg
}

impl Configuration {
    pub fn new(tank_outer_diameter: f64, throat_diameter: f64, dry_mass: f64) -> Self {
        Configuration {
            tank_outer_diameter,
            throat_diameter,
            dry_mass,
        }
    }

    pub fn throat_code(&self) -> String {
        diameter_code(self.throat_diameter)
    }

    pub fn tank_code(&self) -> String {
        diameter_code(self.tank_outer_diameter)
    }

    pub fn label(&self) -> String {
        format!("od{}_throat{}", self.tank_code(), self.throat_code())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tank OD {:.1} in, throat {:.1} in",
            self.tank_outer_diameter, self.throat_diameter
        )
    }
}

/// Burn-specific inputs for one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BurnData {
    pub thrust_profile: ThrustProfile,
    pub propellant_mass: f64,       // kg
    pub total_impulse: Option<f64>, // N·s, integrated from the profile when absent
    pub drag_table: DragTable,
    pub reference_apogee: Option<f64>, // m above launch
}

impl BurnData {
    pub fn total_impulse(&self) -> f64 {
        self.total_impulse
            .unwrap_or_else(|| self.thrust_profile.total_impulse())
    }
}

pub trait BurnModel {
    fn burn(&self, configuration: &Configuration) -> Result<BurnData, SimulationError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightResult {
    pub configuration: Configuration,
    pub total_impulse: f64,    // N·s
    pub specific_impulse: f64, // s
    pub run: SimulationRun,
    pub summary: FlightSummary,
    pub reference_apogee: Option<f64>,
}

impl FlightResult {
    // Simulated minus reference apogee.
    pub fn apogee_error(&self) -> Option<f64> {
        self.reference_apogee
            .map(|reference| self.summary.apogee - reference)
    }
}

#[derive(Debug)]
pub struct SweepOutcome {
    pub configuration: Configuration,
    pub result: Result<FlightResult, SimulationError>,
}

impl SweepOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs the integrator once per configuration.
///
/// Burn inputs are fetched from the model before each run starts and nothing is
/// carried between runs, so a failed configuration only loses its own result.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    configurations: Vec<Configuration>,
    airframe: Airframe,
    integrator: IntegratorConfig,
}

impl Sweep {
    pub fn new(
        configurations: Vec<Configuration>,
        airframe: Airframe,
        integrator: IntegratorConfig,
    ) -> Self {
        Sweep {
            configurations,
            airframe,
            integrator,
        }
    }

    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    pub fn airframe(&self) -> &Airframe {
        &self.airframe
    }

    pub fn integrator(&self) -> IntegratorConfig {
        self.integrator
    }

    pub fn run(&self, model: &dyn BurnModel) -> Vec<SweepOutcome> {
        self.configurations
            .iter()
            .map(|configuration| SweepOutcome {
                configuration: *configuration,
                result: self.run_configuration(model, configuration),
            })
            .collect()
    }

    pub fn run_configuration(
        &self,
        model: &dyn BurnModel,
        configuration: &Configuration,
    ) -> Result<FlightResult, SimulationError> {
        let burn = model.burn(configuration)?;
        let total_impulse = burn.total_impulse();
        let isp = specific_impulse(total_impulse, burn.propellant_mass, self.airframe.gravity)?;
        let vehicle = self
            .airframe
            .vehicle(configuration.dry_mass, burn.propellant_mass, isp);

        let run = simulate(&vehicle, &burn.thrust_profile, &burn.drag_table, self.integrator)?;
        let summary = FlightSummary::from_run(&run);

        Ok(FlightResult {
            configuration: *configuration,
            total_impulse,
            specific_impulse: isp,
            run,
            summary,
            reference_apogee: burn.reference_apogee,
        })
    }
}

/// Inclusive range `start, start + step, ..., stop`, tolerant of float drift at the end.
pub fn design_range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || stop < start {
        return Vec::new();
    }
    let count = ((stop - start) / step + 1e-9).floor() as usize;
    (0..=count)
        .map(|i| ((start + i as f64 * step) * 1e9).round() / 1e9)
        .collect()
}

/// Every (tank, throat) combination, tanks then throats in ascending order.
pub fn grid(tanks: &[(f64, f64)], throat_diameters: &[f64]) -> Vec<Configuration> {
    let mut tanks = tanks.to_vec();
    tanks.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut throats = throat_diameters.to_vec();
    throats.sort_by(f64::total_cmp);

    tanks
        .iter()
        .flat_map(|&(outer_diameter, dry_mass)| {
            throats
                .iter()
                .map(move |&throat| Configuration::new(outer_diameter, throat, dry_mass))
        })
        .collect()
}
