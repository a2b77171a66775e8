use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    constants::{
        FRONTAL_RADIUS, GRAVITY, GROUND_CUTOFF, LAUNCH_ALTITUDE, MAX_SIMULATION_TIME,
        NOZZLE_EXIT_RADIUS, TANK_DRY_MASSES, TANK_OUTER_DIAMETERS, THROAT_DIAMETER_START,
        THROAT_DIAMETER_STEP, THROAT_DIAMETER_STOP, TIME_STEP,
    },
    control::{
        sweep::{design_range, grid, Configuration, Sweep},
        vehicle::Airframe,
    },
    errors::SimulationError,
    trajectory_system::kinematics::IntegratorConfig,
};

/// Sweep settings read from TOML. Every table and field is optional.
///
/// ```toml
/// [vehicle]
/// launch_altitude = 600.0
///
/// [integration]
/// dt = 0.05
///
/// [sweep]
/// tanks = [{ outer_diameter = 8.0, dry_mass = 18.5 }]
/// throat_start = 0.7
/// throat_stop = 1.2
/// throat_step = 0.1
///
/// [data]
/// aero_dir = "aero2m8inthroat"
/// motor_dir = "motor"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub vehicle: VehicleSection,
    pub integration: IntegrationSection,
    pub sweep: SweepSection,
    pub data: DataSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleSection {
    pub frontal_radius: f64,
    pub nozzle_exit_radius: f64,
    pub gravity: f64,
    pub launch_altitude: f64,
}

impl Default for VehicleSection {
    fn default() -> Self {
        VehicleSection {
            frontal_radius: FRONTAL_RADIUS,
            nozzle_exit_radius: NOZZLE_EXIT_RADIUS,
            gravity: GRAVITY,
            launch_altitude: LAUNCH_ALTITUDE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrationSection {
    pub dt: f64,
    pub max_time: f64,
    pub ground_cutoff: f64,
}

impl Default for IntegrationSection {
    fn default() -> Self {
        IntegrationSection {
            dt: TIME_STEP,
            max_time: MAX_SIMULATION_TIME,
            ground_cutoff: GROUND_CUTOFF,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TankSection {
    pub outer_diameter: f64, // in
    pub dry_mass: f64,       // kg
}

impl TankSection {
    /// The five tank sizes of the motor study, 6.0 to 8.0 in.
    pub fn standard_grid() -> Vec<TankSection> {
        TANK_OUTER_DIAMETERS
            .iter()
            .zip(TANK_DRY_MASSES.iter())
            .map(|(&outer_diameter, &dry_mass)| TankSection {
                outer_diameter,
                dry_mass,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepSection {
    pub tanks: Vec<TankSection>,
    pub throat_start: f64,
    pub throat_stop: f64,
    pub throat_step: f64,
}

impl Default for SweepSection {
    // Only the 8 in tank has burn data on disk.
    fn default() -> Self {
        let largest = TankSection::standard_grid().pop().into_iter().collect();
        SweepSection {
            tanks: largest,
            throat_start: THROAT_DIAMETER_START,
            throat_stop: THROAT_DIAMETER_STOP,
            throat_step: THROAT_DIAMETER_STEP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSection {
    pub aero_dir: PathBuf,
    pub motor_dir: PathBuf,
    pub reference_flights: bool,
}

impl Default for DataSection {
    fn default() -> Self {
        DataSection {
            aero_dir: PathBuf::from("aero2m8inthroat"),
            motor_dir: PathBuf::from("motor"),
            reference_flights: false,
        }
    }
}

impl SweepConfig {
    pub fn load(path: &Path) -> Result<Self, SimulationError> {
        let text = std::fs::read_to_string(path).map_err(|e| SimulationError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SimulationError> {
        let config: SweepConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        self.integrator().validate()?;

        let vehicle = self.vehicle;
        for (name, value) in [
            ("frontal radius", vehicle.frontal_radius),
            ("gravity", vehicle.gravity),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SimulationError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(vehicle.nozzle_exit_radius >= 0.0) || !vehicle.launch_altitude.is_finite() {
            return Err(SimulationError::InvalidConfig(
                "nozzle exit radius must be non-negative and launch altitude finite".to_string(),
            ));
        }

        if self.sweep.tanks.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "sweep needs at least one tank".to_string(),
            ));
        }
        if let Some(tank) = self
            .sweep
            .tanks
            .iter()
            .find(|tank| !(tank.outer_diameter > 0.0) || !(tank.dry_mass > 0.0))
        {
            return Err(SimulationError::InvalidConfig(format!(
                "tank {:.1} in with dry mass {} kg is not physical",
                tank.outer_diameter, tank.dry_mass
            )));
        }
        if self.throat_diameters().is_empty() {
            return Err(SimulationError::InvalidConfig(format!(
                "throat range {}..={} step {} is empty",
                self.sweep.throat_start, self.sweep.throat_stop, self.sweep.throat_step
            )));
        }
        Ok(())
    }

    pub fn airframe(&self) -> Airframe {
        Airframe {
            frontal_radius: self.vehicle.frontal_radius,
            nozzle_exit_radius: self.vehicle.nozzle_exit_radius,
            gravity: self.vehicle.gravity,
            launch_altitude: self.vehicle.launch_altitude,
        }
    }

    pub fn integrator(&self) -> IntegratorConfig {
        IntegratorConfig {
            dt: self.integration.dt,
            max_time: self.integration.max_time,
            ground_cutoff: self.integration.ground_cutoff,
        }
    }

    pub fn throat_diameters(&self) -> Vec<f64> {
        design_range(
            self.sweep.throat_start,
            self.sweep.throat_stop,
            self.sweep.throat_step,
        )
    }

    pub fn configurations(&self) -> Vec<Configuration> {
        let tanks: Vec<(f64, f64)> = self
            .sweep
            .tanks
            .iter()
            .map(|tank| (tank.outer_diameter, tank.dry_mass))
            .collect();
        grid(&tanks, &self.throat_diameters())
    }

    pub fn sweep(&self) -> Sweep {
        Sweep::new(self.configurations(), self.airframe(), self.integrator())
    }

    /// Aero and motor directories, resolved against `base` when relative.
    pub fn data_dirs(&self, base: &Path) -> (PathBuf, PathBuf) {
        (base.join(&self.data.aero_dir), base.join(&self.data.motor_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_match_motor_study() {
        let config = SweepConfig::from_toml_str("").unwrap();
        assert_eq!(config, SweepConfig::default());

        let configurations = config.configurations();
        assert_eq!(configurations.len(), 6);
        assert!(configurations.iter().all(|c| c.tank_outer_diameter == 8.0));
        assert!(configurations.iter().all(|c| c.dry_mass == 18.5));
        assert_eq!(configurations[0].label(), "od80_throat07");
        assert_eq!(configurations[5].label(), "od80_throat12");

        assert_relative_eq!(config.airframe().launch_altitude, 2000.0 / 3.32808);
        assert_eq!(config.integrator(), IntegratorConfig::default());
    }

    #[test]
    fn test_partial_tables_keep_defaults() {
        let text = r#"
            [integration]
            dt = 0.05

            [data]
            motor_dir = "runs/motor"
        "#;
        let config = SweepConfig::from_toml_str(text).unwrap();
        assert_relative_eq!(config.integrator().dt, 0.05);
        assert_relative_eq!(config.integrator().max_time, MAX_SIMULATION_TIME);
        assert_eq!(config.data.aero_dir, PathBuf::from("aero2m8inthroat"));

        let (aero, motor) = config.data_dirs(Path::new("/data"));
        assert_eq!(aero, PathBuf::from("/data/aero2m8inthroat"));
        assert_eq!(motor, PathBuf::from("/data/runs/motor"));
    }

    #[test]
    fn test_full_tank_grid() {
        let text = r#"
            [sweep]
            tanks = [
                { outer_diameter = 7.0, dry_mass = 15.7 },
                { outer_diameter = 6.0, dry_mass = 13.3 },
            ]
            throat_start = 0.8
            throat_stop = 1.0
            throat_step = 0.1
        "#;
        let config = SweepConfig::from_toml_str(text).unwrap();
        let labels: Vec<String> = config.configurations().iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec![
                "od60_throat08",
                "od60_throat09",
                "od60_throat10",
                "od70_throat08",
                "od70_throat09",
                "od70_throat10",
            ]
        );
        assert_eq!(config.sweep().configurations().len(), 6);
    }

    #[test]
    fn test_standard_grid_pairs_masses() {
        let tanks = TankSection::standard_grid();
        assert_eq!(tanks.len(), 5);
        assert_eq!(tanks[0].outer_diameter, 6.0);
        assert_eq!(tanks[0].dry_mass, 13.3);
        assert_eq!(tanks[4].dry_mass, 18.5);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_dt = "[integration]\ndt = 0.0\n";
        assert!(matches!(
            SweepConfig::from_toml_str(bad_dt),
            Err(SimulationError::InvalidConfig(_))
        ));

        let empty_range = "[sweep]\nthroat_start = 1.2\nthroat_stop = 0.7\n";
        assert!(matches!(
            SweepConfig::from_toml_str(empty_range),
            Err(SimulationError::InvalidConfig(_))
        ));

        let no_tanks = "[sweep]\ntanks = []\n";
        assert!(SweepConfig::from_toml_str(no_tanks).is_err());
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = SweepConfig::from_toml_str("[vehicle]\nmass = 3.0\n").unwrap_err();
        assert!(matches!(err, SimulationError::ConfigParse(_)));
    }
}
