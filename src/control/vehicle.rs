use std::f64::consts::PI;

use crate::constants::{FRONTAL_RADIUS, GRAVITY, LAUNCH_ALTITUDE, NOZZLE_EXIT_RADIUS};
use crate::errors::SimulationError;

/// Parameters shared by every configuration in a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Airframe {
    pub frontal_radius: f64,     // m
    pub nozzle_exit_radius: f64, // m
    pub gravity: f64,            // m/s²
    pub launch_altitude: f64,    // m
}

impl Default for Airframe {
    fn default() -> Self {
        Airframe {
            frontal_radius: FRONTAL_RADIUS,
            nozzle_exit_radius: NOZZLE_EXIT_RADIUS,
            gravity: GRAVITY,
            launch_altitude: LAUNCH_ALTITUDE,
        }
    }
}

impl Airframe {
    pub fn vehicle(&self, dry_mass: f64, propellant_mass: f64, specific_impulse: f64) -> VehicleConfig {
        VehicleConfig {
            dry_mass,
            propellant_mass,
            specific_impulse,
            frontal_radius: self.frontal_radius,
            nozzle_exit_radius: self.nozzle_exit_radius,
            gravity: self.gravity,
            launch_altitude: self.launch_altitude,
            initial_velocity: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleConfig {
    pub dry_mass: f64,           // kg
    pub propellant_mass: f64,    // kg
    pub specific_impulse: f64,   // s
    pub frontal_radius: f64,     // m
    pub nozzle_exit_radius: f64, // m
    pub gravity: f64,            // m/s², constant with altitude
    pub launch_altitude: f64,    // m
    pub initial_velocity: f64,   // m/s
}

impl VehicleConfig {
    pub fn new(dry_mass: f64, propellant_mass: f64, specific_impulse: f64) -> Self {
        Airframe::default().vehicle(dry_mass, propellant_mass, specific_impulse)
    }

    pub fn total_mass(&self) -> f64 {
        self.dry_mass + self.propellant_mass
    }

    pub fn frontal_area(&self) -> f64 {
        PI * self.frontal_radius * self.frontal_radius
    }

    pub fn nozzle_exit_area(&self) -> f64 {
        PI * self.nozzle_exit_radius * self.nozzle_exit_radius
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let positive = [
            ("dry mass", self.dry_mass),
            ("propellant mass", self.propellant_mass),
            ("specific impulse", self.specific_impulse),
            ("frontal radius", self.frontal_radius),
            ("gravity", self.gravity),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SimulationError::InvalidVehicle(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if !(self.nozzle_exit_radius >= 0.0) || !self.nozzle_exit_radius.is_finite() {
            return Err(SimulationError::InvalidVehicle(format!(
                "nozzle exit radius must be non-negative, got {}",
                self.nozzle_exit_radius
            )));
        }
        if !self.launch_altitude.is_finite() || !self.initial_velocity.is_finite() {
            return Err(SimulationError::InvalidVehicle(
                "launch altitude and initial velocity must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
