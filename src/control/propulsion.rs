use crate::constants::THRUST_SAMPLE_INTERVAL;
use crate::errors::SimulationError;

/// Motor thrust sampled at a fixed 0.05 s spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrustProfile {
    forces: Vec<f64>,
}

impl ThrustProfile {
    pub fn new(forces: Vec<f64>) -> Result<Self, SimulationError> {
        if let Some((index, force)) = forces
            .iter()
            .enumerate()
            .find(|(_, force)| !force.is_finite() || **force < 0.0)
        {
            return Err(SimulationError::InvalidTable(format!(
                "thrust sample {} is {} N; thrust must be finite and non-negative",
                index, force
            )));
        }
        Ok(ThrustProfile { forces })
    }

    // The motor model pads its output with zeros after the burn, so everything from
    // the first zero (or blank) sample onwards is dropped.
    pub fn from_samples(samples: &[f64]) -> Result<Self, SimulationError> {
        let end = samples
            .iter()
            .position(|force| *force == 0.0 || !force.is_finite())
            .unwrap_or(samples.len());
        Self::new(samples[..end].to_vec())
    }

    pub fn empty() -> Self {
        ThrustProfile { forces: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    pub fn forces(&self) -> &[f64] {
        &self.forces
    }

    pub fn index_at(&self, time: f64) -> usize {
        // negative times saturate to sample 0
        (time / THRUST_SAMPLE_INTERVAL).round() as usize
    }

    /// Thrust at `time`, or `None` once the burn is over.
    pub fn thrust_at(&self, time: f64) -> Option<f64> {
        self.forces.get(self.index_at(time)).copied()
    }

    pub fn burn_time(&self) -> f64 {
        self.forces.len() as f64 * THRUST_SAMPLE_INTERVAL
    }

    pub fn total_impulse(&self) -> f64 {
        self.forces.iter().sum::<f64>() * THRUST_SAMPLE_INTERVAL
    }

    pub fn peak_thrust(&self) -> f64 {
        self.forces.iter().copied().fold(0.0, f64::max)
    }
}

pub fn specific_impulse(
    total_impulse: f64,
    propellant_mass: f64,
    gravity: f64,
) -> Result<f64, SimulationError> {
    if !(propellant_mass > 0.0) {
        return Err(SimulationError::InvalidVehicle(format!(
            "propellant mass must be positive, got {} kg",
            propellant_mass
        )));
    }
    if !(gravity > 0.0) {
        return Err(SimulationError::InvalidVehicle(format!(
            "gravity must be positive, got {} m/s²",
            gravity
        )));
    }
    if !(total_impulse > 0.0) || !total_impulse.is_finite() {
        return Err(SimulationError::InvalidVehicle(format!(
            "total impulse must be positive, got {} N·s",
            total_impulse
        )));
    }
    Ok(total_impulse / propellant_mass / gravity)
}

pub fn mass_flow(thrust: f64, specific_impulse: f64, gravity: f64) -> f64 {
    thrust / (specific_impulse * gravity)
}
