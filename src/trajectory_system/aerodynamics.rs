use crate::constants::DRAG_TABLE_ROWS_PER_MACH;
use crate::errors::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

/// Drag coefficients tabulated against Mach number.
///
/// Row `i` of each column holds the coefficient at Mach `i / 100`. Lookups round to
/// the nearest row; a Mach number past the last row is an error, never a clamp.
#[derive(Debug, Clone, PartialEq)]
pub struct DragTable {
    power_on: Vec<f64>,
    power_off: Vec<f64>,
}

impl DragTable {
    pub fn new(power_on: Vec<f64>, power_off: Vec<f64>) -> Result<Self, SimulationError> {
        if power_on.is_empty() {
            return Err(SimulationError::InvalidTable(
                "drag table has no rows".to_string(),
            ));
        }
        if power_on.len() != power_off.len() {
            return Err(SimulationError::InvalidTable(format!(
                "power-on column has {} rows but power-off column has {}",
                power_on.len(),
                power_off.len()
            )));
        }
        let all = power_on.iter().chain(power_off.iter());
        if let Some(bad) = all.copied().find(|cd| !cd.is_finite() || *cd < 0.0) {
            return Err(SimulationError::InvalidTable(format!(
                "drag coefficient {} is not a finite non-negative value",
                bad
            )));
        }
        Ok(DragTable {
            power_on,
            power_off,
        })
    }

    pub fn uniform(cd: f64, rows: usize) -> Result<Self, SimulationError> {
        Self::new(vec![cd; rows], vec![cd; rows])
    }

    pub fn len(&self) -> usize {
        self.power_on.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power_on.is_empty()
    }

    pub fn max_mach(&self) -> f64 {
        (self.len() - 1) as f64 / DRAG_TABLE_ROWS_PER_MACH
    }

    pub fn column(&self, power: PowerState) -> &[f64] {
        match power {
            PowerState::On => &self.power_on,
            PowerState::Off => &self.power_off,
        }
    }

    pub fn coefficient(&self, mach: f64, power: PowerState) -> Result<f64, SimulationError> {
        let scaled = (mach * DRAG_TABLE_ROWS_PER_MACH).round();
        let column = self.column(power);
        if !(scaled >= 0.0) || scaled >= column.len() as f64 {
            return Err(SimulationError::MachOutOfRange {
                mach,
                index: if scaled.is_finite() && scaled >= 0.0 {
                    scaled as usize
                } else {
                    usize::MAX
                },
                len: column.len(),
            });
        }
        Ok(column[scaled as usize])
    }
}

// sign(0) is 0, so a vehicle at rest feels no drag.
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub fn dynamic_pressure(density: f64, velocity: f64) -> f64 {
    0.5 * density * velocity * velocity
}

pub fn drag_force(density: f64, velocity: f64, area: f64, drag_coefficient: f64) -> f64 {
    dynamic_pressure(density, velocity) * area * drag_coefficient
}

/// Drag along the flight axis: always opposes velocity, zero at rest.
pub fn axial_drag(density: f64, velocity: f64, area: f64, drag_coefficient: f64) -> f64 {
    -sign(velocity) * drag_force(density, velocity, area, drag_coefficient)
}
