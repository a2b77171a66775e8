use crate::{
    constants::{GROUND_CUTOFF, MAX_SIMULATION_TIME, TIME_STEP},
    control::{
        environment::{atmosphere, mach},
        propulsion::{mass_flow, ThrustProfile},
        vehicle::VehicleConfig,
    },
    errors::SimulationError,
    telemetry_system::telemetry::{SimulationRun, TrajectorySample},
};

use super::aerodynamics::{drag_force, sign, DragTable, PowerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    Powered,
    Coast,
}

impl FlightPhase {
    pub fn power_state(self) -> PowerState {
        match self {
            FlightPhase::Powered => PowerState::On,
            FlightPhase::Coast => PowerState::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlightPhase::Powered => "powered",
            FlightPhase::Coast => "coast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorConfig {
    pub dt: f64,            // s
    pub max_time: f64,      // s, loop runs while t <= max_time
    pub ground_cutoff: f64, // m, loop runs while h > ground_cutoff
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        IntegratorConfig {
            dt: TIME_STEP,
            max_time: MAX_SIMULATION_TIME,
            ground_cutoff: GROUND_CUTOFF,
        }
    }
}

impl IntegratorConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "time step must be positive, got {}",
                self.dt
            )));
        }
        if !self.max_time.is_finite() || self.max_time < 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "max time must be finite and non-negative, got {}",
                self.max_time
            )));
        }
        if !self.ground_cutoff.is_finite() {
            return Err(SimulationError::InvalidConfig(
                "ground cutoff must be finite".to_string(),
            ));
        }
        Ok(())
    }

    fn expected_samples(&self) -> usize {
        ((self.max_time / self.dt) as usize + 2).min(1_000_000)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub time: f64,     // s
    pub altitude: f64, // m
    pub velocity: f64, // m/s, positive up
    pub mass: f64,     // kg
}

impl VehicleState {
    pub fn at_launch(vehicle: &VehicleConfig) -> Self {
        VehicleState {
            time: 0.0,
            altitude: vehicle.launch_altitude,
            velocity: vehicle.initial_velocity,
            mass: vehicle.total_mass(),
        }
    }
}

/// Fixed-step vertical point-mass integrator.
///
/// Each step evaluates forces at the current state, takes the acceleration with the
/// mass the step started with, then burns propellant for the profile thrust only
/// (the nozzle pressure correction burns nothing), advances velocity and finally
/// advances altitude with the new velocity.
pub struct TrajectoryIntegrator<'a> {
    vehicle: &'a VehicleConfig,
    profile: &'a ThrustProfile,
    drag_table: &'a DragTable,
    config: IntegratorConfig,
    state: VehicleState,
    frontal_area: f64,
    nozzle_exit_area: f64,
    reference_pressure: f64,
}

impl<'a> TrajectoryIntegrator<'a> {
    pub fn new(
        vehicle: &'a VehicleConfig,
        profile: &'a ThrustProfile,
        drag_table: &'a DragTable,
        config: IntegratorConfig,
    ) -> Result<Self, SimulationError> {
        vehicle.validate()?;
        config.validate()?;
        if drag_table.is_empty() {
            return Err(SimulationError::InvalidTable(
                "drag table has no rows".to_string(),
            ));
        }

        Ok(TrajectoryIntegrator {
            vehicle,
            profile,
            drag_table,
            config,
            state: VehicleState::at_launch(vehicle),
            frontal_area: vehicle.frontal_area(),
            nozzle_exit_area: vehicle.nozzle_exit_area(),
            reference_pressure: atmosphere(0.0).pressure,
        })
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn phase(&self) -> FlightPhase {
        if self.profile.thrust_at(self.state.time).is_some() {
            FlightPhase::Powered
        } else {
            FlightPhase::Coast
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.time <= self.config.max_time && self.state.altitude > self.config.ground_cutoff
    }

    pub fn initial_sample(&self) -> TrajectorySample {
        TrajectorySample {
            time: self.state.time,
            altitude: self.state.altitude,
            velocity: self.state.velocity,
            acceleration: 0.0,
            drag: 0.0,
            mass: self.state.mass,
            mach: mach(self.state.velocity, self.state.altitude),
            thrust: 0.0,
            drag_coefficient: 0.0,
            phase: self.phase(),
        }
    }

    pub fn step(&mut self) -> Result<TrajectorySample, SimulationError> {
        let VehicleState {
            time,
            altitude,
            velocity,
            mass,
        } = self.state;
        let dt = self.config.dt;
        let gravity = self.vehicle.gravity;

        let air = atmosphere(altitude);
        let mach_number = mach(velocity, altitude);

        let (phase, propellant_thrust) = match self.profile.thrust_at(time) {
            Some(force) => (FlightPhase::Powered, force),
            None => (FlightPhase::Coast, 0.0),
        };
        let thrust = match phase {
            FlightPhase::Powered => {
                propellant_thrust
                    + self.nozzle_exit_area * (self.reference_pressure - air.pressure)
            }
            FlightPhase::Coast => 0.0,
        };
        let drag_coefficient = self
            .drag_table
            .coefficient(mach_number, phase.power_state())?;

        let drag = drag_force(air.density, velocity, self.frontal_area, drag_coefficient);
        let net_force = thrust - sign(velocity) * drag - mass * gravity;
        let acceleration = net_force / mass;

        let burned = mass_flow(propellant_thrust, self.vehicle.specific_impulse, gravity) * dt;
        let new_mass = mass - burned;
        if !(new_mass > 0.0) {
            return Err(SimulationError::InvalidVehicle(format!(
                "vehicle mass reached {:.4} kg at t = {:.2} s; thrust profile outlasts the propellant",
                new_mass,
                time + dt
            )));
        }

        let new_velocity = velocity + acceleration * dt;
        self.state = VehicleState {
            time: time + dt,
            altitude: altitude + new_velocity * dt,
            velocity: new_velocity,
            mass: new_mass,
        };

        Ok(TrajectorySample {
            time: self.state.time,
            altitude: self.state.altitude,
            velocity: self.state.velocity,
            acceleration,
            drag,
            mass: self.state.mass,
            mach: mach_number,
            thrust,
            drag_coefficient,
            phase,
        })
    }

    pub fn run(mut self) -> Result<SimulationRun, SimulationError> {
        let mut run =
            SimulationRun::with_capacity(self.vehicle.launch_altitude, self.config.expected_samples());
        run.record(self.initial_sample());

        while self.is_running() {
            let sample = self.step()?;
            run.record(sample);
        }

        Ok(run)
    }
}

pub fn simulate(
    vehicle: &VehicleConfig,
    profile: &ThrustProfile,
    drag_table: &DragTable,
    config: IntegratorConfig,
) -> Result<SimulationRun, SimulationError> {
    TrajectoryIntegrator::new(vehicle, profile, drag_table, config)?.run()
}
