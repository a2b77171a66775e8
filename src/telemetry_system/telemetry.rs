use std::fmt;

use crate::constants::STANDARD_GRAVITY;
use crate::trajectory_system::kinematics::FlightPhase;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub time: f64,             // s
    pub altitude: f64,         // m
    pub velocity: f64,         // m/s
    pub acceleration: f64,     // m/s²
    pub drag: f64,             // N, magnitude
    pub mass: f64,             // kg
    pub mach: f64,
    pub thrust: f64,           // N, including the nozzle pressure correction
    pub drag_coefficient: f64,
    pub phase: FlightPhase,
}

/// Output channels of one integrator run, in step order.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    launch_altitude: f64,
    samples: Vec<TrajectorySample>,
}

impl SimulationRun {
    pub fn new(launch_altitude: f64) -> Self {
        SimulationRun {
            launch_altitude,
            samples: Vec::new(),
        }
    }

    pub fn with_capacity(launch_altitude: f64, capacity: usize) -> Self {
        SimulationRun {
            launch_altitude,
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, sample: TrajectorySample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&TrajectorySample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn launch_altitude(&self) -> f64 {
        self.launch_altitude
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    pub fn altitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.altitude)
    }

    pub fn accelerations(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.acceleration)
    }

    pub fn drags(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.drag)
    }

    pub fn masses(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.mass)
    }

    pub fn max_altitude_above_launch(&self) -> f64 {
        self.altitudes().fold(f64::NEG_INFINITY, f64::max) - self.launch_altitude
    }

    // End of the last powered step; None while the motor is still burning.
    pub fn burnout_time(&self) -> Option<f64> {
        let coast = self
            .samples
            .iter()
            .position(|s| s.phase == FlightPhase::Coast)?;
        Some(self.samples[coast.saturating_sub(1)].time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSummary {
    pub apogee: f64,           // m above launch
    pub apogee_time: f64,      // s
    pub max_velocity: f64,     // m/s
    pub max_mach: f64,
    pub max_acceleration: f64, // m/s²
    pub max_drag: f64,         // N
    pub burnout_time: Option<f64>,
    pub flight_time: f64,      // s
    pub final_mass: f64,       // kg
    pub steps: usize,
}

impl FlightSummary {
    pub fn from_run(run: &SimulationRun) -> Self {
        let mut summary = FlightSummary {
            apogee: f64::NEG_INFINITY,
            apogee_time: 0.0,
            max_velocity: 0.0,
            max_mach: 0.0,
            max_acceleration: 0.0,
            max_drag: 0.0,
            burnout_time: run.burnout_time(),
            flight_time: run.last().map_or(0.0, |s| s.time),
            final_mass: run.last().map_or(0.0, |s| s.mass),
            steps: run.len().saturating_sub(1),
        };

        for sample in run.samples() {
            let height = sample.altitude - run.launch_altitude();
            if height > summary.apogee {
                summary.apogee = height;
                summary.apogee_time = sample.time;
            }
            summary.max_velocity = summary.max_velocity.max(sample.velocity.abs());
            summary.max_mach = summary.max_mach.max(sample.mach);
            summary.max_acceleration = summary.max_acceleration.max(sample.acceleration.abs());
            summary.max_drag = summary.max_drag.max(sample.drag);
        }
        if run.is_empty() {
            summary.apogee = 0.0;
        }

        summary
    }

    pub fn max_acceleration_g(&self) -> f64 {
        metric_to_g(self.max_acceleration)
    }
}

pub fn metric_to_g(acceleration: f64) -> f64 {
    acceleration / STANDARD_GRAVITY
}

pub fn g_to_metric(acceleration: f64) -> f64 {
    acceleration * STANDARD_GRAVITY
}

pub(crate) fn format_time(elapsed_time: f64) -> String {
    if elapsed_time >= 60.0 {
        let minutes = (elapsed_time / 60.0).floor();
        let seconds = elapsed_time % 60.0;
        format!("{:.0}m {:.2}s", minutes, seconds)
    } else {
        format!("{:.2}s", elapsed_time)
    }
}

pub(crate) fn format_altitude(altitude: f64) -> String {
    if altitude.abs() >= 1000.0 {
        format!("{:.2} km", altitude / 1000.0)
    } else {
        format!("{:.2} m", altitude)
    }
}

impl fmt::Display for FlightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Apogee: {} at {}",
            format_altitude(self.apogee),
            format_time(self.apogee_time)
        )?;
        writeln!(
            f,
            "Max Velocity: {:.2} m/s (Mach {:.2})",
            self.max_velocity, self.max_mach
        )?;
        writeln!(
            f,
            "Max Acceleration: {:.2} m/s² ({:.2} g)",
            self.max_acceleration,
            self.max_acceleration_g()
        )?;
        writeln!(f, "Max Drag: {:.2} N", self.max_drag)?;
        match self.burnout_time {
            Some(time) => writeln!(f, "Burnout: {}", format_time(time))?,
            None => writeln!(f, "Burnout: not reached")?,
        }
        write!(
            f,
            "Flight Time: {} ({} steps), Final Mass: {:.3} kg",
            format_time(self.flight_time),
            self.steps,
            self.final_mass
        )
    }
}
