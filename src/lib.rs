pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use constants::*;
pub use control::environment::{atmosphere, mach, AtmosphereSample};
pub use control::propulsion::{specific_impulse, ThrustProfile};
pub use control::sweep::{BurnData, BurnModel, Configuration, FlightResult, Sweep, SweepOutcome};
pub use control::vehicle::{Airframe, VehicleConfig};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::aerodynamics::{DragTable, PowerState};
pub use trajectory_system::kinematics::{simulate, FlightPhase, IntegratorConfig, TrajectoryIntegrator};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::export::{write_run_csv, write_summary_csv};
pub use telemetry_system::telemetry::{FlightSummary, SimulationRun, TrajectorySample};

// Re-export commonly used utilities
pub use utils::config::SweepConfig;
pub use utils::tables::DirectoryBurnModel;
