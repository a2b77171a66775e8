pub mod export;
pub mod telemetry;
