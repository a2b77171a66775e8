use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Mach {mach:.3} maps to drag table row {index}, but the table has {len} rows")]
    MachOutOfRange { mach: f64, index: usize, len: usize },

    #[error("Invalid vehicle: {0}")]
    InvalidVehicle(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl SimulationError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SimulationError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        SimulationError::Csv {
            path: path.into(),
            source,
        }
    }
}
