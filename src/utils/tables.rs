use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

use crate::{
    control::{
        propulsion::ThrustProfile,
        sweep::{BurnData, BurnModel, Configuration},
    },
    errors::SimulationError,
    trajectory_system::aerodynamics::DragTable,
    utils::units::feet_to_meters,
};

const POWER_OFF_COLUMN: &str = "CD Power-Off";
const POWER_ON_COLUMN: &str = "CD Power-On";
const FLIGHT_TIME_COLUMN: &str = "Time (sec)";
const FLIGHT_ALTITUDE_COLUMN: &str = "Altitude (ft)";
const BURNS_FILE: &str = "burns.csv";

fn reader_for<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File, SimulationError> {
    File::open(path).map_err(|e| SimulationError::io(path, e))
}

#[derive(Debug, Clone, Copy)]
enum Column {
    Named(&'static str),
    Prefix(&'static str),
}

impl Column {
    fn name(self) -> &'static str {
        match self {
            Column::Named(name) | Column::Prefix(name) => name,
        }
    }

    fn matches(self, header: &str) -> bool {
        match self {
            Column::Named(name) => header.eq_ignore_ascii_case(name),
            Column::Prefix(prefix) => header
                .to_ascii_lowercase()
                .starts_with(&prefix.to_ascii_lowercase()),
        }
    }
}

fn column_index(headers: &StringRecord, column: Column, source: &Path) -> Result<usize, SimulationError> {
    headers
        .iter()
        .position(|header| column.matches(header))
        .ok_or_else(|| {
            SimulationError::InvalidTable(format!(
                "{} has no '{}' column",
                source.display(),
                column.name()
            ))
        })
}

// Pulls numeric columns out of a headed CSV. Blank cells become NaN so the caller
// decides whether a gap ends the data or is an error.
fn read_columns<R: Read>(
    reader: R,
    source: &Path,
    columns: &[Column],
) -> Result<Vec<Vec<f64>>, SimulationError> {
    let mut rdr = reader_for(reader);
    let headers = rdr
        .headers()
        .map_err(|e| SimulationError::csv(source, e))?
        .clone();
    let indices = columns
        .iter()
        .map(|column| column_index(&headers, *column, source))
        .collect::<Result<Vec<_>, _>>()?;

    let mut values = vec![Vec::new(); columns.len()];
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| SimulationError::csv(source, e))?;
        for (column, &index) in indices.iter().enumerate() {
            let cell = record.get(index).unwrap_or("");
            let value = if cell.is_empty() {
                f64::NAN
            } else {
                cell.parse::<f64>().map_err(|_| {
                    SimulationError::InvalidTable(format!(
                        "{}: row {} column '{}' is not a number: '{}'",
                        source.display(),
                        row + 2,
                        columns[column].name(),
                        cell
                    ))
                })?
            };
            values[column].push(value);
        }
    }
    Ok(values)
}

/// Drag table from an aero export with `CD Power-Off` / `CD Power-On` columns.
/// Row order is taken as Mach 0.00, 0.01, 0.02, ...
pub fn read_drag_table<R: Read>(reader: R, source: &Path) -> Result<DragTable, SimulationError> {
    let mut columns = read_columns(
        reader,
        source,
        &[Column::Named(POWER_OFF_COLUMN), Column::Named(POWER_ON_COLUMN)],
    )?;
    let power_on = columns.pop().unwrap_or_default();
    let power_off = columns.pop().unwrap_or_default();
    DragTable::new(power_on, power_off)
        .map_err(|e| SimulationError::InvalidTable(format!("{}: {}", source.display(), e)))
}

pub fn load_drag_table(path: &Path) -> Result<DragTable, SimulationError> {
    read_drag_table(open(path)?, path)
}

/// Thrust curve from the first column whose header starts with "thrust".
pub fn read_thrust_curve<R: Read>(reader: R, source: &Path) -> Result<ThrustProfile, SimulationError> {
    let mut columns = read_columns(reader, source, &[Column::Prefix("thrust")])?;
    let samples = columns.pop().unwrap_or_default();
    ThrustProfile::from_samples(&samples)
        .map_err(|e| SimulationError::InvalidTable(format!("{}: {}", source.display(), e)))
}

pub fn load_thrust_curve(path: &Path) -> Result<ThrustProfile, SimulationError> {
    read_thrust_curve(open(path)?, path)
}

/// Peak altitude of a reference flight export, converted to metres.
pub fn read_reference_apogee<R: Read>(reader: R, source: &Path) -> Result<f64, SimulationError> {
    let columns = read_columns(
        reader,
        source,
        &[Column::Named(FLIGHT_TIME_COLUMN), Column::Named(FLIGHT_ALTITUDE_COLUMN)],
    )?;
    columns[1]
        .iter()
        .copied()
        .filter(|h| h.is_finite())
        .reduce(f64::max)
        .map(feet_to_meters)
        .ok_or_else(|| {
            SimulationError::InvalidTable(format!("{} has no altitude samples", source.display()))
        })
}

pub fn load_reference_apogee(path: &Path) -> Result<f64, SimulationError> {
    read_reference_apogee(open(path)?, path)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BurnRecord {
    pub tank_od_in: f64,
    pub throat_in: f64,
    pub total_impulse_ns: f64,
    pub propellant_mass_kg: f64,
}

/// Motor-model results, one row per (tank OD, throat) pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BurnsTable {
    records: Vec<BurnRecord>,
}

impl BurnsTable {
    pub fn read<R: Read>(reader: R, source: &Path) -> Result<Self, SimulationError> {
        let mut rdr = reader_for(reader);
        let records = rdr
            .deserialize()
            .collect::<Result<Vec<BurnRecord>, _>>()
            .map_err(|e| SimulationError::csv(source, e))?;
        Ok(BurnsTable { records })
    }

    pub fn load(path: &Path) -> Result<Self, SimulationError> {
        Self::read(open(path)?, path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn lookup(&self, tank_outer_diameter: f64, throat_diameter: f64) -> Option<&BurnRecord> {
        self.records.iter().find(|record| {
            (record.tank_od_in - tank_outer_diameter).abs() < 1e-6
                && (record.throat_in - throat_diameter).abs() < 1e-6
        })
    }
}

/// Burn data laid out on disk:
///
/// ```text
/// <aero_dir>/throat07.csv              drag table
/// <aero_dir>/flightthroat07.csv        reference flight (optional)
/// <motor_dir>/burns.csv                impulse and propellant per configuration
/// <motor_dir>/thrust_od80_throat07.csv thrust curve
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryBurnModel {
    aero_dir: PathBuf,
    motor_dir: PathBuf,
    burns: BurnsTable,
    reference_flights: bool,
}

impl DirectoryBurnModel {
    pub fn new(
        aero_dir: impl Into<PathBuf>,
        motor_dir: impl Into<PathBuf>,
        reference_flights: bool,
    ) -> Result<Self, SimulationError> {
        let aero_dir = aero_dir.into();
        let motor_dir = motor_dir.into();
        let burns = BurnsTable::load(&motor_dir.join(BURNS_FILE))?;
        Ok(DirectoryBurnModel {
            aero_dir,
            motor_dir,
            burns,
            reference_flights,
        })
    }

    pub fn burns(&self) -> &BurnsTable {
        &self.burns
    }

    pub fn drag_table_path(&self, configuration: &Configuration) -> PathBuf {
        self.aero_dir
            .join(format!("throat{}.csv", configuration.throat_code()))
    }

    pub fn reference_flight_path(&self, configuration: &Configuration) -> PathBuf {
        self.aero_dir
            .join(format!("flightthroat{}.csv", configuration.throat_code()))
    }

    pub fn thrust_curve_path(&self, configuration: &Configuration) -> PathBuf {
        self.motor_dir
            .join(format!("thrust_{}.csv", configuration.label()))
    }
}

impl BurnModel for DirectoryBurnModel {
    fn burn(&self, configuration: &Configuration) -> Result<BurnData, SimulationError> {
        let record = self
            .burns
            .lookup(configuration.tank_outer_diameter, configuration.throat_diameter)
            .ok_or_else(|| {
                SimulationError::MissingData(format!("{} has no entry for {}", BURNS_FILE, configuration))
            })?;

        let thrust_profile = load_thrust_curve(&self.thrust_curve_path(configuration))?;
        let drag_table = load_drag_table(&self.drag_table_path(configuration))?;

        let reference_path = self.reference_flight_path(configuration);
        let reference_apogee = if self.reference_flights && reference_path.exists() {
            Some(load_reference_apogee(&reference_path)?)
        } else {
            None
        };

        Ok(BurnData {
            thrust_profile,
            propellant_mass: record.propellant_mass_kg,
            total_impulse: Some(record.total_impulse_ns),
            drag_table,
            reference_apogee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory_system::aerodynamics::PowerState;
    use approx::assert_relative_eq;

    fn source() -> &'static Path {
        Path::new("inline.csv")
    }

    #[test]
    fn test_drag_table_columns_by_name() {
        let text = "Mach,Alpha,CD Power-Off,CD Power-On\n\
                    0.00,0,0.52,0.41\n\
                    0.01,0,0.53,0.42\n\
                    0.02,0,0.54,0.43\n";
        let table = read_drag_table(text.as_bytes(), source()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.column(PowerState::On), &[0.41, 0.42, 0.43]);
        assert_eq!(table.column(PowerState::Off), &[0.52, 0.53, 0.54]);
    }

    #[test]
    fn test_drag_table_missing_column() {
        let text = "Mach,CD\n0.0,0.5\n";
        let err = read_drag_table(text.as_bytes(), source()).unwrap_err();
        assert!(err.to_string().contains("CD Power-Off"));
    }

    #[test]
    fn test_drag_table_rejects_garbage_cell() {
        let text = "CD Power-Off,CD Power-On\n0.5,0.4\nabc,0.4\n";
        let err = read_drag_table(text.as_bytes(), source()).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidTable(_)));
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn test_drag_table_rejects_blank_cell() {
        let text = "CD Power-Off,CD Power-On\n0.5,0.4\n,0.4\n";
        assert!(read_drag_table(text.as_bytes(), source()).is_err());
    }

    #[test]
    fn test_thrust_curve_stops_at_padding() {
        let text = "Time (sec),Thrust (N)\n0.00,900\n0.05,1100\n0.10,1000\n0.15,0\n0.20,0\n";
        let profile = read_thrust_curve(text.as_bytes(), source()).unwrap();
        assert_eq!(profile.forces(), &[900.0, 1100.0, 1000.0]);
    }

    #[test]
    fn test_thrust_curve_stops_at_blank() {
        let text = "time,thrust\n0.00,900\n0.05,\n0.10,1000\n";
        let profile = read_thrust_curve(text.as_bytes(), source()).unwrap();
        assert_eq!(profile.len(), 1);
    }

    #[test]
    fn test_reference_apogee_in_meters() {
        let text = "Time (sec),Altitude (ft),Mach Number\n0,0,0\n10,16404.2,0.9\n20,32808.4,0.1\n30,20000,0.3\n";
        let apogee = read_reference_apogee(text.as_bytes(), source()).unwrap();
        assert_relative_eq!(apogee, 10_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_burns_table_lookup() {
        let text = "tank_od_in,throat_in,total_impulse_ns,propellant_mass_kg\n\
                    8.0,0.7,9100,4.6\n\
                    8.0,0.8,9400,4.6\n";
        let table = BurnsTable::read(text.as_bytes(), source()).unwrap();
        assert_eq!(table.len(), 2);
        let record = table.lookup(8.0, 0.7999999999999999).unwrap();
        assert_eq!(record.total_impulse_ns, 9400.0);
        assert!(table.lookup(7.5, 0.8).is_none());
    }

    #[test]
    fn test_burns_table_malformed_row() {
        let text = "tank_od_in,throat_in,total_impulse_ns,propellant_mass_kg\n8.0,0.7,lots,4.6\n";
        assert!(matches!(
            BurnsTable::read(text.as_bytes(), source()),
            Err(SimulationError::Csv { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_drag_table(Path::new("/nonexistent/throat07.csv")).unwrap_err();
        assert!(matches!(err, SimulationError::Io { .. }));
    }
}
