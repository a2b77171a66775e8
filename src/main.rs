use std::path::PathBuf;

use clap::Parser;
use booster_simulation::telemetry_system::export::{write_run_csv_file, write_summary_csv_file};
use booster_simulation::*;

/// Fly every tank/throat configuration of the motor study and report apogee.
#[derive(Parser, Debug)]
#[command(author, version, about = "Booster trajectory sweep")]
struct Cli {
    /// TOML file with vehicle, integration, sweep and data settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base directory that the aero and motor directories are relative to
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Directory for per-configuration trajectories and summary.csv
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the full flight summary for each configuration
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SweepConfig::load(path)?,
        None => SweepConfig::default(),
    };
    let (aero_dir, motor_dir) = config.data_dirs(&cli.data_dir);
    let model = DirectoryBurnModel::new(aero_dir, motor_dir, config.data.reference_flights)?;

    let sweep = config.sweep();
    let outcomes = sweep.run(&model);

    for outcome in &outcomes {
        match &outcome.result {
            Ok(flight) => {
                println!(
                    "For tank OD {}, Throat size {:.1}, Impulse = {}, Max Altitude = {}",
                    flight.configuration.tank_outer_diameter,
                    flight.configuration.throat_diameter,
                    flight.total_impulse,
                    flight.summary.apogee
                );
                if let Some(error) = flight.apogee_error() {
                    println!("  reference apogee off by {:.1} m", error);
                }
                if cli.verbose {
                    println!("{}", flight.summary);
                }
                if let Some(dir) = &cli.output {
                    let path = dir.join(format!("{}.csv", flight.configuration.label()));
                    write_run_csv_file(&path, &flight.run)?;
                }
            }
            Err(err) => eprintln!("skipping {}: {}", outcome.configuration, err),
        }
    }

    if let Some(dir) = &cli.output {
        write_summary_csv_file(&dir.join("summary.csv"), &outcomes)?;
    }

    let flown = outcomes.iter().filter(|o| o.is_ok()).count();
    if flown == 0 {
        return Err(format!("all {} configurations failed", outcomes.len()).into());
    }
    println!("{} of {} configurations flown", flown, outcomes.len());

    Ok(())
}
