use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use booster_simulation::{
    errors::SimulationError,
    telemetry_system::export::{write_run_csv_file, write_summary_csv_file},
    utils::tables::load_thrust_curve,
    DirectoryBurnModel, DragTable, FlightPhase, IntegratorConfig, Sweep, SweepConfig,
    ThrustProfile, VehicleConfig, LAUNCH_ALTITUDE,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tempfile::TempDir;

const BURN_SAMPLES: usize = 30; // 1.5 s at 0.05 s spacing
const PROPELLANT_MASS: f64 = 1.5;

fn thrust_for(throat: f64) -> f64 {
    1000.0 + 500.0 * throat
}

fn write_drag_table(path: &Path, power_off: f64, power_on: f64) {
    let mut text = String::from("Mach,Alpha,CD Power-Off,CD Power-On\n");
    for row in 0..500 {
        text.push_str(&format!("{:.2},0,{},{}\n", row as f64 / 100.0, power_off, power_on));
    }
    fs::write(path, text).unwrap();
}

fn write_thrust_curve(path: &Path, thrust: f64) {
    let mut text = String::from("Time (sec),Thrust (N)\n");
    for i in 0..BURN_SAMPLES + 10 {
        let force = if i < BURN_SAMPLES { thrust } else { 0.0 };
        text.push_str(&format!("{:.2},{}\n", i as f64 * 0.05, force));
    }
    fs::write(path, text).unwrap();
}

// Burn data for 8 in tank with throats 0.7, 0.8 and 0.9. The 0.9 drag table is
// left out so that configuration fails to load.
fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let aero = dir.path().join("aero");
    let motor = dir.path().join("motor");
    fs::create_dir_all(&aero).unwrap();
    fs::create_dir_all(&motor).unwrap();

    let mut burns = String::from("tank_od_in,throat_in,total_impulse_ns,propellant_mass_kg\n");
    for (throat, code) in [(0.7, "07"), (0.8, "08"), (0.9, "09")] {
        let thrust = thrust_for(throat);
        let impulse = thrust * BURN_SAMPLES as f64 * 0.05;
        burns.push_str(&format!("8.0,{},{},{}\n", throat, impulse, PROPELLANT_MASS));
        write_thrust_curve(&motor.join(format!("thrust_od80_throat{}.csv", code)), thrust);
        if code != "09" {
            write_drag_table(&aero.join(format!("throat{}.csv", code)), 0.45, 0.35);
        }
    }
    fs::write(motor.join("burns.csv"), burns).unwrap();

    fs::write(
        aero.join("flightthroat07.csv"),
        "Time (sec),Altitude (ft)\n0,0\n5,800\n10,1200\n15,900\n",
    )
    .unwrap();

    dir
}

fn config(reference_flights: bool) -> SweepConfig {
    let text = format!(
        r#"
        [sweep]
        tanks = [{{ outer_diameter = 8.0, dry_mass = 18.5 }}]
        throat_start = 0.7
        throat_stop = 0.9
        throat_step = 0.1

        [data]
        aero_dir = "aero"
        motor_dir = "motor"
        reference_flights = {}
        "#,
        reference_flights
    );
    SweepConfig::from_toml_str(&text).unwrap()
}

fn model(dir: &TempDir, config: &SweepConfig) -> DirectoryBurnModel {
    let (aero, motor) = config.data_dirs(dir.path());
    DirectoryBurnModel::new(aero, motor, config.data.reference_flights).unwrap()
}

#[test]
fn test_sweep_from_disk_skips_missing_configuration() {
    let dir = data_dir();
    let config = config(false);
    let model = model(&dir, &config);
    assert_eq!(model.burns().len(), 3);
    let outcomes = config.sweep().run(&model);

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_ok());
    assert!(outcomes[1].is_ok());
    assert!(matches!(
        outcomes[2].result,
        Err(SimulationError::Io { .. })
    ));

    let low = outcomes[0].result.as_ref().unwrap();
    let high = outcomes[1].result.as_ref().unwrap();
    assert_relative_eq!(low.total_impulse, thrust_for(0.7) * 1.5, epsilon = 1e-9);
    assert!(low.summary.apogee > 100.0);
    assert!(high.summary.apogee > low.summary.apogee);
    assert!(low.reference_apogee.is_none());
}

#[test]
fn test_flight_from_disk_is_physical() {
    let dir = data_dir();
    let config = config(false);
    let outcomes = config.sweep().run(&model(&dir, &config));
    let flight = outcomes[0].result.as_ref().unwrap();
    let run = &flight.run;

    let first = run.first().unwrap();
    assert_relative_eq!(first.time, 0.0);
    assert_relative_eq!(first.altitude, LAUNCH_ALTITUDE);
    assert_relative_eq!(first.mass, 18.5 + PROPELLANT_MASS);

    // propellant fully burned, then mass held
    let last = run.last().unwrap();
    assert_relative_eq!(last.mass, 18.5, epsilon = 1e-9);
    assert!(run.masses().zip(run.masses().skip(1)).all(|(a, b)| b <= a));

    assert_relative_eq!(flight.summary.burnout_time.unwrap(), 1.5, epsilon = 1e-9);
    assert!(run.samples().iter().skip(1).take(15).all(|s| s.phase == FlightPhase::Powered));
    assert!(last.altitude <= config.integrator().ground_cutoff);
    assert!(last.time <= config.integrator().max_time + config.integrator().dt);
}

#[test]
fn test_shuffled_sweep_gives_same_results() {
    let dir = data_dir();
    let config = config(false);
    let model = model(&dir, &config);
    let ordered = config.sweep().run(&model);

    let mut configurations = config.configurations();
    configurations.shuffle(&mut StdRng::seed_from_u64(42));
    let shuffled = Sweep::new(configurations, config.airframe(), config.integrator()).run(&model);

    for outcome in &shuffled {
        let matching = ordered
            .iter()
            .find(|o| o.configuration == outcome.configuration)
            .unwrap();
        match (&outcome.result, &matching.result) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
            _ => panic!("{} changed outcome with order", outcome.configuration),
        }
    }
}

#[test]
fn test_reference_flight_comparison() {
    let dir = data_dir();
    let config = config(true);
    let outcomes = config.sweep().run(&model(&dir, &config));

    let flight = outcomes[0].result.as_ref().unwrap();
    let reference = flight.reference_apogee.unwrap();
    assert_relative_eq!(reference, 1200.0 / 3.28084, epsilon = 1e-9);
    assert_relative_eq!(flight.apogee_error().unwrap(), flight.summary.apogee - reference);

    // no flightthroat08.csv on disk
    assert!(outcomes[1].result.as_ref().unwrap().reference_apogee.is_none());
}

#[test]
fn test_exports_written_per_configuration() {
    let dir = data_dir();
    let config = config(false);
    let outcomes = config.sweep().run(&model(&dir, &config));

    let out = tempfile::tempdir().unwrap();
    for flight in outcomes.iter().filter_map(|o| o.result.as_ref().ok()) {
        let path = out.path().join(format!("{}.csv", flight.configuration.label()));
        write_run_csv_file(&path, &flight.run).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), flight.run.len() + 1);
    }
    assert!(out.path().join("od80_throat07.csv").exists());
    assert!(!out.path().join("od80_throat09.csv").exists());

    let summary_path = out.path().join("summary.csv");
    write_summary_csv_file(&summary_path, &outcomes).unwrap();
    let summary = fs::read_to_string(summary_path).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains("od80_throat08"));
}

#[test]
fn test_thrust_curve_from_disk_matches_profile() {
    let dir = data_dir();
    let loaded =
        load_thrust_curve(&dir.path().join("motor").join("thrust_od80_throat07.csv")).unwrap();
    let expected = ThrustProfile::new(vec![thrust_for(0.7); BURN_SAMPLES]).unwrap();
    assert_eq!(loaded, expected);
    assert_relative_eq!(loaded.burn_time(), 1.5, epsilon = 1e-12);
}

#[test]
fn test_missing_burns_table_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let err = DirectoryBurnModel::new(dir.path().join("aero"), dir.path().join("motor"), false)
        .unwrap_err();
    assert!(err.to_string().contains("burns.csv"));
}

#[test]
fn test_fast_vehicle_runs_off_drag_table() {
    let vehicle = VehicleConfig::new(5.0, 4.0, 250.0);
    let profile = ThrustProfile::new(vec![20_000.0; 40]).unwrap();
    // only covers Mach 0.00..0.49
    let table = DragTable::uniform(0.3, 50).unwrap();
    let err = booster_simulation::simulate(&vehicle, &profile, &table, IntegratorConfig::default())
        .unwrap_err();
    assert!(matches!(err, SimulationError::MachOutOfRange { .. }));
}
