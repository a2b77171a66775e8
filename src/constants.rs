// Physical Constants
pub const GRAVITY: f64 = 9.806; // m/s², local gravity used by the booster model
pub const STANDARD_GRAVITY: f64 = 9.80665; // m/s², conversion to g's

// Standard Atmosphere (1976)
pub const EARTH_RADIUS_GEOPOTENTIAL: f64 = 6_356_766.0; // m
pub const SPECIFIC_GAS_CONSTANT: f64 = 287.052_87; // J/(kg·K)
pub const HEAT_CAPACITY_RATIO: f64 = 1.4;
pub const SEA_LEVEL_TEMPERATURE: f64 = 288.15; // K
pub const SEA_LEVEL_PRESSURE: f64 = 101_325.0; // Pa
pub const ATMOSPHERE_CEILING: f64 = 81_020.0; // m, geometric (80 km geopotential)
pub const ATMOSPHERE_FLOOR: f64 = -5_004.0; // m, geometric

// Vehicle Constants
pub const FRONTAL_RADIUS: f64 = 0.075; // m
pub const NOZZLE_EXIT_RADIUS: f64 = 0.03175; // m (1.25 in)
pub const LAUNCH_ALTITUDE: f64 = 2000.0 / 3.32808; // m, launch site (2000 ft)

// Thrust curve sampling
pub const THRUST_SAMPLE_INTERVAL: f64 = 0.05; // s

// Drag tables are stored at 100 rows per unit Mach
pub const DRAG_TABLE_ROWS_PER_MACH: f64 = 100.0;

// Simulation Parameters
pub const TIME_STEP: f64 = 0.1; // s
pub const MAX_SIMULATION_TIME: f64 = 300.0; // s
pub const GROUND_CUTOFF: f64 = -0.1; // m

// Sweep grid
pub const TANK_OUTER_DIAMETERS: [f64; 5] = [6.0, 6.5, 7.0, 7.5, 8.0]; // in
pub const TANK_DRY_MASSES: [f64; 5] = [13.3, 14.4, 15.7, 17.0, 18.5]; // kg, per tank OD
pub const THROAT_DIAMETER_START: f64 = 0.7; // in
pub const THROAT_DIAMETER_STOP: f64 = 1.2; // in
pub const THROAT_DIAMETER_STEP: f64 = 0.1; // in

// Unit conversions
pub const FEET_PER_METER: f64 = 3.28084;
