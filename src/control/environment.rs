use crate::constants::{
    ATMOSPHERE_CEILING, ATMOSPHERE_FLOOR, EARTH_RADIUS_GEOPOTENTIAL, HEAT_CAPACITY_RATIO,
    SEA_LEVEL_PRESSURE, SEA_LEVEL_TEMPERATURE, SPECIFIC_GAS_CONSTANT, STANDARD_GRAVITY,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereSample {
    pub density: f64,        // kg/m³
    pub pressure: f64,       // Pa
    pub temperature: f64,    // K
    pub speed_of_sound: f64, // m/s
}

// (base geopotential height m, base temperature K, lapse rate K/m, base pressure Pa)
const LAYERS: [(f64, f64, f64, f64); 7] = [
    (0.0, SEA_LEVEL_TEMPERATURE, -0.0065, SEA_LEVEL_PRESSURE),
    (11_000.0, 216.65, 0.0, 22_632.0),
    (20_000.0, 216.65, 0.001, 5_474.87),
    (32_000.0, 228.65, 0.0028, 868.014),
    (47_000.0, 270.65, 0.0, 110.906),
    (51_000.0, 270.65, -0.0028, 66.9384),
    (71_000.0, 214.65, -0.002, 3.956_39),
];

/// Standard atmosphere at a geometric altitude.
///
/// Never fails. At or above the 81,020 m ceiling density and pressure are zero and
/// the speed of sound is held at its ceiling value; below -5,004 m the altitude is
/// clamped to the model floor.
pub fn atmosphere(altitude: f64) -> AtmosphereSample {
    if altitude >= ATMOSPHERE_CEILING {
        let ceiling = standard_atmosphere(ATMOSPHERE_CEILING);
        return AtmosphereSample {
            density: 0.0,
            pressure: 0.0,
            ..ceiling
        };
    }
    standard_atmosphere(altitude.max(ATMOSPHERE_FLOOR))
}

pub fn density(altitude: f64) -> f64 {
    atmosphere(altitude).density
}

pub fn pressure(altitude: f64) -> f64 {
    atmosphere(altitude).pressure
}

pub fn speed_of_sound(altitude: f64) -> f64 {
    atmosphere(altitude).speed_of_sound
}

pub fn mach(velocity: f64, altitude: f64) -> f64 {
    velocity.abs() / speed_of_sound(altitude.min(ATMOSPHERE_CEILING))
}

fn geopotential_height(altitude: f64) -> f64 {
    EARTH_RADIUS_GEOPOTENTIAL * altitude / (EARTH_RADIUS_GEOPOTENTIAL + altitude)
}

fn standard_atmosphere(altitude: f64) -> AtmosphereSample {
    let height = geopotential_height(altitude);
    let (base_height, base_temperature, lapse, base_pressure) = LAYERS
        .iter()
        .rev()
        .find(|layer| height >= layer.0)
        .copied()
        .unwrap_or(LAYERS[0]);

    let temperature = base_temperature + lapse * (height - base_height);
    let pressure = if lapse == 0.0 {
        base_pressure
            * (-STANDARD_GRAVITY * (height - base_height) / (SPECIFIC_GAS_CONSTANT * temperature))
                .exp()
    } else {
        base_pressure
            * (temperature / base_temperature).powf(-STANDARD_GRAVITY / (lapse * SPECIFIC_GAS_CONSTANT))
    };

    AtmosphereSample {
        density: pressure / (SPECIFIC_GAS_CONSTANT * temperature),
        pressure,
        temperature,
        speed_of_sound: (HEAT_CAPACITY_RATIO * SPECIFIC_GAS_CONSTANT * temperature).sqrt(),
    }
}
