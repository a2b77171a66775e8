use crate::constants::FEET_PER_METER;

pub fn feet_to_meters(feet: f64) -> f64 {
    feet / FEET_PER_METER
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// Two-digit file code for a diameter in inches: 0.7 -> "07", 8.0 -> "80".
pub fn diameter_code(diameter_in: f64) -> String {
    format!("{:02}", (diameter_in * 10.0).round() as i64)
}
