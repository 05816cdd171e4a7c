//! Raw provider units to display units.
//!
//! All functions are total. Whole-valued results are still `f64` so a
//! non-finite input surfaces as a non-finite output instead of a bogus integer.

const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;
const MPS_TO_KMH: f64 = 3.6;

/// Kelvin to celsius, rounded to the nearest degree.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    (kelvin - ZERO_CELSIUS_IN_KELVIN).round()
}

/// Meters per second to kilometers per hour, rounded to the nearest integer.
pub fn mps_to_kmh(mps: f64) -> f64 {
    (mps * MPS_TO_KMH).round()
}

/// Meters to kilometers. Not rounded.
pub fn meters_to_kilometers(meters: f64) -> f64 {
    meters / 1000.0
}
