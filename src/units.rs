//! Unit-tagged scalars passed across the index library boundary.

use serde::Serialize;

/// Offset between degrees Celsius and kelvin.
pub const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;

/// Pressure in hectopascals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Hectopascals(pub f64);

/// Temperature (or dew point) in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Celsius(pub f64);

impl Hectopascals {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Celsius {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_kelvin(self) -> f64 {
        self.0 + ZERO_CELSIUS_IN_KELVIN
    }

    pub fn from_kelvin(kelvin: f64) -> Self {
        Celsius(kelvin - ZERO_CELSIUS_IN_KELVIN)
    }
}
