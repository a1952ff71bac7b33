//! Display units for measured distances.
//!
//! All tracking math happens in meters. A `MeasurementUnit` only decides how
//! a distance is presented, so conversion is a single multiplication.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Conversion factor: meters to inches
pub const METERS_TO_INCHES: f64 = 39.3701;

/// Conversion factor: meters to feet
pub const METERS_TO_FEET: f64 = 3.28084;

/// Unit a distance is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    #[default]
    #[serde(alias = "m")]
    Meter,
    #[serde(alias = "cm")]
    Centimeter,
    #[serde(alias = "in")]
    Inch,
    #[serde(alias = "ft")]
    Foot,
}

impl MeasurementUnit {
    /// Every unit, in selector order.
    pub const ALL: [MeasurementUnit; 4] = [
        MeasurementUnit::Meter,
        MeasurementUnit::Centimeter,
        MeasurementUnit::Inch,
        MeasurementUnit::Foot,
    ];

    /// Multiplicative factor from meters.
    pub fn factor(self) -> f64 {
        match self {
            MeasurementUnit::Meter => 1.0,
            MeasurementUnit::Centimeter => 100.0,
            MeasurementUnit::Inch => METERS_TO_INCHES,
            MeasurementUnit::Foot => METERS_TO_FEET,
        }
    }

    /// Short symbol shown next to values.
    pub fn symbol(self) -> &'static str {
        match self {
            MeasurementUnit::Meter => "m",
            MeasurementUnit::Centimeter => "cm",
            MeasurementUnit::Inch => "in",
            MeasurementUnit::Foot => "ft",
        }
    }

    /// Display name for the unit selector.
    pub fn display_name(self) -> &'static str {
        match self {
            MeasurementUnit::Meter => "Meters",
            MeasurementUnit::Centimeter => "Centimeters",
            MeasurementUnit::Inch => "Inches",
            MeasurementUnit::Foot => "Feet",
        }
    }

    /// Next unit in selector order, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|u| *u == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Convert a distance in meters to `unit`.
pub fn convert(meters: f64, unit: MeasurementUnit) -> f64 {
    meters * unit.factor()
}

/// Convert a value expressed in `unit` back to meters.
pub fn convert_inverse(value: f64, unit: MeasurementUnit) -> f64 {
    value / unit.factor()
}
