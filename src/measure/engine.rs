use bevy::prelude::*;

use super::capture::PointSet;
use crate::spatial::distance_meters;
use crate::units::{convert, MeasurementUnit};

/// Distance as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DisplayDistance {
    /// Raw distance in meters, `None` until two points exist
    pub meters: Option<f64>,
    /// Value converted to `unit`
    pub value: f64,
    pub unit: MeasurementUnit,
}

impl DisplayDistance {
    /// Zero value shown before a measurement is complete.
    pub fn placeholder(unit: MeasurementUnit) -> Self {
        Self {
            meters: None,
            value: 0.0,
            unit,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.meters.is_some()
    }

    /// Value followed by the unit symbol, e.g. `1.00 m`.
    pub fn with_unit(&self) -> String {
        format!("{} {}", self, self.unit.symbol())
    }
}

impl std::fmt::Display for DisplayDistance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.value)
    }
}

/// Turns captured points into a displayed distance.
pub struct MeasurementEngine;

impl MeasurementEngine {
    /// Euclidean distance between the two captured points, in `unit`.
    /// Fewer than two points yields the placeholder.
    pub fn compute(points: &PointSet, unit: MeasurementUnit) -> DisplayDistance {
        let Some((a, b)) = points.endpoints() else {
            return DisplayDistance::placeholder(unit);
        };
        let meters = distance_meters(a, b);
        DisplayDistance {
            meters: Some(meters),
            value: convert(meters, unit),
            unit,
        }
    }
}
