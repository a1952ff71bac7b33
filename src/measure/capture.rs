use bevy::prelude::*;

use crate::spatial::SpatialPose;

/// Maximum number of points in one measurement.
pub const MAX_POINTS: usize = 2;

/// Handle to a visual owned by the measurement (point marker or line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct MarkerHandle(pub Entity);

/// Rendering collaborator. The measurement only hands out positions and
/// gets opaque handles back.
pub trait MarkerSink {
    /// Create a point marker at `position`.
    fn place_marker(&mut self, position: Vec3) -> MarkerHandle;
    /// Create a line connecting two captured positions.
    fn draw_line(&mut self, from: Vec3, to: Vec3) -> MarkerHandle;
    /// Release a marker or line. Called exactly once per handle.
    fn release_marker(&mut self, marker: MarkerHandle);
}

/// Why a capture did not happen. Never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// Two points already captured
    MeasurementFull,
    /// No surface pose at the moment of the action
    NoTarget,
}

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejected::MeasurementFull => write!(f, "measurement already has {} points", MAX_POINTS),
            Rejected::NoTarget => write!(f, "no surface under the reticle"),
        }
    }
}

/// A position snapshotted from the reticle at capture time.
#[derive(Debug, PartialEq, Reflect)]
pub struct CapturedPoint {
    position: Vec3,
    marker: MarkerHandle,
}

impl CapturedPoint {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn marker(&self) -> MarkerHandle {
        self.marker
    }
}

/// Ordered captured points, at most [`MAX_POINTS`].
#[derive(Debug, Default, Reflect)]
pub struct PointSet {
    points: Vec<CapturedPoint>,
}

impl PointSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.points.len() >= MAX_POINTS
    }

    pub fn get(&self, index: usize) -> Option<&CapturedPoint> {
        self.points.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapturedPoint> {
        self.points.iter()
    }

    /// Both endpoints once the measurement is complete.
    pub fn endpoints(&self) -> Option<(Vec3, Vec3)> {
        match self.points.as_slice() {
            [a, b] => Some((a.position, b.position)),
            _ => None,
        }
    }

    /// Capture the pose's position as the next point and give it a marker.
    pub fn append(
        &mut self,
        pose: Option<&SpatialPose>,
        sink: &mut impl MarkerSink,
    ) -> Result<&CapturedPoint, Rejected> {
        if self.is_full() {
            return Err(Rejected::MeasurementFull);
        }
        let Some(pose) = pose else {
            return Err(Rejected::NoTarget);
        };

        let position = pose.position;
        let marker = sink.place_marker(position);
        self.points.push(CapturedPoint { position, marker });
        Ok(&self.points[self.points.len() - 1])
    }

    /// Release every marker and empty the set. Returns how many were released.
    pub fn reset(&mut self, sink: &mut impl MarkerSink) -> usize {
        let released = self.points.len();
        for point in self.points.drain(..) {
            sink.release_marker(point.marker);
        }
        released
    }
}
