use bevy::prelude::*;

use super::capture::MAX_POINTS;
use crate::spatial::SpatialPose;

/// Targeting indicator state for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct ReticleState {
    pub visible: bool,
    pub pose: Option<SpatialPose>,
}

impl ReticleState {
    pub fn hidden() -> Self {
        Self::default()
    }
}

/// Places the reticle from the current frame's hit-test result.
///
/// No smoothing: each frame's pose replaces the previous one.
pub struct ReticleTracker;

impl ReticleTracker {
    /// Visible at the hit pose while a surface is hit and the measurement
    /// still needs points; hidden otherwise.
    pub fn track(hit: Option<SpatialPose>, captured: usize) -> ReticleState {
        match hit {
            Some(pose) if captured < MAX_POINTS => ReticleState {
                visible: true,
                pose: Some(pose),
            },
            _ => ReticleState::hidden(),
        }
    }
}

/// Marker component for the reticle entity.
#[derive(Component)]
pub struct Reticle;
