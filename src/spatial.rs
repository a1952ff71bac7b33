//! Shared spatial math for surface poses and captured points.
//!
//! Positions are in meters in the tracking reference space (Y up).

use bevy::prelude::*;

/// Position plus orientation of a surface intersection.
///
/// Recomputed every frame from the hit-test result and always replaced
/// wholesale, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SpatialPose {
    /// Position in meters
    pub position: Vec3,
    /// Rotation taking local +Y onto the surface normal
    pub orientation: Quat,
}

impl SpatialPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    /// Pose at `position` with no rotation.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Build a pose from a hit point and the surface normal at that point.
    /// A degenerate normal leaves the pose unrotated.
    pub fn from_surface_hit(point: Vec3, normal: Vec3) -> Self {
        let orientation = normal
            .try_normalize()
            .map(|n| Quat::from_rotation_arc(Vec3::Y, n))
            .unwrap_or(Quat::IDENTITY);
        Self::new(point, orientation)
    }

    /// Build a pose from a 4x4 rigid transform. Scale is discarded.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (_scale, orientation, position) = matrix.to_scale_rotation_translation();
        Self::new(position, orientation)
    }

    /// Surface normal (local +Y in world space).
    pub fn normal(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.orientation)
    }
}

/// Straight-line distance in meters between two positions.
pub fn distance_meters(a: Vec3, b: Vec3) -> f64 {
    let d = b - a;
    ((d.x as f64).powi(2) + (d.y as f64).powi(2) + (d.z as f64).powi(2)).sqrt()
}

/// Format a position as `(x.xx, y.xx, z.xx)`.
pub fn format_position(position: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", position.x, position.y, position.z)
}
