use bevy::prelude::*;

use super::capture::{MarkerHandle, MarkerSink};
use super::reticle::Reticle;
use super::session::MeasurementSession;
use crate::config::AppConfig;
use crate::constants;
use crate::theme::AppTheme;

/// Meshes and materials shared by every measurement visual.
#[derive(Resource)]
pub struct MarkerAssets {
    pub point_mesh: Handle<Mesh>,
    pub point_materials: [Handle<StandardMaterial>; 2],
    pub line_mesh: Handle<Mesh>,
    pub line_material: Handle<StandardMaterial>,
}

/// Component on spawned point markers and the connecting line.
#[derive(Component)]
pub struct MeasurementVisual;

/// Create marker assets and the (hidden) reticle entity.
pub fn setup_marker_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    theme: Res<AppTheme>,
    config: Res<AppConfig>,
) {
    let markers = &config.markers;

    let unlit = |color: Color| StandardMaterial {
        base_color: color,
        unlit: true,
        ..default()
    };

    commands.insert_resource(MarkerAssets {
        point_mesh: meshes.add(Sphere::new(markers.point_radius)),
        point_materials: [
            materials.add(unlit(theme.first_point())),
            materials.add(unlit(theme.second_point())),
        ],
        // Unit height, stretched along Y to span the two points
        line_mesh: meshes.add(Cylinder::new(markers.line_radius, 1.0)),
        line_material: materials.add(unlit(theme.measure_line())),
    });

    commands.spawn((
        Name::new("Reticle"),
        Reticle,
        Mesh3d(meshes.add(Torus::new(markers.reticle_inner_radius, markers.reticle_outer_radius))),
        MeshMaterial3d(materials.add(unlit(theme.reticle()))),
        Transform::default(),
        Visibility::Hidden,
    ));
}

/// Bevy side of the rendering collaborator: spawns and despawns entities.
pub struct MarkerSpawner<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    assets: &'a MarkerAssets,
    placed: usize,
}

impl<'a, 'w, 's> MarkerSpawner<'a, 'w, 's> {
    /// `already_placed` picks the material for the next point marker.
    pub fn new(commands: &'a mut Commands<'w, 's>, assets: &'a MarkerAssets, already_placed: usize) -> Self {
        Self {
            commands,
            assets,
            placed: already_placed,
        }
    }
}

impl MarkerSink for MarkerSpawner<'_, '_, '_> {
    fn place_marker(&mut self, position: Vec3) -> MarkerHandle {
        let material = self.assets.point_materials[self.placed.min(1)].clone();
        self.placed += 1;
        let entity = self
            .commands
            .spawn((
                Name::new(format!("Measurement Point {}", self.placed)),
                MeasurementVisual,
                Mesh3d(self.assets.point_mesh.clone()),
                MeshMaterial3d(material),
                Transform::from_translation(position),
            ))
            .id();
        MarkerHandle(entity)
    }

    fn draw_line(&mut self, from: Vec3, to: Vec3) -> MarkerHandle {
        let entity = self
            .commands
            .spawn((
                Name::new("Measurement Line"),
                MeasurementVisual,
                Mesh3d(self.assets.line_mesh.clone()),
                MeshMaterial3d(self.assets.line_material.clone()),
                line_transform(from, to),
            ))
            .id();
        MarkerHandle(entity)
    }

    fn release_marker(&mut self, marker: MarkerHandle) {
        if let Ok(mut ec) = self.commands.get_entity(marker.0) {
            ec.despawn();
        }
    }
}

/// Transform stretching a unit-height Y-aligned cylinder from `from` to `to`.
pub fn line_transform(from: Vec3, to: Vec3) -> Transform {
    let delta = to - from;
    let length = delta.length();
    let rotation = delta
        .try_normalize()
        .map(|dir| Quat::from_rotation_arc(Vec3::Y, dir))
        .unwrap_or(Quat::IDENTITY);
    Transform {
        translation: (from + to) / 2.0,
        rotation,
        scale: Vec3::new(1.0, length, 1.0),
    }
}

/// Mirror the session's reticle onto the reticle entity.
pub fn sync_reticle(
    session: Option<Res<MeasurementSession>>,
    mut reticle: Query<(&mut Transform, &mut Visibility), With<Reticle>>,
) {
    let state = session.map(|s| *s.reticle()).unwrap_or_default();

    for (mut transform, mut visibility) in reticle.iter_mut() {
        match state.pose {
            Some(pose) if state.visible => {
                *transform = pose.to_transform();
                // Lift off the surface to avoid z-fighting
                transform.translation += pose.normal() * constants::RETICLE_SURFACE_OFFSET;
                *visibility = Visibility::Visible;
            }
            _ => *visibility = Visibility::Hidden,
        }
    }
}
