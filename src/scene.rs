//! The room the viewer walks around in.
//!
//! Stands in for the camera feed of a real device: a floor, a table and a
//! wall, all trackable, plus a viewer camera moved with the keyboard and
//! right-mouse drag.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants;
use crate::theme::AppTheme;
use crate::tracking::TrackedSurface;

/// The viewer's head/device camera. Yaw and pitch in radians.
#[derive(Component, Default)]
pub struct ViewerCamera {
    pub yaw: f32,
    pub pitch: f32,
}

impl ViewerCamera {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene)
            .add_systems(Update, move_viewer.before(crate::tracking::TrackingSet));
    }
}

/// Spawn the viewer camera, lights and trackable surfaces.
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    theme: Res<AppTheme>,
) {
    let viewer = ViewerCamera {
        yaw: 0.0,
        pitch: constants::VIEWER_START_PITCH,
    };
    commands.spawn((
        Name::new("Viewer Camera"),
        Camera3d::default(),
        Transform::from_translation(constants::VIEWER_START_POSITION)
            .with_rotation(viewer.rotation()),
        viewer,
    ));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(3.0, 6.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let floor_material = materials.add(StandardMaterial {
        base_color: theme.surface0(),
        perceptual_roughness: 1.0,
        ..default()
    });
    commands.spawn((
        Name::new("Floor"),
        TrackedSurface,
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(constants::ROOM_HALF_SIZE)))),
        MeshMaterial3d(floor_material),
        Transform::default(),
    ));

    let table_material = materials.add(StandardMaterial {
        base_color: theme.surface2(),
        perceptual_roughness: 0.8,
        ..default()
    });
    commands.spawn((
        Name::new("Table"),
        TrackedSurface,
        Mesh3d(meshes.add(Cuboid::new(1.2, 0.75, 0.8))),
        MeshMaterial3d(table_material),
        Transform::from_xyz(0.0, 0.375, -1.5),
    ));

    let wall_material = materials.add(StandardMaterial {
        base_color: theme.surface1(),
        perceptual_roughness: 1.0,
        ..default()
    });
    commands.spawn((
        Name::new("Wall"),
        TrackedSurface,
        Mesh3d(meshes.add(Plane3d::new(Vec3::Z, Vec2::new(constants::ROOM_HALF_SIZE, 1.5)))),
        MeshMaterial3d(wall_material),
        Transform::from_xyz(0.0, 1.5, -constants::ROOM_HALF_SIZE),
    ));
}

/// Move the viewer with WASD (walk), Q/E (down/up) and right-drag (look).
pub fn move_viewer(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    time: Res<Time>,
    mut contexts: EguiContexts,
    mut viewer: Query<(&mut Transform, &mut ViewerCamera)>,
) {
    let Ok((mut transform, mut camera)) = viewer.single_mut() else {
        mouse_motion.clear();
        return;
    };

    // Don't steer while typing into UI
    let keyboard_free = contexts
        .ctx_mut()
        .map(|ctx| !ctx.wants_keyboard_input())
        .unwrap_or(true);

    if mouse_button.pressed(MouseButton::Right) {
        for event in mouse_motion.read() {
            camera.yaw -= event.delta.x * constants::LOOK_SENSITIVITY;
            camera.pitch = (camera.pitch - event.delta.y * constants::LOOK_SENSITIVITY)
                .clamp(-constants::MAX_LOOK_PITCH, constants::MAX_LOOK_PITCH);
        }
    } else {
        mouse_motion.clear();
    }

    let direction = if keyboard_free {
        walk_direction(&keyboard, camera.yaw)
    } else {
        Vec3::ZERO
    };

    let step = direction.normalize_or_zero() * constants::WALK_SPEED * time.delta_secs();
    transform.translation += step;
    transform.translation.y = transform
        .translation
        .y
        .clamp(constants::MIN_VIEWER_HEIGHT, constants::MAX_VIEWER_HEIGHT);
    transform.rotation = camera.rotation();
}

/// Unnormalized walk direction for the held movement keys, relative to `yaw`.
pub fn walk_direction(keyboard: &ButtonInput<KeyCode>, yaw: f32) -> Vec3 {
    let yaw = Quat::from_rotation_y(yaw);
    let forward = yaw * Vec3::NEG_Z;
    let right = yaw * Vec3::X;

    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction += forward;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction -= forward;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction += right;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction -= right;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        direction += Vec3::Y;
    }
    if keyboard.pressed(KeyCode::KeyQ) {
        direction -= Vec3::Y;
    }
    direction
}
