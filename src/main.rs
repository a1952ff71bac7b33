use bevy::prelude::*;
use bevy_egui::EguiPlugin;

mod config;
mod debug_panel;
#[cfg(feature = "inspector")]
mod inspector;
mod measure;
mod paths;
mod scene;
mod spatial;
mod theme;
mod tracking;
mod ui;
mod units;

use config::ConfigPlugin;
use debug_panel::DebugPanelPlugin;
use measure::MeasurePlugin;
use scene::ScenePlugin;
use tracking::TrackingPlugin;
use ui::UiPlugin;

// =============================================================================
// Constants - All magic numbers centralized here
// =============================================================================

mod constants {
    use bevy::math::Vec3;

    // Viewer
    pub const VIEWER_START_POSITION: Vec3 = Vec3::new(0.0, 1.6, 1.5);
    pub const VIEWER_START_PITCH: f32 = -0.5;
    pub const WALK_SPEED: f32 = 1.5; // m/s
    pub const LOOK_SENSITIVITY: f32 = 0.003; // rad per pixel
    pub const MAX_LOOK_PITCH: f32 = 1.45;
    pub const MIN_VIEWER_HEIGHT: f32 = 0.3;
    pub const MAX_VIEWER_HEIGHT: f32 = 2.5;

    // Room
    pub const ROOM_HALF_SIZE: f32 = 4.0;

    // Reticle lift above the hit surface, meters
    pub const RETICLE_SURFACE_OFFSET: f32 = 0.002;

    // Overlay
    pub const INSTRUCTION_BAR_HEIGHT: f32 = 36.0;
    pub const INSTRUCTION_FONT_SIZE: f32 = 16.0;
    pub const DISTANCE_FONT_SIZE: f32 = 20.0;
    pub const ACTION_BUTTON_WIDTH: f32 = 140.0;
    pub const START_BUTTON_HEIGHT: f32 = 36.0;
}

fn main() {
    let mut app = App::new();
    app.add_plugins((
        DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Surface Ruler".to_string(),
                resolution: (1280, 720).into(),
                ..default()
            }),
            ..default()
        }),
        EguiPlugin::default(),
        ConfigPlugin,
        UiPlugin,
        ScenePlugin,
        TrackingPlugin,
        MeasurePlugin,
        DebugPanelPlugin,
    ));

    #[cfg(feature = "inspector")]
    app.add_plugins(inspector::InspectorPlugin);

    app.run();
}
