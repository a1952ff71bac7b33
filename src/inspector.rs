/// ECS Inspector window using bevy-inspector-egui.
///
/// Provides a floating egui window with a read-only measurement summary and
/// live views of the tracking resources plus every entity in the scene. Rendered by an
/// exclusive system that requires &mut World access.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContext, PrimaryEguiContext};
use bevy_inspector_egui::bevy_inspector;

use crate::measure::MeasurementSession;
use crate::tracking::{TrackingFrame, TrackingSession};

/// Resource controlling inspector window visibility.
#[derive(Resource, Default)]
pub struct InspectorState {
    pub open: bool,
}

pub struct InspectorPlugin;

impl Plugin for InspectorPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<bevy_inspector_egui::DefaultInspectorConfigPlugin>() {
            app.add_plugins(bevy_inspector_egui::DefaultInspectorConfigPlugin);
        }
        app.init_resource::<InspectorState>()
            .register_type::<TrackingSession>()
            .register_type::<TrackingFrame>()
            .add_systems(Update, (toggle_inspector, render_inspector_window).chain());
    }
}

/// F1 toggles the inspector.
pub fn toggle_inspector(keyboard: Res<ButtonInput<KeyCode>>, mut state: ResMut<InspectorState>) {
    if keyboard.just_pressed(KeyCode::F1) {
        state.open = !state.open;
    }
}

/// Exclusive system that renders the inspector window.
///
/// Must be exclusive because `bevy_inspector` functions require `&mut World`.
pub fn render_inspector_window(world: &mut World) {
    let open = world
        .get_resource::<InspectorState>()
        .is_some_and(|state| state.open);

    if !open {
        return;
    }

    // Clone the egui context so we can release the world borrow
    let Ok(mut egui_context) = world
        .query_filtered::<&mut EguiContext, With<PrimaryEguiContext>>()
        .single(world)
        .map(|ctx| ctx.clone())
    else {
        return;
    };
    let ctx = egui_context.get_mut();

    egui::Window::new("Inspector")
        .default_size([400.0, 500.0])
        .resizable(true)
        .collapsible(true)
        .show(ctx, |ui: &mut egui::Ui| {
            egui::ScrollArea::both().show(ui, |ui: &mut egui::Ui| {
                egui::CollapsingHeader::new("Measurement")
                    .default_open(true)
                    .show(ui, |ui: &mut egui::Ui| {
                        match world.get_resource::<MeasurementSession>() {
                            Some(session) => measurement_summary_ui(ui, session),
                            None => {
                                ui.label("No active session");
                            }
                        }
                    });

                egui::CollapsingHeader::new("Tracking")
                    .default_open(true)
                    .show(ui, |ui: &mut egui::Ui| {
                        ui.label("TrackingSession");
                        bevy_inspector::ui_for_resource::<TrackingSession>(world, ui);
                        ui.separator();

                        ui.label("TrackingFrame");
                        bevy_inspector::ui_for_resource::<TrackingFrame>(world, ui);
                    });

                ui.separator();

                egui::CollapsingHeader::new("Entities")
                    .default_open(false)
                    .show(ui, |ui: &mut egui::Ui| {
                        bevy_inspector::ui_for_entities(world, ui);
                    });
            });
        });
}

/// Read-only view of the measurement. Mutations only go through
/// `MeasureAction`, so the session is not exposed to reflection editing.
pub fn measurement_summary_ui(ui: &mut egui::Ui, session: &MeasurementSession) {
    let view = session.view();
    egui::Grid::new("inspector_measurement_grid")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("Phase:");
            ui.label(format!("{:?}", view.phase));
            ui.end_row();

            ui.label("Unit:");
            ui.label(session.unit().display_name());
            ui.end_row();

            ui.label("Tracking ready:");
            ui.label(if view.tracking_ready { "yes" } else { "no" });
            ui.end_row();

            ui.label("Reticle:");
            ui.label(if session.reticle().visible { "visible" } else { "hidden" });
            ui.end_row();

            for (i, label) in view.point_labels.iter().enumerate() {
                ui.label(format!("Point {}:", i + 1));
                ui.label(label.as_deref().unwrap_or("not set"));
                ui.end_row();
            }

            ui.label("Distance:");
            ui.label(view.distance.with_unit());
            ui.end_row();
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::MeasurementUnit;
    use egui_kittest::Harness;
    use egui_kittest::kittest::Queryable;

    #[test]
    fn measurement_summary_shows_session_state() {
        let session = MeasurementSession::new(MeasurementUnit::Foot);
        let harness = Harness::new_ui(move |ui| {
            measurement_summary_ui(ui, &session);
        });

        harness.get_by_label("AwaitingSurface");
        harness.get_by_label("Feet");
        harness.get_by_label("hidden");
        harness.get_by_label("0.00 ft");
    }
}
