//! Measurement overlay: start screen, instruction bar and the bottom bar
//! with point coordinates, distance, unit selector and buttons.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use egui_phosphor::regular;

use crate::constants;
use crate::measure::{MeasureAction, MeasurementSession, MeasurementView};
use crate::theme::{apply_egui_theme, to_egui_color32, AppTheme};
use crate::tracking::{SessionSignal, TrackingSession};
use crate::units::MeasurementUnit;

/// What the user asked for through the overlay this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    StartSession,
    EndSession,
    Measure(MeasureAction),
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppTheme>().add_systems(
            EguiPrimaryContextPass,
            (apply_egui_theme, render_overlay).chain(),
        );
    }
}

/// Draw the overlay. `view` is `None` before the measurement session exists;
/// the start screen is only shown while tracking is inactive.
pub fn render_overlay_ui(
    ctx: &egui::Context,
    tracking_active: bool,
    view: Option<&MeasurementView>,
    theme: &AppTheme,
    commands: &mut Vec<UiCommand>,
) {
    if !tracking_active {
        render_start_screen(ctx, commands);
        return;
    }
    let Some(view) = view else {
        return;
    };

    let instruction_color = to_egui_color32(theme.phase_color(view.phase));
    egui::TopBottomPanel::top("instruction_bar")
        .exact_height(constants::INSTRUCTION_BAR_HEIGHT)
        .show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new(view.instruction)
                        .size(constants::INSTRUCTION_FONT_SIZE)
                        .color(instruction_color),
                );
            });
        });

    egui::TopBottomPanel::bottom("measurement_bar").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            for (i, label) in view.point_labels.iter().enumerate() {
                let text = match label {
                    Some(position) => format!("Point {}: {}", i + 1, position),
                    None => format!("Point {}: not set", i + 1),
                };
                ui.label(egui::RichText::new(text).monospace());
                ui.add_space(12.0);
            }
        });

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("Distance: {}", view.distance.with_unit()))
                    .size(constants::DISTANCE_FONT_SIZE)
                    .strong(),
            );

            ui.add_space(12.0);
            unit_selector(ui, view.distance.unit, commands);
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let action = ui.add_enabled(
                view.action_enabled,
                egui::Button::new(view.action_label)
                    .min_size(egui::vec2(constants::ACTION_BUTTON_WIDTH, 0.0)),
            );
            if action.clicked() {
                commands.push(UiCommand::Measure(MeasureAction::Capture));
            }

            let reset = ui.add_enabled(
                view.reset_enabled,
                egui::Button::new(format!("{} Reset", regular::ARROW_COUNTER_CLOCKWISE)),
            );
            if reset.clicked() {
                commands.push(UiCommand::Measure(MeasureAction::Reset));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(format!("{} End Session", regular::SIGN_OUT))
                    .clicked()
                {
                    commands.push(UiCommand::EndSession);
                }
                if !view.tracking_ready {
                    ui.label(egui::RichText::new("Waiting for surface tracking").weak());
                }
            });
        });
        ui.add_space(4.0);
    });
}

fn render_start_screen(ctx: &egui::Context, commands: &mut Vec<UiCommand>) {
    egui::Area::new(egui::Id::new("start_screen"))
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            egui::Frame::window(ui.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Surface Ruler");
                    ui.label("Measure the distance between two points on real surfaces.");
                    ui.add_space(8.0);
                    if ui
                        .add(egui::Button::new("Start AR").min_size(egui::vec2(
                            constants::ACTION_BUTTON_WIDTH,
                            constants::START_BUTTON_HEIGHT,
                        )))
                        .clicked()
                    {
                        commands.push(UiCommand::StartSession);
                    }
                });
            });
        });
}

fn unit_selector(ui: &mut egui::Ui, current: MeasurementUnit, commands: &mut Vec<UiCommand>) {
    let mut selected = current;
    egui::ComboBox::from_id_salt("unit_selector")
        .selected_text(current.display_name())
        .show_ui(ui, |ui| {
            for unit in MeasurementUnit::ALL {
                ui.selectable_value(&mut selected, unit, unit.display_name());
            }
        });
    if selected != current {
        commands.push(UiCommand::Measure(MeasureAction::SetUnit(selected)));
    }
}

/// Render the overlay and forward clicks as messages (Bevy system).
pub fn render_overlay(
    mut contexts: EguiContexts,
    theme: Res<AppTheme>,
    tracking: Res<TrackingSession>,
    session: Option<Res<MeasurementSession>>,
    mut actions: MessageWriter<MeasureAction>,
    mut signals: MessageWriter<SessionSignal>,
    mut pending: Local<Vec<UiCommand>>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let view = session.map(|s| s.view());
    render_overlay_ui(ctx, tracking.active, view.as_ref(), &theme, &mut pending);

    for command in pending.drain(..) {
        match command {
            UiCommand::StartSession => {
                signals.write(SessionSignal::Start);
            }
            UiCommand::EndSession => {
                signals.write(SessionSignal::End);
            }
            UiCommand::Measure(action) => {
                actions.write(action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::capture::test_support::RecordingSink;
    use crate::spatial::SpatialPose;
    use egui_kittest::Harness;
    use egui_kittest::kittest::Queryable;

    struct Overlay {
        tracking_active: bool,
        view: Option<MeasurementView>,
        commands: Vec<UiCommand>,
    }

    fn harness(tracking_active: bool, view: Option<MeasurementView>) -> Harness<'static, Overlay> {
        Harness::new_state(
            |ctx, state: &mut Overlay| {
                let theme = AppTheme::default();
                render_overlay_ui(
                    ctx,
                    state.tracking_active,
                    state.view.as_ref(),
                    &theme,
                    &mut state.commands,
                );
            },
            Overlay {
                tracking_active,
                view,
                commands: Vec::new(),
            },
        )
    }

    fn ready_session() -> MeasurementSession {
        let mut session = MeasurementSession::new(MeasurementUnit::Meter);
        session.mark_tracking_ready();
        session
    }

    #[test]
    fn start_screen_before_tracking() {
        let mut harness = harness(false, None);
        harness.get_by_label("Start AR").click();
        harness.run();

        assert_eq!(harness.state().commands, vec![UiCommand::StartSession]);
    }

    #[test]
    fn awaiting_surface_shows_placeholders() {
        let session = MeasurementSession::new(MeasurementUnit::Meter);
        let harness = harness(true, Some(session.view()));

        harness.get_by_label(
            "Surface not detected. Move your device slowly to scan the area.",
        );
        harness.get_by_label("Point 1: not set");
        harness.get_by_label("Point 2: not set");
        harness.get_by_label("Distance: 0.00 m");
        harness.get_by_label("Place Point 1");
        harness.get_by_label("Waiting for surface tracking");
    }

    #[test]
    fn complete_measurement_shows_coordinates_and_distance() {
        let mut session = ready_session();
        let mut sink = RecordingSink::default();
        session.frame_update(Some(SpatialPose::at(Vec3::ZERO)));
        assert!(session.user_action(&mut sink).is_ok());
        session.frame_update(Some(SpatialPose::at(Vec3::new(0.0, 0.0, -2.0))));
        assert!(session.user_action(&mut sink).is_ok());

        let harness = harness(true, Some(session.view()));

        harness.get_by_label("Point 1: (0.00, 0.00, 0.00)");
        harness.get_by_label("Point 2: (0.00, 0.00, -2.00)");
        harness.get_by_label("Distance: 2.00 m");
        harness.get_by_label("Measured");
    }

    #[test]
    fn buttons_forward_commands() {
        let mut session = ready_session();
        session.frame_update(Some(SpatialPose::at(Vec3::ZERO)));
        let mut harness = harness(true, Some(session.view()));

        harness.get_by_label("Place Point 1").click();
        harness.run();
        harness
            .get_by_label(&format!("{} End Session", regular::SIGN_OUT))
            .click();
        harness.run();

        assert_eq!(
            harness.state().commands,
            vec![
                UiCommand::Measure(MeasureAction::Capture),
                UiCommand::EndSession,
            ]
        );
    }
}
