use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::session::MeasurementSession;
use super::MeasureAction;
use crate::tracking::SessionSignal;

/// Turn clicks, touches and measurement keys into [`MeasureAction`]s.
///
/// Pointer input over egui panels is left to the UI; keys are ignored while
/// egui has keyboard focus.
pub fn emit_input_actions(
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    session: Option<Res<MeasurementSession>>,
    mut actions: MessageWriter<MeasureAction>,
) {
    if session.is_none() {
        return;
    }

    let (pointer_free, keyboard_free) = match contexts.ctx_mut() {
        Ok(ctx) => (
            !(ctx.is_pointer_over_area() || ctx.wants_pointer_input()),
            !ctx.wants_keyboard_input(),
        ),
        Err(_) => (true, true),
    };

    // Tap or click on the 3D view
    let tapped = mouse_button.just_pressed(MouseButton::Left) || touches.any_just_pressed();
    if pointer_free && tapped {
        actions.write(MeasureAction::Capture);
    }

    if !keyboard_free {
        return;
    }

    if keyboard.just_pressed(KeyCode::Space) {
        actions.write(MeasureAction::Capture);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        actions.write(MeasureAction::Reset);
    }
    if keyboard.just_pressed(KeyCode::KeyU) {
        actions.write(MeasureAction::CycleUnit);
    }
}

/// Enter starts the tracking session, Escape ends it.
pub fn emit_session_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    mut signals: MessageWriter<SessionSignal>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_keyboard_input() {
            return;
        }
    }

    if keyboard.just_pressed(KeyCode::Enter) {
        signals.write(SessionSignal::Start);
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        signals.write(SessionSignal::End);
    }
}
