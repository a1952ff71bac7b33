//! Two-point surface measurement.
//!
//! Every frame the tracking hit feeds the [`MeasurementSession`]; every user
//! input arrives as a [`MeasureAction`] message and is applied by a single
//! system, so the session is only ever mutated from one place.

pub mod capture;
pub mod engine;
pub mod input;
pub mod render;
pub mod reticle;
pub mod session;

pub use capture::*;
pub use engine::*;
pub use input::*;
pub use render::*;
pub use reticle::*;
pub use session::*;

use bevy::prelude::*;

use crate::config::AppConfig;
use crate::debug_panel::DebugPanelState;
use crate::tracking::{SessionSignal, TrackingFrame, TrackingSession, TrackingSet};
use crate::units::MeasurementUnit;

/// Everything a user can do to a measurement.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureAction {
    /// Tap, click, Space or the action button
    Capture,
    Reset,
    SetUnit(MeasurementUnit),
    CycleUnit,
}

pub struct MeasurePlugin;

impl Plugin for MeasurePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<MeasureAction>()
            .add_systems(Startup, setup_marker_assets)
            .add_systems(Update, emit_session_shortcuts.before(TrackingSet))
            .add_systems(
                Update,
                (
                    sync_measurement_session,
                    apply_tracking_frame,
                    emit_input_actions,
                    handle_measure_actions,
                    sync_reticle,
                    log_phase_transitions,
                )
                    .chain()
                    .after(TrackingSet),
            );
    }
}

/// Create the measurement session when tracking starts and tear it down,
/// releasing every visual, when tracking ends.
pub fn sync_measurement_session(
    mut commands: Commands,
    mut signals: MessageReader<SessionSignal>,
    session: Option<ResMut<MeasurementSession>>,
    assets: Option<Res<MarkerAssets>>,
    config: Res<AppConfig>,
    mut debug: Option<ResMut<DebugPanelState>>,
) {
    let mut session = session;
    let mut live = session.is_some();

    for signal in signals.read() {
        match signal {
            SessionSignal::Start if !live => {
                let unit = config.measurement.default_unit;
                commands.insert_resource(MeasurementSession::new(unit));
                live = true;
                if let Some(ref mut dbg) = debug {
                    dbg.push_log(format!("Session started ({})", unit.display_name()));
                }
            }
            SessionSignal::End if live => {
                let mut released = 0;
                if let (Some(s), Some(assets)) = (session.as_mut(), assets.as_deref()) {
                    let mut sink = MarkerSpawner::new(&mut commands, assets, 0);
                    released = s.reset_measurement(&mut sink);
                }
                session = None;
                commands.remove_resource::<MeasurementSession>();
                live = false;
                info!("Measurement session discarded, released {} visuals", released);
                if let Some(ref mut dbg) = debug {
                    dbg.push_log("Session ended");
                }
            }
            _ => {}
        }
    }
}

/// Feed this frame's surface hit into the session.
pub fn apply_tracking_frame(
    tracking: Res<TrackingSession>,
    frame: Res<TrackingFrame>,
    session: Option<ResMut<MeasurementSession>>,
) {
    let Some(mut session) = session else {
        return;
    };
    if tracking.hit_test_ready() && !session.tracking_ready() {
        session.mark_tracking_ready();
    }
    session.frame_update(frame.hit);
}

/// Apply queued user actions to the session, in order.
pub fn handle_measure_actions(
    mut commands: Commands,
    mut actions: MessageReader<MeasureAction>,
    session: Option<ResMut<MeasurementSession>>,
    assets: Option<Res<MarkerAssets>>,
    mut debug: Option<ResMut<DebugPanelState>>,
) {
    let (Some(mut session), Some(assets)) = (session, assets) else {
        actions.clear();
        return;
    };

    for action in actions.read() {
        let mut sink = MarkerSpawner::new(&mut commands, &assets, session.points().len());
        match *action {
            MeasureAction::Capture => match session.user_action(&mut sink) {
                Ok(position) => {
                    let index = session.points().len();
                    info!("Captured point {} at {:?}", index, position);
                    if let Some(ref mut dbg) = debug {
                        dbg.captures += 1;
                        dbg.push_log(format!(
                            "Point {} at {}",
                            index,
                            crate::spatial::format_position(position)
                        ));
                    }
                    if session.distance().is_measured() {
                        let shown = session.distance().with_unit();
                        info!("Distance: {}", shown);
                        if let Some(ref mut dbg) = debug {
                            dbg.push_log(format!("Distance {}", shown));
                        }
                    }
                }
                Err(reason) => debug!("Capture ignored: {}", reason),
            },
            MeasureAction::Reset => {
                let released = session.reset_measurement(&mut sink);
                info!("Measurement reset, released {} visuals", released);
                if let Some(ref mut dbg) = debug {
                    dbg.resets += 1;
                    dbg.push_log("Measurement reset");
                }
            }
            MeasureAction::SetUnit(unit) => {
                if unit != session.unit() {
                    session.set_unit(unit);
                    info!("Unit set to {}", unit.display_name());
                }
            }
            MeasureAction::CycleUnit => {
                let unit = session.unit().next();
                session.set_unit(unit);
                info!("Unit set to {}", unit.display_name());
            }
        }
    }
}

/// Log each phase change once.
pub fn log_phase_transitions(
    session: Option<Res<MeasurementSession>>,
    mut last_phase: Local<Option<SessionPhase>>,
    mut debug: Option<ResMut<DebugPanelState>>,
) {
    let phase = session.map(|s| s.phase());
    if *last_phase == phase {
        return;
    }
    if let Some(phase) = phase {
        info!("Measurement phase: {:?}", phase);
        if let Some(ref mut dbg) = debug {
            dbg.push_log(format!("Phase {:?}", phase));
        }
    }
    *last_phase = phase;
}
