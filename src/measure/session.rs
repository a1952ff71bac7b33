use bevy::prelude::*;

use super::capture::{MarkerHandle, MarkerSink, PointSet, Rejected};
use super::engine::{DisplayDistance, MeasurementEngine};
use super::reticle::{ReticleState, ReticleTracker};
use crate::spatial::{format_position, SpatialPose};
use crate::units::MeasurementUnit;

/// Where the user is in a measurement. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SessionPhase {
    /// No points, no surface under the reticle
    AwaitingSurface,
    /// No points, reticle on a surface
    AimingFirst,
    /// One point, reticle off any surface
    FirstPointSet,
    /// One point, reticle on a surface
    AimingSecond,
    /// Two points captured
    Complete,
}

impl SessionPhase {
    /// Derive the phase from the captured point count and reticle visibility.
    pub fn derive(captured: usize, reticle_visible: bool) -> Self {
        match (captured, reticle_visible) {
            (0, false) => SessionPhase::AwaitingSurface,
            (0, true) => SessionPhase::AimingFirst,
            (1, false) => SessionPhase::FirstPointSet,
            (1, true) => SessionPhase::AimingSecond,
            _ => SessionPhase::Complete,
        }
    }

    /// Whether a user action captures a point in this phase.
    pub fn accepts_capture(self) -> bool {
        matches!(self, SessionPhase::AimingFirst | SessionPhase::AimingSecond)
    }

    /// Instruction text shown at the top of the view.
    pub fn instruction(self) -> &'static str {
        match self {
            SessionPhase::AwaitingSurface => {
                "Surface not detected. Move your device slowly to scan the area."
            }
            SessionPhase::AimingFirst => "Surface found. Tap to place the first point.",
            SessionPhase::FirstPointSet => "First point placed. Aim at the second point.",
            SessionPhase::AimingSecond => "Tap to place the second point.",
            SessionPhase::Complete => "Measurement complete. Reset to measure again.",
        }
    }

    /// Label of the action button.
    pub fn action_label(self) -> &'static str {
        match self {
            SessionPhase::AwaitingSurface | SessionPhase::AimingFirst => "Place Point 1",
            SessionPhase::FirstPointSet | SessionPhase::AimingSecond => "Place Point 2",
            SessionPhase::Complete => "Measured",
        }
    }
}

/// Everything the UI shows, recomputed from the session on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementView {
    pub phase: SessionPhase,
    pub instruction: &'static str,
    pub action_label: &'static str,
    pub action_enabled: bool,
    pub reset_enabled: bool,
    /// `(x.xx, y.xx, z.xx)` per point, `None` until captured
    pub point_labels: [Option<String>; 2],
    pub distance: DisplayDistance,
    pub tracking_ready: bool,
}

/// One measurement session: captured points, active unit and the reticle.
///
/// Lives for one tracking session and is dropped when it ends. Every
/// mutation goes through this type from a single system, so no locking is
/// needed.
#[derive(Resource)]
pub struct MeasurementSession {
    points: PointSet,
    unit: MeasurementUnit,
    reticle: ReticleState,
    /// Hit from the current frame, replaced by every `frame_update`
    frame_hit: Option<SpatialPose>,
    tracking_ready: bool,
    line: Option<MarkerHandle>,
    distance: DisplayDistance,
}

impl MeasurementSession {
    pub fn new(unit: MeasurementUnit) -> Self {
        Self {
            points: PointSet::default(),
            unit,
            reticle: ReticleState::hidden(),
            frame_hit: None,
            tracking_ready: false,
            line: None,
            distance: DisplayDistance::placeholder(unit),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::derive(self.points.len(), self.reticle.visible)
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn unit(&self) -> MeasurementUnit {
        self.unit
    }

    pub fn reticle(&self) -> &ReticleState {
        &self.reticle
    }

    pub fn distance(&self) -> &DisplayDistance {
        &self.distance
    }

    pub fn tracking_ready(&self) -> bool {
        self.tracking_ready
    }

    /// Hit-test capability arrived; frames may now carry surface hits.
    pub fn mark_tracking_ready(&mut self) {
        self.tracking_ready = true;
    }

    /// Feed one tracking frame. Hits are ignored until tracking is ready.
    pub fn frame_update(&mut self, hit: Option<SpatialPose>) -> SessionPhase {
        self.frame_hit = if self.tracking_ready { hit } else { None };
        self.reticle = ReticleTracker::track(self.frame_hit, self.points.len());
        self.phase()
    }

    /// The single entry point for taps, clicks and the action button.
    ///
    /// Returns the captured position, or the reason nothing happened.
    pub fn user_action(&mut self, sink: &mut impl MarkerSink) -> Result<Vec3, Rejected> {
        let position = self
            .points
            .append(self.reticle.pose.as_ref(), sink)?
            .position();

        self.reticle = ReticleTracker::track(self.frame_hit, self.points.len());

        if let Some((a, b)) = self.points.endpoints() {
            self.line = Some(sink.draw_line(a, b));
            self.distance = MeasurementEngine::compute(&self.points, self.unit);
        }
        Ok(position)
    }

    /// Change the display unit. A complete measurement is recomputed from
    /// the stored points.
    pub fn set_unit(&mut self, unit: MeasurementUnit) {
        self.unit = unit;
        self.distance = MeasurementEngine::compute(&self.points, unit);
    }

    /// Drop all points and visuals. The unit is kept. Returns how many
    /// handles were released.
    pub fn reset_measurement(&mut self, sink: &mut impl MarkerSink) -> usize {
        let mut released = self.points.reset(sink);
        if let Some(line) = self.line.take() {
            sink.release_marker(line);
            released += 1;
        }
        self.distance = DisplayDistance::placeholder(self.unit);
        self.reticle = ReticleTracker::track(self.frame_hit, 0);
        released
    }

    pub fn view(&self) -> MeasurementView {
        let phase = self.phase();
        let label = |i: usize| self.points.get(i).map(|p| format_position(p.position()));
        MeasurementView {
            phase,
            instruction: phase.instruction(),
            action_label: phase.action_label(),
            action_enabled: phase.accepts_capture(),
            reset_enabled: !self.points.is_empty(),
            point_labels: [label(0), label(1)],
            distance: self.distance,
            tracking_ready: self.tracking_ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::capture::test_support::RecordingSink;

    fn ready_session() -> MeasurementSession {
        let mut session = MeasurementSession::new(MeasurementUnit::Meter);
        session.mark_tracking_ready();
        session
    }

    fn aim(session: &mut MeasurementSession, position: Vec3) {
        session.frame_update(Some(SpatialPose::at(position)));
    }

    fn measure(session: &mut MeasurementSession, sink: &mut RecordingSink, a: Vec3, b: Vec3) {
        aim(session, a);
        assert!(session.user_action(sink).is_ok());
        aim(session, b);
        assert!(session.user_action(sink).is_ok());
    }

    #[test]
    fn phase_derivation_table() {
        assert_eq!(SessionPhase::derive(0, false), SessionPhase::AwaitingSurface);
        assert_eq!(SessionPhase::derive(0, true), SessionPhase::AimingFirst);
        assert_eq!(SessionPhase::derive(1, false), SessionPhase::FirstPointSet);
        assert_eq!(SessionPhase::derive(1, true), SessionPhase::AimingSecond);
        assert_eq!(SessionPhase::derive(2, false), SessionPhase::Complete);
        assert_eq!(SessionPhase::derive(2, true), SessionPhase::Complete);
    }

    #[test]
    fn full_walk_through_phases() {
        let mut sink = RecordingSink::default();
        let mut session = ready_session();
        assert_eq!(session.frame_update(None), SessionPhase::AwaitingSurface);

        assert_eq!(
            session.frame_update(Some(SpatialPose::at(Vec3::ZERO))),
            SessionPhase::AimingFirst
        );
        assert_eq!(session.user_action(&mut sink), Ok(Vec3::ZERO));
        assert_eq!(session.phase(), SessionPhase::AimingSecond);

        assert_eq!(session.frame_update(None), SessionPhase::FirstPointSet);
        assert_eq!(
            session.frame_update(Some(SpatialPose::at(Vec3::X))),
            SessionPhase::AimingSecond
        );
        assert_eq!(session.user_action(&mut sink), Ok(Vec3::X));
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert!(!session.reticle().visible);

        assert_eq!(session.distance().with_unit(), "1.00 m");
        assert_eq!(sink.markers.len(), 2);
        assert_eq!(sink.lines.len(), 1);
    }

    #[test]
    fn action_without_surface_is_ignored() {
        let mut sink = RecordingSink::default();
        let mut session = ready_session();
        session.frame_update(None);

        assert_eq!(session.user_action(&mut sink), Err(Rejected::NoTarget));
        assert!(session.points().is_empty());
        assert_eq!(session.phase(), SessionPhase::AwaitingSurface);
    }

    #[test]
    fn hits_before_tracking_ready_are_ignored() {
        let mut sink = RecordingSink::default();
        let mut session = MeasurementSession::new(MeasurementUnit::Meter);

        for _ in 0..10 {
            let phase = session.frame_update(Some(SpatialPose::at(Vec3::ONE)));
            assert_eq!(phase, SessionPhase::AwaitingSurface);
            assert!(session.user_action(&mut sink).is_err());
        }
        assert!(session.points().is_empty());
        assert_eq!(
            session.view().instruction,
            SessionPhase::AwaitingSurface.instruction()
        );

        session.mark_tracking_ready();
        assert_eq!(
            session.frame_update(Some(SpatialPose::at(Vec3::ONE))),
            SessionPhase::AimingFirst
        );
    }

    #[test]
    fn second_capture_directly_when_reticle_stays_visible() {
        let mut sink = RecordingSink::default();
        let mut session = ready_session();
        aim(&mut session, Vec3::ZERO);
        assert!(session.user_action(&mut sink).is_ok());

        // Same frame, reticle still on the surface
        assert_eq!(session.user_action(&mut sink), Ok(Vec3::ZERO));
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert_eq!(session.distance().to_string(), "0.00");
        assert!(session.distance().is_measured());
    }

    #[test]
    fn actions_after_complete_change_nothing() {
        let mut sink = RecordingSink::default();
        let mut session = ready_session();
        measure(&mut session, &mut sink, Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0));
        let distance = *session.distance();
        let labels = session.view().point_labels;

        for _ in 0..5 {
            aim(&mut session, Vec3::splat(7.0));
            assert_eq!(session.user_action(&mut sink), Err(Rejected::MeasurementFull));
        }
        assert_eq!(session.points().len(), 2);
        assert_eq!(*session.distance(), distance);
        assert_eq!(session.view().point_labels, labels);
        assert_eq!(sink.markers.len(), 2);
        assert_eq!(sink.lines.len(), 1);
    }

    #[test]
    fn unit_change_before_second_point_keeps_placeholder() {
        let mut sink = RecordingSink::default();
        let mut session = ready_session();
        aim(&mut session, Vec3::new(0.0, 1.0, 0.0));
        assert!(session.user_action(&mut sink).is_ok());

        session.set_unit(MeasurementUnit::Foot);

        let view = session.view();
        assert_eq!(view.distance.to_string(), "0.00");
        assert_eq!(view.distance.unit, MeasurementUnit::Foot);
        assert_eq!(view.point_labels[0].as_deref(), Some("(0.00, 1.00, 0.00)"));
        assert_eq!(view.point_labels[1], None);
    }

    #[test]
    fn unit_change_when_complete_recomputes_without_touching_points() {
        let mut sink = RecordingSink::default();
        let mut session = ready_session();
        measure(&mut session, &mut sink, Vec3::ZERO, Vec3::X);

        let expected = ["1.00 m", "100.00 cm", "39.37 in", "3.28 ft"];
        for (unit, text) in MeasurementUnit::ALL.into_iter().zip(expected) {
            session.set_unit(unit);
            assert_eq!(session.distance().with_unit(), text);
        }
        assert_eq!(session.points().endpoints(), Some((Vec3::ZERO, Vec3::X)));
        assert_eq!(sink.lines.len(), 1);
    }

    #[test]
    fn reset_returns_to_start_and_releases_markers() {
        let mut sink = RecordingSink::default();
        let mut session = ready_session();
        measure(&mut session, &mut sink, Vec3::ZERO, Vec3::X);
        session.set_unit(MeasurementUnit::Inch);

        session.frame_update(None);
        assert_eq!(session.reset_measurement(&mut sink), 3);
        assert_eq!(session.phase(), SessionPhase::AwaitingSurface);
        assert!(session.points().is_empty());
        assert_eq!(sink.live(), 0);
        assert_eq!(session.unit(), MeasurementUnit::Inch);
        assert!(!session.distance().is_measured());
    }

    #[test]
    fn reset_with_surface_in_view_goes_straight_to_aiming() {
        let mut sink = RecordingSink::default();
        let mut session = ready_session();
        measure(&mut session, &mut sink, Vec3::ZERO, Vec3::X);

        // The frame's hit is still there; only the point count hid the reticle
        assert_eq!(session.reset_measurement(&mut sink), 3);
        assert_eq!(session.phase(), SessionPhase::AimingFirst);
    }

    #[test]
    fn reset_at_any_length_is_safe() {
        let mut sink = RecordingSink::default();
        let mut session = ready_session();
        assert_eq!(session.reset_measurement(&mut sink), 0);

        aim(&mut session, Vec3::Y);
        assert!(session.user_action(&mut sink).is_ok());
        assert_eq!(session.reset_measurement(&mut sink), 1);
        assert_eq!(session.reset_measurement(&mut sink), 0);
        assert_eq!(sink.live(), 0);
    }

    #[test]
    fn ending_complete_session_releases_everything_once() {
        let mut sink = RecordingSink::default();
        let mut session = ready_session();
        measure(&mut session, &mut sink, Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));

        assert_eq!(session.reset_measurement(&mut sink), 3);
        drop(session);
        assert_eq!(sink.released.len(), 3);
        assert_eq!(sink.live(), 0);
    }

    #[test]
    fn point_count_stays_bounded_and_monotonic() {
        // Deterministic mix of frames with and without hits and actions
        let mut sink = RecordingSink::default();
        let mut session = ready_session();
        let mut previous = 0;
        for step in 0u32..200 {
            let hit = (step % 3 != 0).then(|| SpatialPose::at(Vec3::splat(step as f32 * 0.01)));
            session.frame_update(hit);
            if step % 2 == 0 {
                let _ = session.user_action(&mut sink);
            }
            let len = session.points().len();
            assert!(len <= 2);
            if step % 50 == 49 {
                session.reset_measurement(&mut sink);
                previous = 0;
                assert!(session.points().is_empty());
            } else {
                assert!(len >= previous);
                previous = len;
            }
        }
    }

    #[test]
    fn view_reflects_action_and_reset_affordances() {
        let mut sink = RecordingSink::default();
        let mut session = ready_session();

        session.frame_update(None);
        let view = session.view();
        assert!(!view.action_enabled);
        assert!(!view.reset_enabled);
        assert_eq!(view.action_label, "Place Point 1");

        aim(&mut session, Vec3::ZERO);
        assert!(session.view().action_enabled);
        assert!(session.user_action(&mut sink).is_ok());

        session.frame_update(None);
        let view = session.view();
        assert_eq!(view.phase, SessionPhase::FirstPointSet);
        assert_eq!(view.action_label, "Place Point 2");
        assert!(!view.action_enabled);
        assert!(view.reset_enabled);
    }
}
