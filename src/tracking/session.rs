use bevy::prelude::*;

use super::hit_test::{request_hit_test_source, HitTestState, TrackingFrame};
use crate::config::{AppConfig, TrackingConfig};

/// Lifecycle signals of the immersive tracking session.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    Start,
    End,
}

/// State of the tracking session as seen by the rest of the app.
#[derive(Resource, Default, Reflect)]
pub struct TrackingSession {
    /// Frames are being tracked
    pub active: bool,
    /// One-shot hit-test capability request
    #[reflect(ignore)]
    pub hit_test: HitTestState,
    /// Tracked frames this session
    pub frames: u64,
    /// Tracked frames with a surface hit this session
    pub frames_with_hit: u64,
}

impl TrackingSession {
    /// Begin tracking and request the hit-test capability. Returns false if
    /// a session is already running.
    pub fn start(&mut self, config: &TrackingConfig) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.frames = 0;
        self.frames_with_hit = 0;
        self.hit_test = request_hit_test_source(config);
        true
    }

    /// Stop tracking. Any in-flight capability request is abandoned. Returns
    /// false if no session was running.
    pub fn end(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        if let HitTestState::Pending(pending) = &mut self.hit_test {
            pending.cancel();
        }
        self.hit_test = HitTestState::Idle;
        true
    }

    pub fn hit_test_ready(&self) -> bool {
        matches!(self.hit_test, HitTestState::Ready(_))
    }

    /// Short status for the debug panel.
    pub fn status_label(&self) -> &'static str {
        match (&self.hit_test, self.active) {
            (_, false) => "Not started",
            (HitTestState::Idle, true) => "Starting",
            (HitTestState::Pending(_), true) => "Requesting hit-test",
            (HitTestState::Ready(_), true) => "Tracking",
            (HitTestState::Unavailable, true) => "Hit-test unavailable",
        }
    }
}

/// Apply start/end signals to the tracking session.
pub fn handle_session_signals(
    mut signals: MessageReader<SessionSignal>,
    mut tracking: ResMut<TrackingSession>,
    mut frame: ResMut<TrackingFrame>,
    config: Res<AppConfig>,
) {
    for signal in signals.read() {
        match signal {
            SessionSignal::Start => {
                if tracking.start(&config.tracking) {
                    info!("Tracking session started");
                }
            }
            SessionSignal::End => {
                if tracking.end() {
                    frame.hit = None;
                    info!("Tracking session ended");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slow_config() -> TrackingConfig {
        TrackingConfig {
            hit_test_delay_ms: 60_000,
            ..TrackingConfig::default()
        }
    }

    #[test]
    fn start_requests_capability_once() {
        let mut tracking = TrackingSession::default();
        assert_eq!(tracking.status_label(), "Not started");

        assert!(tracking.start(&slow_config()));
        assert!(tracking.active);
        assert!(matches!(tracking.hit_test, HitTestState::Pending(_)));
        assert_eq!(tracking.status_label(), "Requesting hit-test");
        assert!(!tracking.hit_test_ready());

        assert!(!tracking.start(&slow_config()));
    }

    #[test]
    fn end_drops_pending_request() {
        let mut tracking = TrackingSession::default();
        assert!(!tracking.end());

        tracking.start(&slow_config());
        tracking.frames = 12;
        assert!(tracking.end());
        assert!(!tracking.active);
        assert!(matches!(tracking.hit_test, HitTestState::Idle));
        assert!(!tracking.end());

        tracking.start(&slow_config());
        assert_eq!(tracking.frames, 0);
    }
}
