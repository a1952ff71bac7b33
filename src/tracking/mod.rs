pub mod session;

pub use hit_test::*;
pub use session::*;

use bevy::prelude::*;

/// Stand-in for the device tracking runtime: session lifecycle, the one-shot
/// hit-test capability and per-frame surface hits.
pub struct TrackingPlugin;

impl Plugin for TrackingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrackingSession>()
            .init_resource::<TrackingFrame>()
            .add_message::<SessionSignal>()
            .add_systems(
                Update,
                (handle_session_signals, poll_hit_test_source, cast_hit_test)
                    .chain()
                    .in_set(TrackingSet),
            );
    }
}

/// Systems producing this frame's tracking data. Consumers run after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingSet;
