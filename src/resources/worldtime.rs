use bevy_ecs::prelude::Resource;

/// Session clock in milliseconds, advanced by the host once per frame.
///
/// `elapsed_ms` is the monotonic timestamp handed to playback; `delta_ms` is
/// the last frame's step.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct WorldTime {
    pub elapsed_ms: f64,
    pub delta_ms: f64,
    pub frame_count: u64,
}

impl WorldTime {
    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms
    }
}
