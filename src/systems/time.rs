//! Time update system.
//!
//! Advances the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! clock once per session pass. Playback reads its timestamps from here, so a
//! host driving the session with a simulated clock gets deterministic frames.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Add `dt_ms` to the session clock.
///
/// Negative or non-finite steps are treated as zero; the clock never runs
/// backwards.
pub fn update_world_time(world: &mut World, dt_ms: f64) {
    let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
    let mut wt = world.resource_mut::<WorldTime>();
    wt.elapsed_ms += dt_ms;
    wt.delta_ms = dt_ms;
    wt.frame_count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_and_ignores_bad_steps() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        update_world_time(&mut world, 16.5);
        update_world_time(&mut world, -4.0);
        update_world_time(&mut world, f64::NAN);
        let wt = world.resource::<WorldTime>();
        assert_eq!(wt.elapsed_ms, 16.5);
        assert_eq!(wt.delta_ms, 0.0);
        assert_eq!(wt.frame_count, 3);
    }
}
