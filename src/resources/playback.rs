//! Playback scheduler resource.
//!
//! [`PlaybackScheduler`] is a two-state machine (`Stopped`/`Playing`) that
//! walks a frame cursor through the selected animation's range and loops
//! forever. It never owns the animation: every command receives the resolved
//! [`Animation`] (or `None`) from the registry.
//!
//! Time comes from the host as a monotonic millisecond timestamp. While
//! playing, the scheduler holds a subscription on a [`TickSource`], the
//! abstraction of the host's "call me on the next repaint" facility; every
//! transition to `Stopped` cancels it. [`FrameTicker`] is the in-process
//! implementation the session uses.
//!
//! # Flow
//!
//! 1. `select_animation` parks the cursor on `frame_start`, stopped
//! 2. `toggle` subscribes and stamps the start time
//! 3. each host tick calls `on_tick(now)`, which advances once per whole
//!    `1000 / fps` milliseconds and wraps `frame_end + 1` back to `frame_start`
//! 4. `toggle`, `reset`, `seek` or a new selection stop and unsubscribe

use bevy_ecs::prelude::Resource;
use log::{debug, trace};
use rustc_hash::FxHashSet;

use crate::grid::FrameRect;
use crate::resources::animationstore::{Animation, AnimationId};
use crate::resources::spriteconfig::SpriteConfig;
use crate::resources::spritesheet::SpriteSheet;

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 60;
pub const DEFAULT_FPS: u32 = 12;

/// Slack when comparing elapsed time against the frame interval, so that
/// timestamps produced by repeated float addition still land on the boundary.
const TICK_EPSILON_MS: f64 = 1e-6;

/// Handle to a live tick subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u64);

/// Host facility delivering a callback on every display refresh until
/// cancelled.
pub trait TickSource {
    fn subscribe(&mut self) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
    fn is_live(&self, handle: TickHandle) -> bool;
}

/// In-process [`TickSource`]: tracks which subscriptions are live so the host
/// loop knows whether anyone still wants refresh callbacks.
#[derive(Resource, Debug, Default)]
pub struct FrameTicker {
    live: FxHashSet<TickHandle>,
    next: u64,
}

impl FrameTicker {
    pub fn has_live(&self) -> bool {
        !self.live.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl TickSource for FrameTicker {
    fn subscribe(&mut self) -> TickHandle {
        let handle = TickHandle(self.next);
        self.next += 1;
        self.live.insert(handle);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.live.remove(&handle);
    }

    fn is_live(&self, handle: TickHandle) -> bool {
        self.live.contains(&handle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    #[default]
    Stopped,
    Playing,
}

/// Cursor, mode and rate for previewing the selected animation.
#[derive(Resource, Debug)]
pub struct PlaybackScheduler {
    current_frame: Option<usize>,
    mode: PlaybackMode,
    fps: u32,
    animation: Option<AnimationId>,
    subscription: Option<TickHandle>,
    last_advance_ms: f64,
}

impl Default for PlaybackScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FPS as i64)
    }
}

impl PlaybackScheduler {
    pub fn new(fps: i64) -> Self {
        Self {
            current_frame: None,
            mode: PlaybackMode::Stopped,
            fps: clamp_fps(fps),
            animation: None,
            subscription: None,
            last_advance_ms: 0.0,
        }
    }

    pub fn current_frame(&self) -> Option<usize> {
        self.current_frame
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn is_playing(&self) -> bool {
        self.mode == PlaybackMode::Playing
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Id of the animation the cursor belongs to.
    pub fn animation(&self) -> Option<AnimationId> {
        self.animation
    }

    pub fn subscription(&self) -> Option<TickHandle> {
        self.subscription
    }

    /// Milliseconds between two advances at the current rate.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps as f64
    }

    /// Sheet rectangle of the frame on show, if there is one to draw.
    pub fn current_rect(&self, sheet: &SpriteSheet, config: &SpriteConfig) -> Option<FrameRect> {
        sheet.frame_rect(self.current_frame?, config)
    }

    fn stop(&mut self, ticks: &mut dyn TickSource) {
        if let Some(handle) = self.subscription.take() {
            ticks.cancel(handle);
        }
        self.mode = PlaybackMode::Stopped;
    }

    /// Switch to `animation` (or to nothing): cursor on its first frame, stopped.
    pub fn select_animation(&mut self, animation: Option<&Animation>, ticks: &mut dyn TickSource) {
        self.stop(ticks);
        self.animation = animation.map(|a| a.id);
        self.current_frame = animation.map(|a| a.frame_start);
        debug!(
            "Playback selected {:?}, frame {:?}",
            self.animation, self.current_frame
        );
    }

    /// Start or pause. Does nothing without an animation.
    pub fn toggle(
        &mut self,
        animation: Option<&Animation>,
        now_ms: f64,
        ticks: &mut dyn TickSource,
    ) {
        let Some(animation) = animation else {
            return;
        };
        match self.mode {
            PlaybackMode::Playing => {
                self.stop(ticks);
                debug!("Playback paused at frame {:?}", self.current_frame);
            }
            PlaybackMode::Stopped => {
                if self.animation != Some(animation.id) {
                    self.animation = Some(animation.id);
                    self.current_frame = Some(animation.frame_start);
                }
                if !self.current_frame.is_some_and(|f| animation.contains(f)) {
                    self.current_frame = Some(animation.frame_start);
                }
                self.subscription = Some(ticks.subscribe());
                self.mode = PlaybackMode::Playing;
                self.last_advance_ms = now_ms;
                debug!(
                    "Playback started '{}' at frame {:?}, {} fps",
                    animation.name, self.current_frame, self.fps
                );
            }
        }
    }

    /// Rewind to the first frame and stop.
    pub fn reset(&mut self, animation: Option<&Animation>, ticks: &mut dyn TickSource) {
        let Some(animation) = animation else {
            return;
        };
        self.stop(ticks);
        self.animation = Some(animation.id);
        self.current_frame = Some(animation.frame_start);
    }

    /// Jump to `frame`, clamped into the animation's range, and stop.
    pub fn seek(&mut self, frame: i64, animation: Option<&Animation>, ticks: &mut dyn TickSource) {
        let Some(animation) = animation else {
            return;
        };
        self.stop(ticks);
        let clamped = frame.clamp(animation.frame_start as i64, animation.last_frame() as i64);
        self.animation = Some(animation.id);
        self.current_frame = Some(clamped as usize);
    }

    /// Change the rate, clamped to `1..=60`. The cursor and the time of the
    /// last advance are kept, so the new interval applies from the next tick.
    pub fn set_fps(&mut self, fps: i64) {
        self.fps = clamp_fps(fps);
    }

    /// Advance for the host tick at `now_ms`. Returns how many frames moved.
    ///
    /// Safe to call on every refresh: without a due advance it does nothing.
    /// A late tick catches up on every whole interval it missed and keeps the
    /// remainder for the next one.
    pub fn on_tick(
        &mut self,
        now_ms: f64,
        animation: Option<&Animation>,
        ticks: &mut dyn TickSource,
    ) -> usize {
        if self.mode != PlaybackMode::Playing {
            return 0;
        }
        if !self.subscription.is_some_and(|h| ticks.is_live(h)) {
            self.subscription = None;
            self.mode = PlaybackMode::Stopped;
            return 0;
        }
        let Some(animation) = animation.filter(|a| Some(a.id) == self.animation) else {
            debug!("Playback target vanished, stopping");
            self.stop(ticks);
            return 0;
        };

        let interval = self.frame_interval_ms();
        let elapsed = now_ms - self.last_advance_ms;
        if elapsed + TICK_EPSILON_MS < interval {
            return 0;
        }
        let steps = ((elapsed + TICK_EPSILON_MS) / interval).floor() as usize;
        self.last_advance_ms += steps as f64 * interval;

        let span = animation.frame_count();
        let current = self
            .current_frame
            .filter(|f| animation.contains(*f))
            .unwrap_or(animation.frame_start);
        let offset = (current - animation.frame_start + steps) % span;
        self.current_frame = Some(animation.frame_start + offset);
        trace!(
            "Playback advanced {} step(s) to frame {:?}",
            steps, self.current_frame
        );
        steps
    }
}

fn clamp_fps(fps: i64) -> u32 {
    fps.clamp(MIN_FPS as i64, MAX_FPS as i64) as u32
}
