//! ECS resources that bridge the main thread with the background I/O thread.
//!
//! Use [`setup_io`] once while building the session to spawn the thread and
//! insert the [`IoBridge`] and `Messages<IoMessage>` resources. Call
//! [`shutdown_io`] during teardown to stop the thread and join it.

use std::sync::atomic::{AtomicUsize, Ordering};

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::warn;

use crate::events::io::{IoCmd, IoMessage};
use crate::systems::io::io_thread;

/// Shared bridge between the ECS world and the I/O thread.
#[derive(Resource)]
pub struct IoBridge {
    /// Sender for [`IoCmd`] messages (ECS -> I/O thread).
    pub tx_cmd: Sender<IoCmd>,
    /// Receiver for [`IoMessage`] replies (I/O thread -> ECS).
    pub rx_msg: Receiver<IoMessage>,
    /// Join handle for the background thread.
    pub handle: std::thread::JoinHandle<()>,
    /// Commands sent whose reply has not been polled yet.
    pub in_flight: AtomicUsize,
}

impl IoBridge {
    /// Queue a command. Fire-and-forget: the reply arrives as an [`IoMessage`].
    pub fn send(&self, cmd: IoCmd) {
        if self.tx_cmd.send(cmd).is_err() {
            warn!("I/O thread is gone, command dropped");
            return;
        }
        self.in_flight.fetch_add(1, Ordering::AcqRel);
    }

    /// Number of commands still waiting for their reply to be polled.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Record that `n` replies were taken off the channel.
    pub fn mark_received(&self, n: usize) {
        let _ = self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| {
                Some(v.saturating_sub(n))
            });
    }
}

/// Spawn the I/O thread and register the bridge resources.
pub fn setup_io(world: &mut World) {
    let (tx_cmd, rx_cmd) = unbounded::<IoCmd>();
    let (tx_msg, rx_msg) = unbounded::<IoMessage>();

    let handle = std::thread::spawn(move || io_thread(rx_cmd, tx_msg));

    world.insert_resource(IoBridge {
        tx_cmd,
        rx_msg,
        handle,
        in_flight: AtomicUsize::new(0),
    });
    world.insert_resource(Messages::<IoMessage>::default());
}

/// Request shutdown of the I/O thread and join it.
pub fn shutdown_io(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<IoBridge>() {
        let _ = bridge.tx_cmd.send(IoCmd::Shutdown);
        let _ = bridge.handle.join();
    }
}
