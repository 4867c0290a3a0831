//! Transient user notifications.
//!
//! Operations that end in something the user should hear about (an upload
//! finished, a copy failed, an animation was rejected) post a [`Notice`]
//! here. The host drains the board and presents it however it likes; the
//! core never waits on that.

use bevy_ecs::prelude::Resource;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Resource, Debug, Default)]
pub struct NoticeBoard {
    pending: Vec<Notice>,
}

impl NoticeBoard {
    pub fn success(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!("{}", text);
        self.pending.push(Notice {
            level: NoticeLevel::Success,
            text,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!("{}", text);
        self.pending.push(Notice {
            level: NoticeLevel::Error,
            text,
        });
    }

    pub fn pending(&self) -> &[Notice] {
        &self.pending
    }

    /// Take every queued notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}
