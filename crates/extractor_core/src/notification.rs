use std::time::Duration;

use crate::{DebounceTimer, Effect, TimerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Stays up until replaced or closed.
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Single notification slot with auto-dismiss for non-pending kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCenter {
    current: Option<Notification>,
    timer: DebounceTimer,
}

impl NotificationCenter {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            current: None,
            timer: DebounceTimer::new(TimerKind::Notification, dismiss_after),
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Replaces whatever is showing.
    pub(crate) fn show(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Option<Effect> {
        self.current = Some(Notification {
            message: message.into(),
            kind,
        });
        match kind {
            NotificationKind::Pending => self.timer.cancel(),
            NotificationKind::Success | NotificationKind::Error => Some(self.timer.arm()),
        }
    }

    pub(crate) fn dismiss(&mut self) -> Option<Effect> {
        self.current = None;
        self.timer.cancel()
    }

    /// Returns `true` if the fire dismissed the notification.
    pub(crate) fn timer_fired(&mut self, generation: u64) -> bool {
        if self.timer.fire(generation) {
            self.current = None;
            true
        } else {
            false
        }
    }
}
