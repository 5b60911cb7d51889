use std::time::Duration;

use crate::Effect;

/// One debounce slot per state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Preload,
    Preview,
    Notification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub preload_debounce: Duration,
    pub preview_debounce: Duration,
    pub notification_dismiss: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            preload_debounce: Duration::from_millis(500),
            preview_debounce: Duration::from_millis(800),
            notification_dismiss: Duration::from_millis(5000),
        }
    }
}

/// Cancelable timer owned by a single state machine.
///
/// Every `arm` bumps the generation, and only a fire carrying the current
/// generation is accepted. A fire that raced with a re-arm or a cancel is
/// therefore dropped even if the runtime already delivered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceTimer {
    kind: TimerKind,
    delay: Duration,
    generation: u64,
    armed: bool,
}

impl DebounceTimer {
    pub fn new(kind: TimerKind, delay: Duration) -> Self {
        Self {
            kind,
            delay,
            generation: 0,
            armed: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Arms (or re-arms) the timer. The runtime replaces any earlier timer
    /// of the same kind when it executes the returned effect.
    pub fn arm(&mut self) -> Effect {
        self.generation += 1;
        self.armed = true;
        Effect::ArmTimer {
            kind: self.kind,
            generation: self.generation,
            delay: self.delay,
        }
    }

    pub fn cancel(&mut self) -> Option<Effect> {
        if !self.armed {
            return None;
        }
        self.armed = false;
        self.generation += 1;
        Some(Effect::CancelTimer { kind: self.kind })
    }

    /// Consumes a fire event. Returns `true` only for the live generation.
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.armed && generation == self.generation {
            self.armed = false;
            true
        } else {
            false
        }
    }
}
