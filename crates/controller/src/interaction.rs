use std::time::Duration;

use foundation::time::Time;
use runtime::timers::{TimerId, TimerQueue};

use crate::config::InteractionConfig;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    /// Interacting until `until`, unless another gesture arrives first.
    Interacting { until: Time },
}

/// Tracks whether the user is driving the map.
///
/// Every gesture restarts a single expiry timer; the flag drops exactly
/// `quiet_period` after the most recent gesture.
#[derive(Debug)]
pub struct InteractionTracker {
    quiet_period: Duration,
    state: InteractionState,
    timer: Option<TimerId>,
}

impl InteractionTracker {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            quiet_period: config.quiet_period,
            state: InteractionState::Idle,
            timer: None,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_interacting(&self) -> bool {
        matches!(self.state, InteractionState::Interacting { .. })
    }

    /// Records a gesture at `now` and returns the new expiry.
    ///
    /// The previous expiry timer, if any, is cancelled so at most one is pending.
    pub fn record_gesture<T>(&mut self, now: Time, timers: &mut TimerQueue<T>, payload: T) -> Time {
        if let Some(old) = self.timer.take() {
            timers.cancel(old);
        }
        let until = now + self.quiet_period;
        self.timer = Some(timers.schedule_at(until, payload));
        self.state = InteractionState::Interacting { until };
        until
    }

    /// Handles a fired expiry timer. Returns true if the tracker went idle.
    pub fn on_timer(&mut self, id: TimerId, now: Time) -> bool {
        if self.timer != Some(id) {
            return false;
        }
        self.timer = None;
        match self.state {
            InteractionState::Interacting { until } if now >= until => {
                self.state = InteractionState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Cancels the pending expiry and returns to idle.
    pub fn release<T>(&mut self, timers: &mut TimerQueue<T>) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
        self.state = InteractionState::Idle;
    }
}
