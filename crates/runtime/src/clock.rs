use std::time::Duration;

use foundation::time::Time;

/// Manually driven clock.
///
/// This is the only timebase the controller sees. Hosts step it from their
/// event loop; tests step it directly, so nothing ever sleeps.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Time,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now: Time) -> Self {
        Self { now }
    }

    pub fn now(&self) -> Time {
        self.now
    }

    /// Moves the clock forward and returns the new time.
    pub fn advance(&mut self, by: Duration) -> Time {
        self.now += by;
        self.now
    }

    /// Jumps to `t`. Going backwards is ignored; the clock is monotonic.
    pub fn set(&mut self, t: Time) -> Time {
        if t > self.now {
            self.now = t;
        }
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::ManualClock;
    use foundation::time::Time;
    use std::time::Duration;

    #[test]
    fn advance_is_deterministic() {
        let mut a = ManualClock::new();
        let mut b = ManualClock::new();
        a.advance(Duration::from_millis(1500));
        b.advance(Duration::from_millis(1500));
        assert_eq!(a, b);
        assert_eq!(a.now(), Time(1500));
    }

    #[test]
    fn set_never_goes_backwards() {
        let mut c = ManualClock::starting_at(Time(10));
        assert_eq!(c.set(Time(5)), Time(10));
        assert_eq!(c.set(Time(20)), Time(20));
    }
}
