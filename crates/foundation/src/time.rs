use std::ops::{Add, AddAssign};
use std::time::Duration;

/// Point on a virtual, monotonic timeline (milliseconds since an arbitrary origin).
///
/// Nothing in the core reads a wall clock; hosts advance time explicitly so
/// every timer-driven behavior is reproducible in tests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub u64);

impl Time {
    pub const ZERO: Time = Time(0);

    pub const fn from_millis(ms: u64) -> Self {
        Time(ms)
    }

    pub const fn from_secs(s: u64) -> Self {
        Time(s * 1000)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Elapsed time since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_duration_since(self, earlier: Time) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Time {
        let ms = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Time(self.0.saturating_add(ms))
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t+{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;
    use std::time::Duration;

    #[test]
    fn adds_durations_in_millis() {
        let t = Time::from_secs(3) + Duration::from_millis(250);
        assert_eq!(t, Time(3250));
        let mut u = Time::ZERO;
        u += Duration::from_secs(5);
        assert_eq!(u.as_millis(), 5000);
    }

    #[test]
    fn addition_saturates() {
        assert_eq!(Time(u64::MAX - 1) + Duration::from_secs(1), Time(u64::MAX));
    }

    #[test]
    fn duration_since_saturates_at_zero() {
        assert_eq!(
            Time(7000).saturating_duration_since(Time(2000)),
            Duration::from_secs(5)
        );
        assert_eq!(Time(1).saturating_duration_since(Time(2)), Duration::ZERO);
    }
}
