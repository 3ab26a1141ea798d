//! Deterministic timer queue for single-threaded, fire-and-forget callbacks.
//!
//! Key properties:
//! - Timers fire in total order on `(due, id)`; equal deadlines fire in
//!   scheduling order.
//! - Cancellation does not perturb the order of remaining timers.
//! - `clear` releases everything at once, which is what teardown needs.
//!
//! Payloads are plain values; the owner decides what a fired timer means.
use std::time::Duration;

use foundation::time::Time;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug)]
struct Entry<T> {
    due: Time,
    id: TimerId,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn schedule_at(&mut self, due: Time, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry { due, id, payload });
        id
    }

    pub fn schedule_after(&mut self, now: Time, delay: Duration, payload: T) -> TimerId {
        self.schedule_at(now + delay, payload)
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn next_due(&self) -> Option<Time> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Pops the earliest timer whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Time) -> Option<(TimerId, Time, T)> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by(|(_, a), (_, b)| a.due.cmp(&b.due).then_with(|| a.id.cmp(&b.id)))
            .map(|(pos, _)| pos)?;
        let e = self.entries.remove(pos);
        Some((e.id, e.due, e.payload))
    }

    /// Drops every pending timer and returns how many were released.
    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;
    use foundation::time::Time;
    use std::time::Duration;

    #[test]
    fn fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule_at(Time(300), "c");
        q.schedule_at(Time(100), "a");
        q.schedule_at(Time(200), "b");

        let mut fired = Vec::new();
        while let Some((_, _, p)) = q.pop_due(Time(1000)) {
            fired.push(p);
        }
        assert_eq!(fired, vec!["a", "b", "c"]);
    }

    #[test]
    fn equal_deadlines_fire_in_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule_at(Time(5), 1);
        q.schedule_at(Time(5), 2);
        q.schedule_at(Time(5), 3);
        let order: Vec<i32> = std::iter::from_fn(|| q.pop_due(Time(5)).map(|(_, _, p)| p)).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn does_not_fire_early() {
        let mut q = TimerQueue::new();
        q.schedule_after(Time(1000), Duration::from_secs(5), ());
        assert!(q.pop_due(Time(5999)).is_none());
        assert_eq!(q.next_due(), Some(Time(6000)));
        assert!(q.pop_due(Time(6000)).is_some());
        assert!(q.is_empty());
    }

    #[test]
    fn cancel_removes_only_that_timer() {
        let mut q = TimerQueue::new();
        let a = q.schedule_at(Time(1), "a");
        let b = q.schedule_at(Time(2), "b");
        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert!(!q.is_pending(a));
        assert!(q.is_pending(b));
        let (id, due, p) = q.pop_due(Time(10)).unwrap();
        assert_eq!((id, due, p), (b, Time(2), "b"));
    }

    #[test]
    fn clear_releases_everything() {
        let mut q = TimerQueue::new();
        q.schedule_at(Time(1), ());
        q.schedule_at(Time(2), ());
        assert_eq!(q.clear(), 2);
        assert!(q.pop_due(Time(100)).is_none());
    }
}
