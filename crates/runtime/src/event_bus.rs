use std::collections::BTreeMap;

use foundation::time::Time;

/// One trace record: what happened, when on the virtual timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub at: Time,
    pub kind: &'static str,
    pub message: String,
}

/// Append-only trace of a component's activity, in emission order.
///
/// `kind` is a short static tag ("viewport", "status", ...); tests and
/// summaries select on it.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, at: Time, kind: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::trace!(%at, kind, %message, "event");
        self.events.push(Event { at, kind, message });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Number of events per kind, sorted by kind.
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for e in &self.events {
            *counts.entry(e.kind).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use foundation::time::Time;

    fn sample() -> EventBus {
        let mut bus = EventBus::new();
        bus.emit(Time(0), "status", "ready");
        bus.emit(Time(3000), "viewport", "pan");
        bus.emit(Time(4000), "viewport", "zoom");
        bus
    }

    #[test]
    fn keeps_emission_order_and_time() {
        let bus = sample();
        assert_eq!(bus.len(), 3);
        assert_eq!(bus.events()[1].at, Time(3000));
        assert_eq!(bus.events()[2].message, "zoom");
    }

    #[test]
    fn selects_by_kind() {
        let bus = sample();
        let msgs: Vec<_> = bus.of_kind("viewport").map(|e| e.message.as_str()).collect();
        assert_eq!(msgs, vec!["pan", "zoom"]);
        assert_eq!(bus.of_kind("locate").count(), 0);
    }

    #[test]
    fn counts_per_kind() {
        let counts = sample().counts();
        assert_eq!(counts.get("viewport"), Some(&2));
        assert_eq!(counts.get("status"), Some(&1));
        assert!(EventBus::new().counts().is_empty());
    }
}
