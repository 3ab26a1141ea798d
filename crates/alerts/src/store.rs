use crate::filters::{AlertFilters, FilterUpdate};
use crate::model::{Alert, AlertId};

/// Normalized alert state: the full set, the filtered view and the selection.
///
/// The filtered list is always `filters.apply(all)`; it is what the map shows.
#[derive(Debug, Clone, Default)]
pub struct AlertStore {
    all: Vec<Alert>,
    filtered: Vec<Alert>,
    selected: Option<AlertId>,
    filters: AlertFilters,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Alert] {
        &self.all
    }

    pub fn filtered(&self) -> &[Alert] {
        &self.filtered
    }

    pub fn filters(&self) -> &AlertFilters {
        &self.filters
    }

    /// Replaces the whole set wholesale.
    pub fn set_alerts(&mut self, alerts: Vec<Alert>) {
        self.all = alerts;
        self.refilter();
    }

    /// Newest first: the alert is prepended.
    pub fn add_alert(&mut self, alert: Alert) {
        self.all.insert(0, alert);
        self.refilter();
    }

    /// Selects by id. Returns `false` (and clears the selection) if the id is unknown.
    pub fn select(&mut self, id: Option<&AlertId>) -> bool {
        match id {
            Some(id) if self.all.iter().any(|a| &a.id == id) => {
                self.selected = Some(id.clone());
                true
            }
            Some(_) => {
                self.selected = None;
                false
            }
            None => {
                self.selected = None;
                true
            }
        }
    }

    pub fn selected(&self) -> Option<&Alert> {
        let id = self.selected.as_ref()?;
        self.all.iter().find(|a| &a.id == id)
    }

    pub fn update_filters(&mut self, update: FilterUpdate) {
        self.filters.merge(update);
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.filters = AlertFilters::default();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = self.filters.apply(&self.all);
    }
}

#[cfg(test)]
mod tests {
    use super::AlertStore;
    use crate::filters::FilterUpdate;
    use crate::model::{Alert, AlertId, AlertKind, Location, Severity};
    use chrono::{TimeZone, Utc};

    fn alert(id: &str, kind: AlertKind) -> Alert {
        Alert::new(
            id,
            kind,
            Severity::Medium,
            Location::at(18.5, -69.9),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn filtered_ids(s: &AlertStore) -> Vec<String> {
        s.filtered().iter().map(|a| a.id.to_string()).collect()
    }

    #[test]
    fn add_alert_prepends_and_respects_filters() {
        let mut s = AlertStore::new();
        s.set_alerts(vec![alert("a", AlertKind::Flood), alert("b", AlertKind::Fire)]);
        s.update_filters(FilterUpdate {
            kinds: Some(vec![AlertKind::Flood]),
            ..FilterUpdate::default()
        });
        assert_eq!(filtered_ids(&s), vec!["a"]);

        s.add_alert(alert("c", AlertKind::Flood));
        assert_eq!(filtered_ids(&s), vec!["c", "a"]);
        assert_eq!(s.all().len(), 3);

        s.clear_filters();
        assert_eq!(filtered_ids(&s), vec!["c", "a", "b"]);
    }

    #[test]
    fn set_alerts_reapplies_current_filters() {
        let mut s = AlertStore::new();
        s.update_filters(FilterUpdate {
            kinds: Some(vec![AlertKind::Fire]),
            ..FilterUpdate::default()
        });
        s.set_alerts(vec![alert("a", AlertKind::Flood), alert("b", AlertKind::Fire)]);
        assert_eq!(filtered_ids(&s), vec!["b"]);
    }

    #[test]
    fn selection_tracks_known_ids_only() {
        let mut s = AlertStore::new();
        s.set_alerts(vec![alert("a", AlertKind::Flood)]);
        assert!(s.select(Some(&AlertId::new("a"))));
        assert_eq!(s.selected().map(|a| a.id.as_str()), Some("a"));
        assert!(!s.select(Some(&AlertId::new("zzz"))));
        assert!(s.selected().is_none());
    }
}
