use crate::model::{Alert, AlertKind, AlertStatus, Severity};

/// Conjunctive alert filter.
///
/// Each list constrains one field; an empty list means "any value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilters {
    pub kinds: Vec<AlertKind>,
    pub severities: Vec<Severity>,
    pub statuses: Vec<AlertStatus>,
}

/// Partial update: `None` leaves the corresponding list untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub kinds: Option<Vec<AlertKind>>,
    pub severities: Option<Vec<Severity>>,
    pub statuses: Option<Vec<AlertStatus>>,
}

impl AlertFilters {
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty() && self.severities.is_empty() && self.statuses.is_empty()
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        (self.kinds.is_empty() || self.kinds.contains(&alert.kind))
            && (self.severities.is_empty() || self.severities.contains(&alert.severity))
            && (self.statuses.is_empty() || self.statuses.contains(&alert.status))
    }

    /// Filtered copy, input order preserved.
    pub fn apply(&self, alerts: &[Alert]) -> Vec<Alert> {
        if self.is_empty() {
            return alerts.to_vec();
        }
        alerts.iter().filter(|a| self.matches(a)).cloned().collect()
    }

    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(kinds) = update.kinds {
            self.kinds = kinds;
        }
        if let Some(severities) = update.severities {
            self.severities = severities;
        }
        if let Some(statuses) = update.statuses {
            self.statuses = statuses;
        }
    }
}
