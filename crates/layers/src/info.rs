//! Hover overlay content for alert markers.
//!
//! User-facing strings are Spanish, matching the rest of the dashboard.

use alerts::{Alert, AlertId, Severity};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoCard {
    pub alert_id: AlertId,
    pub title: String,
    pub severity: Severity,
    pub description: String,
    pub address: Option<String>,
    pub district: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub affected_population: Option<u64>,
}

impl InfoCard {
    pub fn for_alert(alert: &Alert) -> Self {
        Self {
            alert_id: alert.id.clone(),
            title: alert.title.clone(),
            severity: alert.severity,
            description: alert.description.clone(),
            address: alert.location.address.clone(),
            district: alert.location.district.clone(),
            timestamp: alert.timestamp,
            affected_population: alert.affected_population,
        }
    }

    pub fn severity_label(&self) -> String {
        self.severity.as_str().to_uppercase()
    }

    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        time_ago(self.timestamp, now)
    }

    /// Plain-text rendering, one field per line; absent fields are omitted.
    pub fn render(&self, now: DateTime<Utc>) -> String {
        let mut lines = vec![
            format!("{} [{}]", self.title, self.severity_label()),
            self.description.clone(),
        ];
        if let Some(address) = &self.address {
            lines.push(format!("📍 {address}"));
        }
        if let Some(district) = &self.district {
            lines.push(format!("🏘️ {district}"));
        }
        lines.push(format!("⏰ {}", self.time_ago(now)));
        if let Some(n) = self.affected_population {
            lines.push(format!("👥 {} afectados", group_thousands(n)));
        }
        lines.retain(|l| !l.is_empty());
        lines.join("\n")
    }
}

/// Coarse relative time: minutes under an hour, hours under a day, then days.
/// Future timestamps read as "now".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        "Ahora mismo".to_string()
    } else if minutes < 60 {
        format!("Hace {minutes} min")
    } else if minutes < 1440 {
        format!("Hace {} horas", minutes / 60)
    } else {
        format!("Hace {} días", minutes / 1440)
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
