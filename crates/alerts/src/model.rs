//! Alert records as handed to the map controller.
//!
//! Field names on the wire follow the dashboard feed (`type`, `affectedPopulation`, ...).
//! Alerts are immutable once received; a new feed replaces the whole set.

use chrono::{DateTime, Utc};
use foundation::geo::LatLng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(pub String);

impl AlertId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Flood,
    Collapse,
    Incident,
    Fire,
    Earthquake,
}

impl AlertKind {
    pub const ALL: [AlertKind; 5] = [
        AlertKind::Flood,
        AlertKind::Collapse,
        AlertKind::Incident,
        AlertKind::Fire,
        AlertKind::Earthquake,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Flood => "flood",
            AlertKind::Collapse => "collapse",
            AlertKind::Incident => "incident",
            AlertKind::Fire => "fire",
            AlertKind::Earthquake => "earthquake",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Investigating,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Investigating => "investigating",
            AlertStatus::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

impl Location {
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            address: None,
            district: None,
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: Location,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_population: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_damage: Option<String>,
}

impl Alert {
    /// Minimal alert; optional metadata left empty.
    pub fn new(
        id: impl Into<String>,
        kind: AlertKind,
        severity: Severity,
        location: Location,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AlertId::new(id),
            kind,
            severity,
            title: String::new(),
            description: String::new(),
            location,
            timestamp,
            status: AlertStatus::Active,
            author: None,
            link: None,
            tag: None,
            affected_population: None,
            estimated_damage: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_status(mut self, status: AlertStatus) -> Self {
        self.status = status;
        self
    }

    pub fn position(&self) -> LatLng {
        self.location.position()
    }
}

/// Weighted heatmap sample.
///
/// `new` and deserialization clamp `intensity` into `[0, 1]`. Struct literals
/// are not checked; consumers call [`HeatmapPoint::clamped`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHeatmapPoint")]
pub struct HeatmapPoint {
    pub lat: f64,
    pub lng: f64,
    pub intensity: f64,
}

#[derive(Deserialize)]
struct RawHeatmapPoint {
    lat: f64,
    lng: f64,
    intensity: f64,
}

impl From<RawHeatmapPoint> for HeatmapPoint {
    fn from(raw: RawHeatmapPoint) -> Self {
        HeatmapPoint::new(raw.lat, raw.lng, raw.intensity)
    }
}

impl HeatmapPoint {
    /// Clamps `intensity` into `[0, 1]`; NaN becomes 0.
    pub fn new(lat: f64, lng: f64, intensity: f64) -> Self {
        let intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        Self {
            lat,
            lng,
            intensity,
        }
    }

    pub fn clamped(self) -> Self {
        Self::new(self.lat, self.lng, self.intensity)
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}
