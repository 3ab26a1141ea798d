use crate::error::AlertsError;
use crate::model::{Alert, HeatmapPoint};

/// Parses a JSON array of alerts and rejects entries that cannot be placed on a map.
pub fn load_feed(json: &str) -> Result<Vec<Alert>, AlertsError> {
    let alerts: Vec<Alert> = serde_json::from_str(json)?;
    for a in &alerts {
        if !a.position().is_valid() {
            return Err(AlertsError::InvalidLocation {
                id: a.id.to_string(),
                lat: a.location.lat,
                lng: a.location.lng,
            });
        }
    }
    Ok(alerts)
}

/// Parses a JSON array of `{lat, lng, intensity}` samples.
///
/// Intensities are clamped into `[0, 1]`; coordinates must be valid.
pub fn load_heatmap(json: &str) -> Result<Vec<HeatmapPoint>, AlertsError> {
    let points: Vec<HeatmapPoint> = serde_json::from_str(json)?;
    points
        .into_iter()
        .enumerate()
        .map(|(index, p)| {
            if !p.position().is_valid() {
                return Err(AlertsError::InvalidHeatmapPoint {
                    index,
                    lat: p.lat,
                    lng: p.lng,
                });
            }
            Ok(p)
        })
        .collect()
}
