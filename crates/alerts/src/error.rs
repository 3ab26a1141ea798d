use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertsError {
    #[error("malformed alert feed: {0}")]
    Feed(#[from] serde_json::Error),

    #[error("alert {id} has invalid coordinates ({lat}, {lng})")]
    InvalidLocation { id: String, lat: f64, lng: f64 },

    #[error("heatmap point #{index} has invalid coordinates ({lat}, {lng})")]
    InvalidHeatmapPoint { index: usize, lat: f64, lng: f64 },
}
