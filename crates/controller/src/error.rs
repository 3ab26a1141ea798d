use provider::CapabilityError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("map credential is not configured (set MAP_API_KEY)")]
    MissingCredential,

    #[error("{name} must be greater than zero")]
    ZeroPeriod { name: &'static str },

    #[error("settle delay ({settle_ms}ms) must be shorter than the autopilot tick ({tick_ms}ms)")]
    SettleNotShorterThanTick { settle_ms: u64, tick_ms: u64 },

    #[error("focus zoom {focus} must be greater than overview zoom {overview}")]
    ZoomOrder { focus: u8, overview: u8 },

    #[error("zoom level {zoom} is outside 0..={max}")]
    ZoomOutOfRange { zoom: u8, max: u8 },

    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Why the map is unavailable. Both variants are terminal for the controller instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("map capability failed to initialize: {0}")]
    Capability(#[from] CapabilityError),
}

impl MapError {
    /// Text for the host's error panel.
    pub fn user_message(&self) -> &'static str {
        match self {
            MapError::Config(ConfigError::MissingCredential)
            | MapError::Capability(CapabilityError::MissingCredential) => {
                "Falta la clave del proveedor de mapas. Configure MAP_API_KEY y reinicie."
            }
            MapError::Config(_) => "La configuración del mapa no es válida.",
            MapError::Capability(_) => "Error al cargar el mapa",
        }
    }
}

/// Outcome of a failed "locate me" request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,
}

impl GeolocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GeolocationError::PermissionDenied => {
                "Permiso de ubicación denegado. Actívelo en el navegador para usar esta función."
            }
            GeolocationError::PositionUnavailable => "No se pudo determinar su ubicación.",
            GeolocationError::Timeout => "La solicitud de ubicación tardó demasiado.",
        }
    }
}
