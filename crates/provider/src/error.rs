use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("map provider credential is missing or empty")]
    MissingCredential,

    #[error("map provider failed to load: {0}")]
    LoadFailed(String),

    #[error("unknown viewport")]
    UnknownViewport,
}
