use thiserror::Error;

use crate::entities::MapPoint;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Position unavailable")]
    PositionUnavailable,
    #[error("Timeout")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

#[allow(async_fn_in_trait)]
pub trait GeolocationGateway {
    /// One-shot request for the current position.
    async fn current_position(&self) -> Result<MapPoint, PositionError>;
}
