use placemarks_core::gateways::geolocation::{GeolocationGateway, PositionError};
use placemarks_entities::geo::MapPoint;

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub MapPoint);

impl GeolocationGateway for FixedPosition {
    async fn current_position(&self) -> Result<MapPoint, PositionError> {
        log::debug!("Use fixed position {}", self.0);
        Ok(self.0)
    }
}
