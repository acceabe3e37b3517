use placemarks_core::gateways::{
    geocode::{
        self, GeocodeResult, PlaceDetails, PlaceDetailsGateway, PlaceField, ReverseGeocodingGateway,
    },
    geolocation::{GeolocationGateway, PositionError},
};
use placemarks_entities::{geo::MapPoint, id::Id};

/// Stand-in if no gateway was configured.
///
/// Every request fails, so the map stays usable but no place
/// can be resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl ReverseGeocodingGateway for Unconfigured {
    async fn reverse_geocode(&self, _: MapPoint) -> geocode::Result<Vec<GeocodeResult>> {
        log::debug!("Cannot reverse geocode because no geocoding gateway was configured");
        Err(geocode::Error::NotConfigured)
    }
}

impl PlaceDetailsGateway for Unconfigured {
    async fn place_details(
        &self,
        _: &Id,
        _: &[PlaceField],
    ) -> geocode::Result<Option<PlaceDetails>> {
        log::debug!("Cannot fetch place details because no geocoding gateway was configured");
        Err(geocode::Error::NotConfigured)
    }
}

impl GeolocationGateway for Unconfigured {
    async fn current_position(&self) -> Result<MapPoint, PositionError> {
        Err(PositionError::Other(
            "No geolocation gateway configured".to_string(),
        ))
    }
}
