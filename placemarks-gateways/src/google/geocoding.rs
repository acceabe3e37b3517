use serde::Deserialize;

use placemarks_core::gateways::geocode::{self, GeocodeResult, ReverseGeocodingGateway};
use placemarks_entities::geo::MapPoint;

use super::{status_error, GoogleMaps, Status};

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    status: Status,
    #[serde(default)]
    results: Vec<RawGeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGeocodeResult {
    formatted_address: String,
    place_id: Option<String>,
}

fn into_geocode_results(response: ReverseGeocodeResponse) -> geocode::Result<Vec<GeocodeResult>> {
    let ReverseGeocodeResponse {
        status,
        results,
        error_message,
    } = response;
    match status {
        Status::Ok => Ok(results
            .into_iter()
            .map(|r| GeocodeResult {
                formatted_address: r.formatted_address,
                place_id: r.place_id.filter(|id| !id.is_empty()).map(Into::into),
            })
            .collect()),
        Status::ZeroResults => Ok(vec![]),
        status => Err(status_error(status, error_message)),
    }
}

impl ReverseGeocodingGateway for GoogleMaps {
    async fn reverse_geocode(&self, pos: MapPoint) -> geocode::Result<Vec<GeocodeResult>> {
        let latlng = format!("{},{}", pos.lat, pos.lng);
        let response = self
            .get_json("geocode/json", &[("latlng", latlng.as_str())])
            .await?;
        let results = into_geocode_results(response)?;
        log::debug!("Reverse geocoded {pos}: {} results", results.len());
        Ok(results)
    }
}
