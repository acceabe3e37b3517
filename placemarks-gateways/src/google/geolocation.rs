use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use placemarks_core::gateways::geolocation::{GeolocationGateway, PositionError};
use placemarks_entities::geo::MapPoint;

use super::{GoogleMaps, LatLng};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeolocateRequest {
    consider_ip: bool,
}

#[derive(Debug, Deserialize)]
struct GeolocateResponse {
    location: LatLng,
    accuracy: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: String,
}

fn request_error(err: reqwest::Error) -> PositionError {
    if err.is_timeout() {
        PositionError::Timeout
    } else {
        PositionError::Other(err.to_string())
    }
}

fn position_error(status: StatusCode, body: Option<ErrorResponse>) -> PositionError {
    let (message, reason) = body
        .map(|ErrorResponse { error }| {
            let reason = error.errors.into_iter().next().map(|d| d.reason);
            (error.message, reason)
        })
        .unwrap_or_default();
    match reason.as_deref() {
        Some("notFound") => PositionError::PositionUnavailable,
        Some("keyInvalid" | "dailyLimitExceeded" | "userRateLimitExceeded") => {
            PositionError::PermissionDenied
        }
        _ => match status {
            StatusCode::NOT_FOUND => PositionError::PositionUnavailable,
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => PositionError::PermissionDenied,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => PositionError::Timeout,
            _ => PositionError::Other(format!("{status}: {message}")),
        },
    }
}

impl GeolocationGateway for GoogleMaps {
    async fn current_position(&self) -> Result<MapPoint, PositionError> {
        let url = format!("{}/geolocate", self.geolocation_api_url);
        let response = self
            .client
            .post(url)
            .query(&[("key", &self.api_key)])
            .json(&GeolocateRequest { consider_ip: true })
            .send()
            .await
            .map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorResponse>().await.ok();
            return Err(position_error(status, body));
        }
        let GeolocateResponse { location, accuracy } =
            response.json().await.map_err(request_error)?;
        log::debug!("Located with an accuracy of {accuracy} m");
        location
            .to_map_point()
            .ok_or(PositionError::PositionUnavailable)
    }
}
