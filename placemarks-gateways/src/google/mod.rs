//! Clients of the Google Maps web services.

use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize};

use placemarks_core::gateways::geocode;
use placemarks_entities::geo::MapPoint;

mod geocoding;
mod geolocation;
mod places;

pub const DEFAULT_MAPS_API_URL: &str = "https://maps.googleapis.com/maps/api";
pub const DEFAULT_GEOLOCATION_API_URL: &str = "https://www.googleapis.com/geolocation/v1";

#[derive(Debug, Clone)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_key: String,
    language: Option<String>,
    maps_api_url: String,
    geolocation_api_url: String,
}

impl GoogleMaps {
    pub fn new(api_key: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_key)
    }

    pub fn with_timeout(api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_key))
    }

    pub fn with_client(client: reqwest::Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            language: None,
            maps_api_url: DEFAULT_MAPS_API_URL.to_string(),
            geolocation_api_url: DEFAULT_GEOLOCATION_API_URL.to_string(),
        }
    }

    #[must_use]
    pub fn language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    #[must_use]
    pub fn maps_api_url(mut self, url: String) -> Self {
        self.maps_api_url = url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn geolocation_api_url(mut self, url: String) -> Self {
        self.geolocation_api_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T>(&self, path: &str, params: &[(&str, &str)]) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.maps_api_url);
        let mut query = params.to_vec();
        query.push(("key", self.api_key.as_str()));
        if let Some(language) = &self.language {
            query.push(("language", language.as_str()));
        }
        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Status of a Maps web service response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum Status {
    Ok,
    ZeroResults,
    NotFound,
    InvalidRequest,
    OverQueryLimit,
    OverDailyLimit,
    RequestDenied,
    UnknownError,
    #[serde(other)]
    Unexpected,
}

fn status_error(status: Status, error_message: Option<String>) -> geocode::Error {
    let message = error_message.unwrap_or_default();
    match status {
        Status::RequestDenied => geocode::Error::RequestDenied(message),
        Status::OverQueryLimit | Status::OverDailyLimit => geocode::Error::OverQueryLimit,
        Status::InvalidRequest => geocode::Error::InvalidRequest(message),
        status => geocode::Error::Status(format!("{status:?}")),
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    fn to_map_point(self) -> Option<MapPoint> {
        MapPoint::try_from_lat_lng_deg(self.lat, self.lng)
    }
}
