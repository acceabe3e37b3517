use thiserror::Error;

use crate::entities::*;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The request was denied: {0}")]
    RequestDenied(String),
    #[error("The query limit is exceeded")]
    OverQueryLimit,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("No gateway configured")]
    NotConfigured,
    #[error("Unexpected service status '{0}'")]
    Status(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub place_id: Option<Id>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceField {
    Name,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetails {
    pub name: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait ReverseGeocodingGateway {
    /// Resolve a position into addresses, best match first.
    async fn reverse_geocode(&self, pos: MapPoint) -> Result<Vec<GeocodeResult>>;
}

#[allow(async_fn_in_trait)]
pub trait PlaceDetailsGateway {
    /// Returns `None` if the catalog doesn't know the place.
    async fn place_details(
        &self,
        place_id: &Id,
        fields: &[PlaceField],
    ) -> Result<Option<PlaceDetails>>;
}
