use crate::config;
use placemarks_core::{
    entities::{Id, MapPoint},
    gateways::{
        geocode::{
            self, GeocodeResult, PlaceDetails, PlaceDetailsGateway, PlaceField,
            ReverseGeocodingGateway,
        },
        geolocation::{GeolocationGateway, PositionError},
    },
};
use placemarks_gateways::{fixed::FixedPosition, google::GoogleMaps, unconfigured::Unconfigured};
use std::time::Duration;

pub fn geocoding_gateway(cfg: &config::Geocoding) -> GeocodingGw {
    match &cfg.gateway {
        Some(config::GeocodingGateway::Google(google)) => {
            log::info!("Use Google Maps geocoding gateway");
            GeocodingGw::Google(google_maps(google.clone()))
        }
        None => {
            log::warn!(
                "No geocoding gateway was configured: clicks on the map cannot be resolved"
            );
            GeocodingGw::Unconfigured(Unconfigured)
        }
    }
}

pub fn geolocation_gateway(cfg: &config::Geolocation) -> anyhow::Result<GeolocationGw> {
    let gw = match &cfg.gateway {
        Some(config::GeolocationGateway::Google(google)) => {
            log::info!("Use Google Maps geolocation gateway");
            GeolocationGw::Google(google_maps_with_timeout(google.clone(), cfg.timeout)?)
        }
        Some(config::GeolocationGateway::Fixed(pos)) => {
            log::info!("Use fixed position {pos} as current location");
            GeolocationGw::Fixed(FixedPosition(*pos))
        }
        None => {
            log::warn!(
                "No geolocation gateway was configured: the map starts at its fallback center"
            );
            GeolocationGw::Unconfigured(Unconfigured)
        }
    };
    Ok(gw)
}

fn google_maps(cfg: config::GoogleMaps) -> GoogleMaps {
    let config::GoogleMaps { api_key, .. } = &cfg;
    let gw = GoogleMaps::new(api_key.clone());
    configure_google_maps(gw, cfg)
}

fn google_maps_with_timeout(
    cfg: config::GoogleMaps,
    timeout: Duration,
) -> anyhow::Result<GoogleMaps> {
    let gw = GoogleMaps::with_timeout(cfg.api_key.clone(), timeout)?;
    Ok(configure_google_maps(gw, cfg))
}

fn configure_google_maps(mut gw: GoogleMaps, cfg: config::GoogleMaps) -> GoogleMaps {
    let config::GoogleMaps {
        api_key: _,
        language,
        maps_api_url,
        geolocation_api_url,
    } = cfg;
    gw = gw.language(language);
    if let Some(url) = maps_api_url {
        gw = gw.maps_api_url(url);
    }
    if let Some(url) = geolocation_api_url {
        gw = gw.geolocation_api_url(url);
    }
    gw
}

#[derive(Debug)]
pub enum GeocodingGw {
    Google(GoogleMaps),
    Unconfigured(Unconfigured),
}

impl ReverseGeocodingGateway for GeocodingGw {
    async fn reverse_geocode(&self, pos: MapPoint) -> geocode::Result<Vec<GeocodeResult>> {
        match self {
            Self::Google(gw) => gw.reverse_geocode(pos).await,
            Self::Unconfigured(gw) => gw.reverse_geocode(pos).await,
        }
    }
}

impl PlaceDetailsGateway for GeocodingGw {
    async fn place_details(
        &self,
        id: &Id,
        fields: &[PlaceField],
    ) -> geocode::Result<Option<PlaceDetails>> {
        match self {
            Self::Google(gw) => gw.place_details(id, fields).await,
            Self::Unconfigured(gw) => gw.place_details(id, fields).await,
        }
    }
}

#[derive(Debug)]
pub enum GeolocationGw {
    Google(GoogleMaps),
    Fixed(FixedPosition),
    Unconfigured(Unconfigured),
}

impl GeolocationGateway for GeolocationGw {
    async fn current_position(&self) -> Result<MapPoint, PositionError> {
        match self {
            Self::Google(gw) => gw.current_position().await,
            Self::Fixed(gw) => gw.current_position().await,
            Self::Unconfigured(gw) => gw.current_position().await,
        }
    }
}
