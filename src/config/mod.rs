use anyhow::{anyhow, Result};
use placemarks_core::{coordinator::StaleResponses, entities::MapPoint, geolocation::MapView};
use std::{env, fs, io::ErrorKind, path::Path, time::Duration};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "placemarks.toml";

const ENV_NAME_GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";

pub const MAX_ZOOM: u8 = 22;

const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Config {
    pub map: MapView,
    pub geocoding: Geocoding,
    pub geolocation: Geolocation,
    pub stale_responses: StaleResponses,
    pub sidebar: Sidebar,
}

impl Config {
    /// Loads the configuration file (or the default configuration).
    ///
    /// The Google Maps API key is taken from `api_key`, then from the
    /// environment and finally from the file.
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(
        file_path: Option<P>,
        api_key: Option<String>,
    ) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let mut raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        if let Some(api_key) = api_key.or_else(|| env::var(ENV_NAME_GOOGLE_MAPS_API_KEY).ok()) {
            let gateway = raw_config.gateway.get_or_insert_with(Default::default);
            gateway.google.get_or_insert_with(Default::default).api_key = Some(api_key);
        }
        Self::try_from(raw_config)
    }
}

pub struct Geocoding {
    pub gateway: Option<GeocodingGateway>,
}

pub enum GeocodingGateway {
    Google(GoogleMaps),
}

pub struct Geolocation {
    pub gateway: Option<GeolocationGateway>,
    pub timeout: Duration,
}

pub enum GeolocationGateway {
    Google(GoogleMaps),
    Fixed(MapPoint),
}

#[derive(Clone)]
pub struct GoogleMaps {
    pub api_key: String,
    pub language: Option<String>,
    pub maps_api_url: Option<String>,
    pub geolocation_api_url: Option<String>,
}

pub struct Sidebar {
    pub visible_rows: usize,
}

fn try_map_point(raw::Position { lat, lng }: raw::Position) -> Result<MapPoint> {
    MapPoint::try_from_lat_lng_deg(lat, lng).ok_or_else(|| anyhow!("Invalid position: {lat},{lng}"))
}

fn google_maps(gateway: &raw::Gateway, name: &str) -> Option<GoogleMaps> {
    let Some(raw::Google {
        api_key: Some(api_key),
        language,
        maps_api_url,
        geolocation_api_url,
    }) = gateway.google.clone()
    else {
        log::warn!("No Google Maps API key found: '{name}' gateway is disabled");
        return None;
    };
    Some(GoogleMaps {
        api_key,
        language,
        maps_api_url,
        geolocation_api_url,
    })
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            map,
            geocoding,
            geolocation,
            gateway,
            clicks,
            sidebar,
        } = from;

        let gateway = gateway.unwrap_or_default();

        let raw::Map {
            default_zoom,
            located_zoom,
            fallback_center,
        } = map.unwrap_or_default();
        if default_zoom > MAX_ZOOM || located_zoom > MAX_ZOOM {
            return Err(anyhow!("Zoom levels must not exceed {MAX_ZOOM}"));
        }
        let map = MapView {
            fallback_center: try_map_point(fallback_center)?,
            default_zoom,
            located_zoom,
        };

        let geocoding_gateway = match geocoding.and_then(|g| g.gateway) {
            Some(raw::GeocodingGateway::Google) => {
                google_maps(&gateway, "google").map(GeocodingGateway::Google)
            }
            None => None,
        };
        let geocoding = Geocoding {
            gateway: geocoding_gateway,
        };

        let raw::Geolocation {
            gateway: geolocation_gateway,
            timeout,
        } = geolocation.unwrap_or_default();
        let geolocation_gateway = match geolocation_gateway {
            Some(raw::GeolocationGateway::Google) => {
                google_maps(&gateway, "google").map(GeolocationGateway::Google)
            }
            Some(raw::GeolocationGateway::Fixed) => {
                let pos = gateway
                    .fixed
                    .ok_or_else(|| anyhow!("Missing 'fixed' gateway configuration"))?;
                Some(GeolocationGateway::Fixed(try_map_point(pos)?))
            }
            None => None,
        };
        let geolocation = Geolocation {
            gateway: geolocation_gateway,
            timeout: timeout.unwrap_or(DEFAULT_GEOLOCATION_TIMEOUT),
        };

        let raw::Clicks { stale_responses } = clicks.unwrap_or_default();
        let stale_responses = match stale_responses {
            raw::StaleResponses::Keep => StaleResponses::Keep,
            raw::StaleResponses::Discard => StaleResponses::Discard,
        };

        let raw::Sidebar { visible_rows } = sidebar.unwrap_or_default();
        if visible_rows == 0 {
            return Err(anyhow!("The sidebar needs at least one visible row"));
        }
        let sidebar = Sidebar { visible_rows };

        Ok(Self {
            map,
            geocoding,
            geolocation,
            stale_responses,
            sidebar,
        })
    }
}
