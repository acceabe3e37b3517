use duration_str::deserialize_option_duration;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = include_str!("placemarks.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub map: Option<Map>,
    pub geocoding: Option<Geocoding>,
    pub geolocation: Option<Geolocation>,
    pub gateway: Option<Gateway>,
    pub clicks: Option<Clicks>,
    pub sidebar: Option<Sidebar>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg: Self = toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration");
        cfg
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Map {
    pub default_zoom: u8,
    pub located_zoom: u8,
    pub fallback_center: Position,
}

impl Default for Map {
    fn default() -> Self {
        Config::default().map.expect("Map configuration")
    }
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Geocoding {
    pub gateway: Option<GeocodingGateway>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeocodingGateway {
    Google,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Geolocation {
    pub gateway: Option<GeolocationGateway>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

impl Default for Geolocation {
    fn default() -> Self {
        Config::default()
            .geolocation
            .expect("Geolocation configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeolocationGateway {
    Google,
    Fixed,
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Gateway {
    pub google: Option<Google>,
    pub fixed: Option<Position>,
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Google {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub maps_api_url: Option<String>,
    pub geolocation_api_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Clicks {
    pub stale_responses: StaleResponses,
}

impl Default for Clicks {
    fn default() -> Self {
        Config::default().clicks.expect("Clicks configuration")
    }
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaleResponses {
    Keep,
    Discard,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Sidebar {
    pub visible_rows: usize,
}

impl Default for Sidebar {
    fn default() -> Self {
        Config::default().sidebar.expect("Sidebar configuration")
    }
}
