use std::{fmt, str::FromStr};

use thiserror::Error;

const LAT_DEG_MAX: f64 = 90.0;
const LAT_DEG_MIN: f64 = -90.0;
const LNG_DEG_MAX: f64 = 180.0;
const LNG_DEG_MIN: f64 = -180.0;

/// A geographical position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapPointParseError {
    #[error("Invalid latitude '{0}'")]
    Lat(String),
    #[error("Invalid longitude '{0}'")]
    Lng(String),
    #[error("Failed to parse map point: {0}")]
    Format(String),
}

impl MapPoint {
    /// Unchecked constructor, e.g. for constants.
    pub const fn from_lat_lng_deg(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn try_from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(
        lat: LAT,
        lng: LNG,
    ) -> Option<Self> {
        let pos = Self::from_lat_lng_deg(lat.into(), lng.into());
        pos.is_valid().then_some(pos)
    }

    pub fn is_valid(self) -> bool {
        let Self { lat, lng } = self;
        lat.is_finite()
            && lng.is_finite()
            && (LAT_DEG_MIN..=LAT_DEG_MAX).contains(&lat)
            && (LNG_DEG_MIN..=LNG_DEG_MAX).contains(&lng)
    }

    fn parse_lat_lng_deg(lat_deg_str: &str, lng_deg_str: &str) -> Result<Self, MapPointParseError> {
        let lat = lat_deg_str
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|lat| (LAT_DEG_MIN..=LAT_DEG_MAX).contains(lat))
            .ok_or_else(|| MapPointParseError::Lat(lat_deg_str.to_string()))?;
        let lng = lng_deg_str
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|lng| (LNG_DEG_MIN..=LNG_DEG_MAX).contains(lng))
            .ok_or_else(|| MapPointParseError::Lng(lng_deg_str.to_string()))?;
        Ok(Self { lat, lng })
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

impl FromStr for MapPoint {
    type Err = MapPointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(',') {
            Some((lat_deg_str, lng_deg_str)) => Self::parse_lat_lng_deg(lat_deg_str, lng_deg_str),
            None => Err(MapPointParseError::Format(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_ranges() {
        assert!(MapPoint::try_from_lat_lng_deg(52.370, 4.895).is_some());
        assert!(MapPoint::try_from_lat_lng_deg(90.0, 180.0).is_some());
        assert!(MapPoint::try_from_lat_lng_deg(-90.0, -180.0).is_some());
        assert!(MapPoint::try_from_lat_lng_deg(90.1, 0.0).is_none());
        assert!(MapPoint::try_from_lat_lng_deg(0.0, -180.5).is_none());
        assert!(MapPoint::try_from_lat_lng_deg(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn display_raw_coordinate_pair() {
        let pos = MapPoint::from_lat_lng_deg(52.37, 4.895);
        assert_eq!("52.37, 4.895", pos.to_string());
    }

    #[test]
    fn parse_from_str() {
        let pos: MapPoint = "52.37, 4.895".parse().unwrap();
        assert_eq!(MapPoint::from_lat_lng_deg(52.37, 4.895), pos);
        assert_eq!(
            Err(MapPointParseError::Lat("91".into())),
            "91,0".parse::<MapPoint>()
        );
        assert_eq!(
            Err(MapPointParseError::Lng(" x".into())),
            "1, x".parse::<MapPoint>()
        );
        assert!(matches!(
            "52.37".parse::<MapPoint>(),
            Err(MapPointParseError::Format(_))
        ));
    }
}
