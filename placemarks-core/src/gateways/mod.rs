pub mod geocode;
pub mod geolocation;
pub mod map;
