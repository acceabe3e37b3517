use crate::entities::MapPoint;

/// Information popup anchored at a position.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoWindow {
    pub position: MapPoint,
    pub header: String,
    pub content: String,
}

/// The rendering surface of the map.
pub trait MapSurface {
    fn pan_to(&self, pos: MapPoint);
    fn set_zoom(&self, zoom: u8);
    fn open_info_window(&self, info_window: InfoWindow);
}

/// Groups nearby markers into clusters.
pub trait MarkerClusterer {
    type Marker: Clone;

    fn clear_markers(&mut self);
    fn add_markers(&mut self, markers: &[Self::Marker]);
}
