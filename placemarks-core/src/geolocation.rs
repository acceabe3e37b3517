use crate::{
    entities::*,
    gateways::{
        geolocation::{GeolocationGateway, PositionError},
        map::MapSurface,
    },
};

pub const AMSTERDAM_CITY_CENTER: MapPoint = MapPoint::from_lat_lng_deg(52.3676, 4.9041);
pub const DEFAULT_ZOOM: u8 = 5;
pub const LOCATED_ZOOM: u8 = 20;

/// Initial viewport of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    /// Center if the user could not be located.
    pub fallback_center: MapPoint,
    pub default_zoom: u8,
    pub located_zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            fallback_center: AMSTERDAM_CITY_CENTER,
            default_zoom: DEFAULT_ZOOM,
            located_zoom: LOCATED_ZOOM,
        }
    }
}

/// Requests the current position once. There are no retries.
pub async fn locate<G>(gateway: &G) -> Result<MapPoint, PositionError>
where
    G: GeolocationGateway,
{
    let result = gateway.current_position().await.and_then(|pos| {
        if pos.is_valid() {
            Ok(pos)
        } else {
            Err(PositionError::PositionUnavailable)
        }
    });
    if let Err(err) = &result {
        log::error!("An error occurred while trying to request the user's current position: {err}");
    }
    result
}

pub async fn request_current_position<G, S, E>(gateway: &G, on_success: S, on_error: E)
where
    G: GeolocationGateway,
    S: FnOnce(MapPoint),
    E: FnOnce(PositionError),
{
    match locate(gateway).await {
        Ok(pos) => on_success(pos),
        Err(err) => on_error(err),
    }
}

/// Moves the map to the user's position or to the fallback center
/// and returns the new center.
pub async fn center_on_user<G, M>(gateway: &G, map: &M, view: &MapView) -> MapPoint
where
    G: GeolocationGateway,
    M: MapSurface,
{
    match locate(gateway).await {
        Ok(pos) => {
            log::info!("Center map on current position {pos}");
            map.pan_to(pos);
            map.set_zoom(view.located_zoom);
            pos
        }
        Err(_) => {
            let MapView {
                fallback_center,
                default_zoom,
                ..
            } = *view;
            log::warn!("Center map on fallback position {fallback_center}");
            map.pan_to(fallback_center);
            map.set_zoom(default_zoom);
            fallback_center
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::map::InfoWindow;
    use futures::executor::block_on;
    use std::cell::RefCell;

    struct StaticPosition(Result<MapPoint, PositionError>);

    impl GeolocationGateway for StaticPosition {
        async fn current_position(&self) -> Result<MapPoint, PositionError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingMap {
        centers: RefCell<Vec<MapPoint>>,
        zooms: RefCell<Vec<u8>>,
    }

    impl MapSurface for RecordingMap {
        fn pan_to(&self, pos: MapPoint) {
            self.centers.borrow_mut().push(pos);
        }
        fn set_zoom(&self, zoom: u8) {
            self.zooms.borrow_mut().push(zoom);
        }
        fn open_info_window(&self, _: InfoWindow) {}
    }

    #[test]
    fn center_on_current_position() {
        let pos = MapPoint::from_lat_lng_deg(48.1, 11.6);
        let map = RecordingMap::default();
        let center = block_on(center_on_user(
            &StaticPosition(Ok(pos)),
            &map,
            &MapView::default(),
        ));
        assert_eq!(pos, center);
        assert_eq!(vec![pos], *map.centers.borrow());
        assert_eq!(vec![LOCATED_ZOOM], *map.zooms.borrow());
    }

    #[test]
    fn fall_back_to_amsterdam() {
        let map = RecordingMap::default();
        let center = block_on(center_on_user(
            &StaticPosition(Err(PositionError::PermissionDenied)),
            &map,
            &MapView::default(),
        ));
        assert_eq!(AMSTERDAM_CITY_CENTER, center);
        assert_eq!(vec![AMSTERDAM_CITY_CENTER], *map.centers.borrow());
        assert_eq!(vec![DEFAULT_ZOOM], *map.zooms.borrow());
    }

    #[test]
    fn reject_invalid_positions() {
        let gateway = StaticPosition(Ok(MapPoint::from_lat_lng_deg(100.0, 0.0)));
        assert_eq!(
            Err(PositionError::PositionUnavailable),
            block_on(locate(&gateway))
        );
    }

    #[test]
    fn invoke_exactly_one_callback() {
        let calls = RefCell::new(vec![]);
        block_on(request_current_position(
            &StaticPosition(Err(PositionError::Timeout)),
            |_| calls.borrow_mut().push("success"),
            |err| {
                let call = if err == PositionError::Timeout {
                    "timeout"
                } else {
                    "error"
                };
                calls.borrow_mut().push(call);
            },
        ));
        assert_eq!(vec!["timeout"], *calls.borrow());
    }
}
