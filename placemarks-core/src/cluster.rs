use crate::{entities::*, gateways::map::MarkerClusterer};

const MAX_ZOOM: u8 = 22;

/// Marker handle understood by the [`GridClusterer`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceMarker {
    pub id: Id,
    pub pos: MapPoint,
    pub label: String,
}

/// A group of nearby markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub center: MapPoint,
    pub ids: Vec<Id>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Groups markers into square grid cells.
///
/// The cell edge is `360° / 2^zoom`, i.e. it halves with every zoom level.
#[derive(Debug, Default)]
pub struct GridClusterer {
    markers: Vec<PlaceMarker>,
}

impl GridClusterer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[PlaceMarker] {
        &self.markers
    }

    /// Clusters in the order of their first member.
    pub fn clusters(&self, zoom: u8) -> Vec<Cluster> {
        let cell_deg = 360.0 / 2f64.powi(i32::from(zoom.min(MAX_ZOOM)));
        let mut cells: Vec<((i64, i64), Vec<&PlaceMarker>)> = vec![];
        for marker in &self.markers {
            let key = cell_of(marker.pos, cell_deg);
            match cells.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(marker),
                None => cells.push((key, vec![marker])),
            }
        }
        cells
            .into_iter()
            .map(|(_, members)| {
                #[allow(clippy::cast_precision_loss)]
                let count = members.len() as f64;
                let (lat_sum, lng_sum) = members
                    .iter()
                    .fold((0.0, 0.0), |(lat, lng), m| (lat + m.pos.lat, lng + m.pos.lng));
                Cluster {
                    center: MapPoint::from_lat_lng_deg(lat_sum / count, lng_sum / count),
                    ids: members.into_iter().map(|m| m.id.clone()).collect(),
                }
            })
            .collect()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn cell_of(pos: MapPoint, cell_deg: f64) -> (i64, i64) {
    let row = ((pos.lat + 90.0) / cell_deg).floor() as i64;
    let col = ((pos.lng + 180.0) / cell_deg).floor() as i64;
    (row, col)
}

impl MarkerClusterer for GridClusterer {
    type Marker = PlaceMarker;

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn add_markers(&mut self, markers: &[PlaceMarker]) {
        self.markers.extend_from_slice(markers);
    }
}
