//! Terminal rendition of the map surface and the sidebar list.

use placemarks_core::{
    cluster::{Cluster, GridClusterer, PlaceMarker},
    entities::*,
    gateways::map::{InfoWindow, MapSurface},
    geolocation::MapView,
    markers::{self, SharedMarkerRegistry},
    render_guard::MarkerRenderGuard,
    sidebar::{marker_emphasis, visible_sidebar_rows, Emphasis, SidebarRow, VirtualList},
    store::{Change, PlaceStore},
};
use std::{cell::Cell, rc::Rc};

pub type Markers = SharedMarkerRegistry<GridClusterer>;

#[derive(Debug)]
pub struct TerminalMap {
    center: Cell<MapPoint>,
    zoom: Cell<u8>,
}

impl TerminalMap {
    pub fn new(view: &MapView) -> Self {
        Self {
            center: Cell::new(view.fallback_center),
            zoom: Cell::new(view.default_zoom),
        }
    }

    pub fn center(&self) -> MapPoint {
        self.center.get()
    }

    pub fn zoom(&self) -> u8 {
        self.zoom.get()
    }
}

impl MapSurface for TerminalMap {
    fn pan_to(&self, pos: MapPoint) {
        log::debug!("Pan map to {pos}");
        self.center.set(pos);
    }

    fn set_zoom(&self, zoom: u8) {
        log::debug!("Set zoom level to {zoom}");
        self.zoom.set(zoom);
    }

    fn open_info_window(&self, info_window: InfoWindow) {
        println!("{}", render_info_window(&info_window));
    }
}

pub fn render_info_window(info_window: &InfoWindow) -> String {
    let InfoWindow {
        position,
        header,
        content,
    } = info_window;
    format!("[{header}] @ {position}\n  {content}")
}

/// Mounts a marker for every added place that has coordinates
/// and unmounts it again when the place is removed.
pub fn mount_markers(store: &mut PlaceStore, registry: &Markers) {
    markers::connect_to_store(store, registry);
    let registry = Rc::downgrade(registry);
    let mut guard = MarkerRenderGuard::new();
    store.subscribe(move |change, _| {
        let Some(registry) = registry.upgrade() else {
            return;
        };
        match change {
            Change::Added(place) => {
                let Some(pos) = place.pos else {
                    log::debug!("Place {} has no coordinates: no marker", place.id);
                    return;
                };
                if !guard.should_render(&place.id, pos) {
                    return;
                }
                let marker = PlaceMarker {
                    id: place.id.clone(),
                    pos,
                    label: place.title().to_string(),
                };
                registry
                    .borrow_mut()
                    .register_marker(place.id.clone(), marker);
            }
            Change::Removed(place) => {
                guard.forget(place.id.as_str());
            }
            Change::ActiveChanged(_) | Change::HoveredChanged(_) => {}
        }
    });
}

fn cluster_emphasis(cluster: &Cluster, hovered: Option<&Id>) -> Emphasis {
    let mut emphasis = cluster.ids.iter().map(|id| marker_emphasis(id, hovered));
    if emphasis.any(|e| e == Emphasis::Highlighted) {
        Emphasis::Highlighted
    } else {
        marker_emphasis(&cluster.ids[0], hovered)
    }
}

pub fn render_clusters(clusterer: &GridClusterer, zoom: u8, hovered: Option<&Id>) -> String {
    let clusters = clusterer.clusters(zoom);
    if clusters.is_empty() {
        return "No markers".to_string();
    }
    clusters
        .iter()
        .filter(|cluster| !cluster.is_empty())
        .map(|cluster| {
            let symbol = match cluster_emphasis(cluster, hovered) {
                Emphasis::Normal => 'o',
                Emphasis::Highlighted => '*',
                Emphasis::Dimmed => '.',
            };
            match cluster.ids.as_slice() {
                [id] => {
                    let label = clusterer
                        .markers()
                        .iter()
                        .find(|m| &m.id == id)
                        .map_or(id.as_str(), |m| m.label.as_str());
                    format!("{symbol} {label} ({})", cluster.center)
                }
                ids => format!("{symbol} {} places around ({})", ids.len(), cluster.center),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Virtualized list of the places.
///
/// Every store mutation marks the list as dirty.
#[derive(Debug)]
pub struct SidebarView {
    list: VirtualList,
    dirty: Rc<Cell<bool>>,
}

impl SidebarView {
    pub fn new(visible_rows: usize, store: &mut PlaceStore) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let on_change = Rc::clone(&dirty);
        store.subscribe(move |_, _| on_change.set(true));
        Self {
            list: VirtualList::new(visible_rows),
            dirty,
        }
    }

    pub fn scroll_by(&mut self, delta: isize, store: &PlaceStore) {
        self.list.scroll_by(delta, store.len());
        self.dirty.set(true);
    }

    /// Scrolls the row of the place into view.
    pub fn reveal(&mut self, id: &Id, store: &PlaceStore) {
        if let Some(index) = store.places().iter().position(|p| &p.id == id) {
            self.list.scroll_to(index, store.len());
        }
    }

    /// Id of the place in the (1-based) row.
    pub fn row_id(&self, row: usize, store: &PlaceStore) -> Option<Id> {
        row.checked_sub(1)
            .and_then(|index| store.places().get(index))
            .map(|p| p.id.clone())
    }

    /// Returns `true` once after every change.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn render(&self, store: &PlaceStore) -> String {
        if store.is_empty() {
            return "No places yet. Click on the map to add one.".to_string();
        }
        let range = self.list.visible_range(store.len());
        let mut lines = vec![format!(
            "Places {}-{} of {}",
            range.start + 1,
            range.end,
            store.len()
        )];
        let rows = visible_sidebar_rows(store, &self.list);
        lines.extend(
            range
                .zip(rows)
                .map(|(index, row)| render_row(index + 1, &row)),
        );
        lines.join("\n")
    }
}

fn render_row(number: usize, row: &SidebarRow) -> String {
    let SidebarRow {
        title,
        address,
        coordinates,
        highlighted,
        ..
    } = row;
    let marker = if *highlighted { '>' } else { ' ' };
    let mut line = format!("{marker}{number:>3}. {title}");
    if let Some(address) = address.as_ref().filter(|a| *a != title) {
        line.push_str(&format!(" | {address}"));
    }
    if let Some(coordinates) = coordinates {
        line.push_str(&format!(" | {coordinates}"));
    }
    line
}
