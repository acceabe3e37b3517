use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    entities::*,
    gateways::map::MarkerClusterer,
    store::{Change, PlaceStore, SubscriptionId},
};

pub type SharedMarkerRegistry<C> = Rc<RefCell<MarkerRegistry<C>>>;

/// Maps place ids to their on-map markers and feeds
/// the clustering layer.
///
/// Every change clears the clusterer and adds all current
/// markers again instead of patching it incrementally,
/// so the clusterer never holds a stale marker.
pub struct MarkerRegistry<C: MarkerClusterer> {
    markers: Vec<(Id, C::Marker)>,
    clusterer: C,
    rebuild_count: usize,
}

impl<C> fmt::Debug for MarkerRegistry<C>
where
    C: MarkerClusterer + fmt::Debug,
    C::Marker: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerRegistry")
            .field("markers", &self.markers)
            .field("clusterer", &self.clusterer)
            .field("rebuild_count", &self.rebuild_count)
            .finish()
    }
}

impl<C: MarkerClusterer> MarkerRegistry<C> {
    pub fn new(clusterer: C) -> Self {
        Self {
            markers: vec![],
            clusterer,
            rebuild_count: 0,
        }
    }

    pub fn new_shared(clusterer: C) -> SharedMarkerRegistry<C> {
        Rc::new(RefCell::new(Self::new(clusterer)))
    }

    /// Registers a mounted marker. A marker that is mounted
    /// again replaces the previous handle.
    pub fn register_marker(&mut self, id: Id, marker: C::Marker) {
        match self.markers.iter_mut().find(|(i, _)| *i == id) {
            Some((_, m)) => {
                *m = marker;
            }
            None => {
                self.markers.push((id, marker));
            }
        }
        self.rebuild();
    }

    pub fn unregister_marker(&mut self, id: &str) -> Option<C::Marker> {
        let index = self.markers.iter().position(|(i, _)| i.as_str() == id)?;
        let (_, marker) = self.markers.remove(index);
        self.rebuild();
        Some(marker)
    }

    pub fn marker(&self, id: &str) -> Option<&C::Marker> {
        self.markers
            .iter()
            .find(|(i, _)| i.as_str() == id)
            .map(|(_, m)| m)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.marker(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub const fn clusterer(&self) -> &C {
        &self.clusterer
    }

    pub const fn rebuild_count(&self) -> usize {
        self.rebuild_count
    }

    fn rebuild(&mut self) {
        let markers: Vec<_> = self.markers.iter().map(|(_, m)| m.clone()).collect();
        self.clusterer.clear_markers();
        self.clusterer.add_markers(&markers);
        self.rebuild_count += 1;
        log::debug!("Rebuilt marker clusters from {} markers", markers.len());
    }
}

/// Drops the marker of every place that is removed from the store.
pub fn connect_to_store<C>(
    store: &mut PlaceStore,
    registry: &SharedMarkerRegistry<C>,
) -> SubscriptionId
where
    C: MarkerClusterer + 'static,
    C::Marker: 'static,
{
    let registry = Rc::downgrade(registry);
    store.subscribe(move |change, _| {
        let Change::Removed(place) = change else {
            return;
        };
        let Some(registry) = registry.upgrade() else {
            return;
        };
        if registry
            .borrow_mut()
            .unregister_marker(place.id.as_str())
            .is_some()
        {
            log::debug!("Unregistered marker of removed place {}", place.id);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use placemarks_entities::builders::*;

    #[derive(Debug, Default)]
    struct RecordingClusterer {
        markers: Vec<&'static str>,
        ops: Vec<&'static str>,
    }

    impl MarkerClusterer for RecordingClusterer {
        type Marker = &'static str;

        fn clear_markers(&mut self) {
            self.markers.clear();
            self.ops.push("clear");
        }

        fn add_markers(&mut self, markers: &[Self::Marker]) {
            self.markers.extend_from_slice(markers);
            self.ops.push("add");
        }
    }

    #[test]
    fn rebuild_clusters_on_every_change() {
        let mut registry = MarkerRegistry::new(RecordingClusterer::default());
        registry.register_marker("a".into(), "marker-a");
        registry.register_marker("b".into(), "marker-b");
        assert_eq!(vec!["marker-a", "marker-b"], registry.clusterer().markers);

        registry.register_marker("a".into(), "marker-a2");
        assert_eq!(vec!["marker-a2", "marker-b"], registry.clusterer().markers);
        assert_eq!(2, registry.len());

        assert_eq!(Some("marker-a2"), registry.unregister_marker("a"));
        assert_eq!(vec!["marker-b"], registry.clusterer().markers);
        assert_eq!(4, registry.rebuild_count());
        assert_eq!(
            vec!["clear", "add", "clear", "add", "clear", "add", "clear", "add"],
            registry.clusterer().ops
        );
    }

    #[test]
    fn unregister_unknown_marker_does_not_rebuild() {
        let mut registry = MarkerRegistry::new(RecordingClusterer::default());
        registry.register_marker("a".into(), "marker-a");
        assert!(registry.unregister_marker("x").is_none());
        assert_eq!(1, registry.rebuild_count());
    }

    #[test]
    fn removing_a_place_removes_its_marker() {
        let mut store = PlaceStore::new();
        let registry = MarkerRegistry::new_shared(RecordingClusterer::default());
        connect_to_store(&mut store, &registry);

        store.add_place(Place::build().id("a").finish());
        store.add_place(Place::build().id("b").finish());
        registry.borrow_mut().register_marker("a".into(), "marker-a");
        registry.borrow_mut().register_marker("b".into(), "marker-b");

        store.remove_place("a");
        assert!(store.get("a").is_none());
        assert!(!registry.borrow().contains("a"));
        assert_eq!(vec!["marker-b"], registry.borrow().clusterer().markers);
    }

    #[test]
    fn removing_a_place_without_marker() {
        let mut store = PlaceStore::new();
        let registry = MarkerRegistry::new_shared(RecordingClusterer::default());
        connect_to_store(&mut store, &registry);
        store.add_place(Place::build().id("a").finish());
        store.remove_place("a");
        assert_eq!(0, registry.borrow().rebuild_count());
    }
}
