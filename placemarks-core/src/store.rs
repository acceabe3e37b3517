use std::{cell::RefCell, fmt, rc::Rc};

use crate::entities::*;

/// The store handle that is injected into all consumers.
pub type SharedPlaceStore = Rc<RefCell<PlaceStore>>;

/// A mutation that has been applied to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Added(Place),
    Removed(Place),
    ActiveChanged(Option<Id>),
    HoveredChanged(Option<Id>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

type Callback = Box<dyn FnMut(&Change, &[Place])>;

/// Ordered collection of places plus the transient selection state.
///
/// The insertion order is the display order.
/// No two places share the same id.
#[derive(Default)]
pub struct PlaceStore {
    places: Vec<Place>,
    active: Option<Id>,
    hovered: Option<Id>,
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_subscription_id: usize,
}

impl fmt::Debug for PlaceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaceStore")
            .field("places", &self.places)
            .field("active", &self.active)
            .field("hovered", &self.hovered)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl PlaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> SharedPlaceStore {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|p| p.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Appends the place unless another one with the same id exists.
    ///
    /// Existing entries are never overwritten (first write wins).
    pub fn add_place(&mut self, place: Place) -> bool {
        if self.contains(place.id.as_str()) {
            log::debug!("Place {} already exists", place.id);
            return false;
        }
        log::debug!("Add place {}", place.id);
        self.places.push(place.clone());
        self.notify(&Change::Added(place));
        true
    }

    pub fn remove_place(&mut self, id: &str) -> Option<Place> {
        let index = self.places.iter().position(|p| p.id.as_str() == id)?;
        let place = self.places.remove(index);
        log::debug!("Removed place {}", place.id);
        self.notify(&Change::Removed(place.clone()));
        if self.active.as_ref().is_some_and(|a| a.as_str() == id) {
            self.set_active_place(None);
        }
        if self.hovered.as_ref().is_some_and(|h| h.as_str() == id) {
            self.set_hovered_place(None);
        }
        Some(place)
    }

    pub fn active_place(&self) -> Option<&Id> {
        self.active.as_ref()
    }

    pub fn hovered_place(&self) -> Option<&Id> {
        self.hovered.as_ref()
    }

    /// Returns `false` if nothing changed.
    pub fn set_active_place(&mut self, id: Option<Id>) -> bool {
        if self.active == id {
            return false;
        }
        self.active = id.clone();
        self.notify(&Change::ActiveChanged(id));
        true
    }

    /// Returns `false` if nothing changed.
    pub fn set_hovered_place(&mut self, id: Option<Id>) -> bool {
        if self.hovered == id {
            return false;
        }
        self.hovered = id.clone();
        self.notify(&Change::HoveredChanged(id));
        true
    }

    /// Registers an observer that is invoked after every mutation.
    ///
    /// The callback runs while the store is borrowed and must not
    /// access the store itself.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change, &[Place]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let count = self.subscribers.len();
        self.subscribers.retain(|(s, _)| *s != id);
        self.subscribers.len() < count
    }

    fn notify(&mut self, change: &Change) {
        let Self {
            places,
            subscribers,
            ..
        } = self;
        for (_, callback) in subscribers.iter_mut() {
            callback(change, places);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placemarks_entities::builders::*;

    fn new_place(id: &str) -> Place {
        Place::build()
            .id(id)
            .address("Dam, Amsterdam")
            .pos(MapPoint::from_lat_lng_deg(52.37, 4.895))
            .finish()
    }

    fn ids(store: &PlaceStore) -> Vec<&str> {
        store.places().iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn add_place_with_same_id_only_once() {
        let mut store = PlaceStore::new();
        assert!(store.add_place(new_place("a")));
        let mut other = new_place("a");
        other.name = Some("Other".into());
        assert!(!store.add_place(other));
        assert_eq!(1, store.len());
        assert!(store.get("a").unwrap().name.is_none());
    }

    #[test]
    fn keep_insertion_order() {
        let mut store = PlaceStore::new();
        for id in ["c", "a", "b", "a"] {
            store.add_place(new_place(id));
        }
        assert_eq!(vec!["c", "a", "b"], ids(&store));
    }

    #[test]
    fn remove_place() {
        let mut store = PlaceStore::new();
        store.add_place(new_place("a"));
        store.add_place(new_place("b"));
        let removed = store.remove_place("a").unwrap();
        assert_eq!("a", removed.id.as_str());
        assert!(store.get("a").is_none());
        assert_eq!(vec!["b"], ids(&store));
        assert!(store.remove_place("a").is_none());
    }

    #[test]
    fn removing_the_selected_place_clears_the_selection() {
        let mut store = PlaceStore::new();
        store.add_place(new_place("a"));
        store.add_place(new_place("b"));
        store.set_active_place(Some("a".into()));
        store.set_hovered_place(Some("b".into()));
        store.remove_place("a");
        assert!(store.active_place().is_none());
        assert_eq!(Some(&Id::from("b")), store.hovered_place());
        store.remove_place("b");
        assert!(store.hovered_place().is_none());
    }

    #[test]
    fn selection_does_not_touch_places() {
        let mut store = PlaceStore::new();
        store.add_place(new_place("a"));
        assert!(store.set_hovered_place(Some("a".into())));
        assert!(!store.set_hovered_place(Some("a".into())));
        assert!(store.set_active_place(Some("x".into())));
        assert_eq!(vec!["a"], ids(&store));
    }

    #[test]
    fn notify_subscribers_after_mutation() {
        let changes = Rc::new(RefCell::new(vec![]));
        let mut store = PlaceStore::new();
        let recorded = Rc::clone(&changes);
        let subscription = store.subscribe(move |change, places| {
            recorded.borrow_mut().push((change.clone(), places.len()));
        });
        store.add_place(new_place("a"));
        store.add_place(new_place("a"));
        store.set_hovered_place(Some("a".into()));
        store.remove_place("a");
        assert!(store.unsubscribe(subscription));
        store.add_place(new_place("b"));

        let changes = changes.borrow();
        assert_eq!(
            vec![
                (Change::Added(new_place("a")), 1),
                (Change::HoveredChanged(Some("a".into())), 1),
                (Change::Removed(new_place("a")), 0),
                (Change::HoveredChanged(None), 0),
            ],
            *changes
        );
    }
}
