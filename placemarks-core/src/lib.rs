//! # placemarks-core
//!
//! Keeps the map markers, the clustering layer and the sidebar list
//! consistent with a single collection of places while asynchronous
//! lookups race against user interaction.
//!
//! Everything in here runs on a single thread: shared state is
//! handed around as `Rc<RefCell<_>>` and futures are not `Send`.

pub mod cluster;
pub mod coordinator;
pub mod gateways;
pub mod geolocation;
pub mod markers;
pub mod render_guard;
pub mod sidebar;
pub mod store;

pub mod entities {
    pub use placemarks_entities::{geo::*, id::*, place::*};
}
