use std::collections::HashMap;

use crate::entities::*;

/// Skips re-rendering a marker whose `(id, lat, lng)` triple is
/// unchanged since its last render.
#[derive(Debug, Default)]
pub struct MarkerRenderGuard {
    rendered: HashMap<Id, MapPoint>,
}

impl MarkerRenderGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the marker needs to be rendered and
    /// remembers the position.
    pub fn should_render(&mut self, id: &Id, pos: MapPoint) -> bool {
        if self.rendered.get(id) == Some(&pos) {
            return false;
        }
        self.rendered.insert(id.clone(), pos);
        true
    }

    /// Must be called when a marker unmounts.
    pub fn forget(&mut self, id: &str) -> bool {
        self.rendered.remove(id).is_some()
    }
}
