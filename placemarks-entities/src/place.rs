use crate::{geo::*, id::*};

/// A location the user picked on the map.
///
/// Places are immutable: they are created from a completed
/// lookup and only ever removed as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: Id,
    /// Only present for catalogued points of interest.
    pub name: Option<String>,
    pub address: Option<String>,
    pub pos: Option<MapPoint>,
}

impl Place {
    /// The label shown in lists and on markers.
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .or(self.address.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}
