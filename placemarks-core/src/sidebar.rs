use std::ops::Range;

use crate::{entities::*, store::PlaceStore};

/// One row of the sidebar list.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarRow {
    pub id: Id,
    pub title: String,
    pub address: Option<String>,
    pub coordinates: Option<String>,
    pub highlighted: bool,
}

impl SidebarRow {
    fn new(place: &Place, highlighted: bool) -> Self {
        let Place { id, address, pos, .. } = place;
        Self {
            id: id.clone(),
            title: place.title().to_string(),
            address: address.clone(),
            coordinates: pos.map(|pos| pos.to_string()),
            highlighted,
        }
    }
}

/// Rows in display order.
pub fn sidebar_rows(store: &PlaceStore) -> Vec<SidebarRow> {
    rows_in(store, 0..store.len())
}

/// Only the rows that are visible in the viewport of `list`.
pub fn visible_sidebar_rows(store: &PlaceStore, list: &VirtualList) -> Vec<SidebarRow> {
    rows_in(store, list.visible_range(store.len()))
}

fn rows_in(store: &PlaceStore, range: Range<usize>) -> Vec<SidebarRow> {
    let is_selected = |id: &Id| {
        store.hovered_place() == Some(id) || store.active_place() == Some(id)
    };
    store.places()[range]
        .iter()
        .map(|place| SidebarRow::new(place, is_selected(&place.id)))
        .collect()
}

/// Viewport over a list that only renders the visible rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualList {
    viewport_rows: usize,
    offset: usize,
}

impl VirtualList {
    pub const fn new(viewport_rows: usize) -> Self {
        Self {
            viewport_rows,
            offset: 0,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub fn visible_range(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(self.max_offset(len));
        let end = (start + self.viewport_rows).min(len);
        start..end
    }

    pub fn scroll_by(&mut self, delta: isize, len: usize) {
        let offset = self.offset.min(self.max_offset(len));
        self.offset = offset
            .saturating_add_signed(delta)
            .min(self.max_offset(len));
    }

    /// Scrolls the minimal distance to make the row visible.
    pub fn scroll_to(&mut self, index: usize, len: usize) {
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + self.viewport_rows {
            self.offset = index + 1 - self.viewport_rows.max(1);
        }
        self.offset = self.offset.min(self.max_offset(len));
    }

    const fn max_offset(&self, len: usize) -> usize {
        len.saturating_sub(self.viewport_rows)
    }
}

/// How a marker is drawn while a place is hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    Highlighted,
    Dimmed,
}

pub fn marker_emphasis(id: &Id, hovered: Option<&Id>) -> Emphasis {
    match hovered {
        None => Emphasis::Normal,
        Some(hovered) if hovered == id => Emphasis::Highlighted,
        Some(_) => Emphasis::Dimmed,
    }
}
