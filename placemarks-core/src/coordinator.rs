use std::cell::Cell;

use crate::{
    entities::*,
    gateways::{
        geocode::{
            GeocodeResult, PlaceDetails, PlaceDetailsGateway, PlaceField, ReverseGeocodingGateway,
        },
        map::InfoWindow,
    },
    store::SharedPlaceStore,
};

/// A click on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapClick {
    pub pos: MapPoint,
    /// Set if the click hit a catalogued point of interest.
    pub poi_id: Option<Id>,
}

/// What happens with the responses of a click that has been
/// superseded by a newer one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaleResponses {
    /// Insert the place anyway (duplicates are still rejected).
    #[default]
    Keep,
    /// Ignore the responses before they reach the store.
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Added(Id),
    /// A place with the same id already exists.
    Duplicate(Id),
    /// The point of interest could not be named.
    MissingDetails(Id),
    /// Reverse geocoding failed or found nothing.
    Unresolved,
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    /// The popup to show, only for plain points.
    pub info_window: Option<InfoWindow>,
    pub resolution: Resolution,
}

impl ClickOutcome {
    const fn without_popup(resolution: Resolution) -> Self {
        Self {
            info_window: None,
            resolution,
        }
    }
}

/// Turns map clicks into places.
///
/// Each click gets a generation number. Responses of a click that
/// is no longer the latest one never open a popup and, depending on
/// [`StaleResponses`], never reach the store.
#[derive(Debug)]
pub struct Coordinator<G> {
    gateway: G,
    store: SharedPlaceStore,
    stale_responses: StaleResponses,
    latest_click: Cell<u64>,
}

impl<G> Coordinator<G>
where
    G: ReverseGeocodingGateway + PlaceDetailsGateway,
{
    pub fn new(gateway: G, store: SharedPlaceStore) -> Self {
        Self {
            gateway,
            store,
            stale_responses: StaleResponses::default(),
            latest_click: Cell::new(0),
        }
    }

    #[must_use]
    pub fn with_stale_responses(mut self, stale_responses: StaleResponses) -> Self {
        self.stale_responses = stale_responses;
        self
    }

    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    pub const fn store(&self) -> &SharedPlaceStore {
        &self.store
    }

    pub fn is_latest(&self, generation: u64) -> bool {
        self.latest_click.get() == generation
    }

    fn begin_click(&self) -> u64 {
        let generation = self.latest_click.get() + 1;
        self.latest_click.set(generation);
        generation
    }

    /// Resolves a click into a place and inserts it into the store.
    ///
    /// Failures are logged and end the interaction without a place.
    pub async fn handle_click(&self, click: MapClick) -> ClickOutcome {
        let generation = self.begin_click();
        let MapClick { pos, poi_id } = click;
        log::debug!("Handle click #{generation} at {pos}");

        let results = match self.gateway.reverse_geocode(pos).await {
            Ok(results) => results,
            Err(err) => {
                log::error!("An error occurred while trying to reverse geocode {pos}: {err}");
                return ClickOutcome::without_popup(Resolution::Unresolved);
            }
        };
        let Some(GeocodeResult {
            formatted_address,
            place_id,
        }) = results.into_iter().next()
        else {
            log::warn!("No address found for {pos}");
            return ClickOutcome::without_popup(Resolution::Unresolved);
        };

        let superseded = !self.is_latest(generation);
        if superseded {
            log::debug!("Click #{generation} has been superseded");
            if self.stale_responses == StaleResponses::Discard {
                return ClickOutcome::without_popup(Resolution::Superseded);
            }
        }
        let info_window = (poi_id.is_none() && !superseded).then(|| InfoWindow {
            position: pos,
            header: formatted_address.clone(),
            content: pos.to_string(),
        });

        let id = poi_id
            .clone()
            .or(place_id)
            .unwrap_or_else(|| Id::derive_from_geocode(&formatted_address, pos));
        if self.store.borrow().contains(id.as_str()) {
            log::debug!("Place {id} already exists");
            return ClickOutcome {
                info_window,
                resolution: Resolution::Duplicate(id),
            };
        }

        let name = match poi_id {
            Some(poi_id) => {
                let Some(name) = self.lookup_name(&poi_id).await else {
                    return ClickOutcome {
                        info_window,
                        resolution: Resolution::MissingDetails(id),
                    };
                };
                if self.stale_responses == StaleResponses::Discard && !self.is_latest(generation) {
                    log::debug!("Click #{generation} has been superseded");
                    return ClickOutcome::without_popup(Resolution::Superseded);
                }
                Some(name)
            }
            None => None,
        };

        let place = Place {
            id: id.clone(),
            name,
            address: Some(formatted_address),
            pos: Some(pos),
        };
        let resolution = if self.store.borrow_mut().add_place(place) {
            log::info!("Added place {id}");
            Resolution::Added(id)
        } else {
            Resolution::Duplicate(id)
        };
        ClickOutcome {
            info_window,
            resolution,
        }
    }

    async fn lookup_name(&self, poi_id: &Id) -> Option<String> {
        match self.gateway.place_details(poi_id, &[PlaceField::Name]).await {
            Ok(Some(PlaceDetails { name: Some(name) })) => Some(name),
            Ok(_) => {
                log::warn!("No name found for place {poi_id}");
                None
            }
            Err(err) => {
                log::error!(
                    "An error occurred while trying to fetch the details of place {poi_id}: {err}"
                );
                None
            }
        }
    }
}
