use crate::{
    command::{Command, Input, Target},
    config::Config,
    gateways::{self, GeocodingGw, GeolocationGw},
    view::{self, Markers, SidebarView, TerminalMap},
};
use anyhow::Result;
use placemarks_core::{
    cluster::GridClusterer,
    coordinator::{ClickOutcome, Coordinator, MapClick, Resolution},
    entities::{Id, MapPoint},
    gateways::{
        geocode::{PlaceDetailsGateway, ReverseGeocodingGateway},
        map::MapSurface,
    },
    geolocation::{center_on_user, MapView},
    markers::MarkerRegistry,
    store::{PlaceStore, SharedPlaceStore},
};
use std::{cell::RefCell, rc::Rc};
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    task::JoinHandle,
};

type SharedSidebar = Rc<RefCell<SidebarView>>;

/// Interactive map session on the terminal.
///
/// Must be run inside a [`tokio::task::LocalSet`] because clicks are
/// resolved in local tasks.
pub struct Session<G> {
    store: SharedPlaceStore,
    markers: Markers,
    map: Rc<TerminalMap>,
    sidebar: SharedSidebar,
    coordinator: Rc<Coordinator<G>>,
    geolocation: GeolocationGw,
    view: MapView,
}

impl Session<GeocodingGw> {
    pub fn try_new(cfg: Config) -> Result<Self> {
        let geocoding = gateways::geocoding_gateway(&cfg.geocoding);
        let geolocation = gateways::geolocation_gateway(&cfg.geolocation)?;
        Ok(Self::new(cfg, geocoding, geolocation))
    }
}

impl<G> Session<G>
where
    G: ReverseGeocodingGateway + PlaceDetailsGateway + 'static,
{
    fn new(cfg: Config, geocoding: G, geolocation: GeolocationGw) -> Self {
        let Config {
            map: view,
            stale_responses,
            sidebar,
            ..
        } = cfg;

        let store = PlaceStore::new_shared();
        let markers = MarkerRegistry::new_shared(GridClusterer::new());
        view::mount_markers(&mut store.borrow_mut(), &markers);
        let sidebar = Rc::new(RefCell::new(SidebarView::new(
            sidebar.visible_rows,
            &mut store.borrow_mut(),
        )));

        let coordinator =
            Coordinator::new(geocoding, Rc::clone(&store)).with_stale_responses(stale_responses);
        log::info!("Responses of superseded clicks: {stale_responses:?}");

        Self {
            store,
            markers,
            map: Rc::new(TerminalMap::new(&view)),
            sidebar,
            coordinator: Rc::new(coordinator),
            geolocation,
            view,
        }
    }

    pub async fn run(self) -> Result<()> {
        self.locate().await;
        println!("Type 'help' to list the available commands.");

        let mut lines = BufReader::new(io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match Input::parse_line(&line) {
                Ok(Command::Quit) => break,
                Ok(cmd) => self.handle_command(cmd).await,
                Err(err) => print!("{err}"),
            }
            render_sidebar_if_dirty(&self.store, &self.sidebar);
        }
        log::info!("Bye");
        Ok(())
    }

    async fn handle_command(&self, cmd: Command) {
        match cmd {
            Command::Click { lat, lng, poi_id } => {
                let pos = MapPoint::from_lat_lng_deg(lat, lng);
                self.click(MapClick { pos, poi_id });
            }
            Command::Remove { place } => self.remove(place),
            Command::Hover { place } => {
                if self.select(place, PlaceStore::set_hovered_place) {
                    self.print_clusters();
                }
            }
            Command::Select { place } => {
                self.select(place, PlaceStore::set_active_place);
            }
            Command::List => {
                println!("{}", self.sidebar.borrow().render(&self.store.borrow()));
                self.sidebar.borrow().take_dirty();
            }
            Command::Scroll { rows } => {
                self.sidebar
                    .borrow_mut()
                    .scroll_by(rows, &self.store.borrow());
            }
            Command::Clusters => self.print_clusters(),
            Command::Zoom { level } => {
                self.map.set_zoom(level);
                self.print_clusters();
            }
            Command::Locate => self.locate().await,
            Command::Quit => {}
        }
    }

    /// Resolves the click in the background so that
    /// further clicks can overtake it.
    fn click(&self, click: MapClick) -> JoinHandle<()> {
        let coordinator = Rc::clone(&self.coordinator);
        let map = Rc::clone(&self.map);
        let store = Rc::clone(&self.store);
        let sidebar = Rc::clone(&self.sidebar);
        tokio::task::spawn_local(async move {
            let ClickOutcome {
                info_window,
                resolution,
            } = coordinator.handle_click(click).await;
            if let Some(info_window) = info_window {
                map.open_info_window(info_window);
            }
            match resolution {
                Resolution::Added(id) => {
                    sidebar.borrow_mut().reveal(&id, &store.borrow());
                }
                Resolution::MissingDetails(id) => {
                    println!("Could not find a name for {id}");
                }
                Resolution::Duplicate(_) | Resolution::Unresolved | Resolution::Superseded => {}
            }
            render_sidebar_if_dirty(&store, &sidebar);
        })
    }

    fn remove(&self, target: Target) {
        let id = match target {
            Target::Row(row) => {
                let Some(id) = self.sidebar.borrow().row_id(row, &self.store.borrow()) else {
                    println!("There is no place in row {row}");
                    return;
                };
                id
            }
            Target::Id(id) => id,
        };
        let removed = self.store.borrow_mut().remove_place(id.as_str());
        if removed.is_none() {
            println!("Unknown place {id}");
        }
    }

    /// Applies a selection setter and reports whether it changed anything.
    fn select(&self, id: Option<Id>, set: fn(&mut PlaceStore, Option<Id>) -> bool) -> bool {
        if let Some(id) = &id {
            if !self.store.borrow().contains(id.as_str()) {
                println!("Unknown place {id}");
                return false;
            }
            self.sidebar.borrow_mut().reveal(id, &self.store.borrow());
        }
        set(&mut self.store.borrow_mut(), id)
    }

    fn print_clusters(&self) {
        let store = self.store.borrow();
        let markers = self.markers.borrow();
        println!(
            "{}",
            view::render_clusters(markers.clusterer(), self.map.zoom(), store.hovered_place())
        );
    }

    async fn locate(&self) {
        let center = center_on_user(&self.geolocation, &*self.map, &self.view).await;
        println!("Map centered at {center} (zoom {})", self.map.zoom());
    }
}

fn render_sidebar_if_dirty(store: &SharedPlaceStore, sidebar: &SharedSidebar) {
    let sidebar = sidebar.borrow();
    if sidebar.take_dirty() {
        println!("{}", sidebar.render(&store.borrow()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Geocoding, Geolocation, Sidebar};
    use placemarks_core::{
        coordinator::StaleResponses,
        gateways::geocode::{self, GeocodeResult, PlaceDetails, PlaceField},
    };
    use placemarks_entities::{builders::*, place::Place};
    use placemarks_gateways::fixed::FixedPosition;
    use std::{future::Future, time::Duration};

    struct DamGeocoder;

    impl ReverseGeocodingGateway for DamGeocoder {
        async fn reverse_geocode(&self, _: MapPoint) -> geocode::Result<Vec<GeocodeResult>> {
            Ok(vec![GeocodeResult {
                formatted_address: "Dam, Amsterdam".into(),
                place_id: Some("dam".into()),
            }])
        }
    }

    impl PlaceDetailsGateway for DamGeocoder {
        async fn place_details(
            &self,
            _: &Id,
            _: &[PlaceField],
        ) -> geocode::Result<Option<PlaceDetails>> {
            Ok(None)
        }
    }

    fn dam() -> MapPoint {
        MapPoint::from_lat_lng_deg(52.373, 4.893)
    }

    fn new_session(visible_rows: usize) -> Session<DamGeocoder> {
        let cfg = Config {
            map: MapView::default(),
            geocoding: Geocoding { gateway: None },
            geolocation: Geolocation {
                gateway: None,
                timeout: Duration::from_secs(1),
            },
            stale_responses: StaleResponses::Keep,
            sidebar: Sidebar { visible_rows },
        };
        Session::new(cfg, DamGeocoder, GeolocationGw::Fixed(FixedPosition(dam())))
    }

    fn add_places(session: &Session<DamGeocoder>, ids: &[&str]) {
        for id in ids {
            session
                .store
                .borrow_mut()
                .add_place(Place::build().id(id).pos(dam()).finish());
        }
    }

    fn ids(session: &Session<DamGeocoder>) -> Vec<String> {
        let store = session.store.borrow();
        store.places().iter().map(|p| p.id.to_string()).collect()
    }

    fn run_local<F: Future>(future: F) -> F::Output {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        tokio::task::LocalSet::new().block_on(&runtime, future)
    }

    #[test]
    fn remove_place_by_row_or_id() {
        let session = new_session(10);
        add_places(&session, &["a", "b", "c"]);
        run_local(async {
            session
                .handle_command(Command::Remove {
                    place: Target::Row(2),
                })
                .await;
            assert_eq!(vec!["a", "c"], ids(&session));

            session
                .handle_command(Command::Remove {
                    place: Target::Row(5),
                })
                .await;
            session
                .handle_command(Command::Remove {
                    place: Target::Id("x".into()),
                })
                .await;
            assert_eq!(vec!["a", "c"], ids(&session));

            session
                .handle_command(Command::Remove {
                    place: Target::Id("c".into()),
                })
                .await;
            assert_eq!(vec!["a"], ids(&session));
        });
        assert!(session.markers.borrow().contains("a"));
        assert!(!session.markers.borrow().contains("c"));
    }

    #[test]
    fn ignore_selection_of_unknown_places() {
        let session = new_session(10);
        add_places(&session, &["a"]);
        run_local(async {
            session
                .handle_command(Command::Hover {
                    place: Some("x".into()),
                })
                .await;
            assert!(session.store.borrow().hovered_place().is_none());

            session
                .handle_command(Command::Hover {
                    place: Some("a".into()),
                })
                .await;
            session
                .handle_command(Command::Select {
                    place: Some("a".into()),
                })
                .await;
            let store = session.store.borrow();
            assert_eq!(Some(&Id::from("a")), store.hovered_place());
            assert_eq!(Some(&Id::from("a")), store.active_place());
        });
    }

    #[test]
    fn reveal_clicked_place_in_sidebar() {
        let session = new_session(1);
        add_places(&session, &["a", "b"]);
        run_local(async {
            let click = MapClick {
                pos: dam(),
                poi_id: None,
            };
            session.click(click).await.unwrap();
        });
        assert_eq!(vec!["a", "b", "dam"], ids(&session));
        assert!(session.markers.borrow().contains("dam"));
        let text = session.sidebar.borrow().render(&session.store.borrow());
        assert!(text.starts_with("Places 3-3 of 3"));
        assert!(text.contains("Dam, Amsterdam"));
    }

    #[test]
    fn locate_user_at_fixed_position() {
        let session = new_session(10);
        run_local(session.handle_command(Command::Locate));
        assert_eq!(dam(), session.map.center());
        assert_eq!(MapView::default().located_zoom, session.map.zoom());
    }
}
