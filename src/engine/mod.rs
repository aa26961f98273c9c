mod location_api;
mod map_api;
mod route_api;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    api::API,
    entities::{Position, RouteOption},
    external::{DynDirectionsService, DynGeocodingService},
    observable::Published,
    presenter::MapPresenter,
    tracker::{DynLocationSource, LocationTracker},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub position: Position,
    pub tracking: bool,
    pub selected: Option<RouteOption>,
}

pub struct Engine {
    geocoder: DynGeocodingService,
    directions: DynDirectionsService,
    tracker: LocationTracker,
    routes: Published<Vec<RouteOption>>,
    selected_route: Published<Option<RouteOption>>,
    presenter: MapPresenter,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(
        geocoder: DynGeocodingService,
        directions: DynDirectionsService,
        location_source: DynLocationSource,
    ) -> Self {
        Self {
            geocoder,
            directions,
            tracker: LocationTracker::new(location_source),
            routes: Published::new(vec![]),
            selected_route: Published::new(None),
            presenter: MapPresenter::default(),
        }
    }

    pub fn tracker(&self) -> &LocationTracker {
        &self.tracker
    }

    pub fn scene(&self) -> Scene {
        Scene {
            position: self.tracker.position(),
            tracking: self.tracker.is_tracking(),
            selected: self.selected_route.get(),
        }
    }

    pub fn on_redraw<F>(&self, listener: F)
    where
        F: Fn(&Scene) + Send + Sync + 'static,
    {
        let position = self.tracker.position_handle();
        let tracking = self.tracker.tracking_handle();
        let selected = self.selected_route.clone();

        let redraw = Arc::new(move || {
            listener(&Scene {
                position: position.get(),
                tracking: tracking.get(),
                selected: selected.get(),
            })
        });

        {
            let redraw = redraw.clone();
            self.tracker.subscribe_position(move |_| redraw());
        }
        {
            let redraw = redraw.clone();
            self.tracker.subscribe_tracking(move |_| redraw());
        }
        self.selected_route.subscribe(move |_| redraw());
    }
}

impl API for Engine {}

#[test]
fn redraw_fires_for_every_scene_input() {
    use crate::api::{LocationAPI, RouteAPI};
    use crate::entities::{Coordinates, TransportMode};
    use crate::testing::{route, FakeMaps, RecordingSource};
    use crate::tracker::LocationEvent;
    use parking_lot::Mutex;
    use std::time::Duration;
    use tokio_test::block_on;

    let maps = Arc::new(
        FakeMaps::default()
            .with_place("home", Coordinates::new(1.0, 1.0), Duration::ZERO)
            .with_place("work", Coordinates::new(2.0, 2.0), Duration::ZERO)
            .with_routes("home", vec![route("main st", vec![])]),
    );
    let engine = Engine::new(maps.clone(), maps, Arc::new(RecordingSource::default()));

    let scenes = Arc::new(Mutex::new(vec![]));
    {
        let scenes = scenes.clone();
        engine.on_redraw(move |scene: &Scene| scenes.lock().push(scene.clone()));
    }

    engine.handle_location_event(LocationEvent::LocationsUpdated(vec![Position::new(
        Coordinates::new(3.0, 3.0),
    )]));
    let routes = block_on(engine.fetch_routes("home".into(), "work".into(), TransportMode::Automobile));
    engine.select_route(routes[0].id).unwrap();

    let scenes = scenes.lock();
    assert_eq!(scenes.len(), 3);

    assert_eq!(scenes[0].position.coordinates, Coordinates::new(3.0, 3.0));
    assert!(scenes[0].tracking);

    // fetching routes suspends tracking
    assert!(!scenes[1].tracking);
    assert_eq!(scenes[1].selected, None);

    assert_eq!(scenes[2].selected, Some(routes[0].clone()));
    assert_eq!(scenes[2], engine.scene());
}
