use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::RouteAPI,
    entities::{GeocodedPoint, RouteOption, TransportMode},
    error::{invalid_input_error, Error},
};

impl Engine {
    // failures are logged and produce an empty list
    #[tracing::instrument(skip(self))]
    pub async fn resolve_routes(
        &self,
        from: &str,
        to: &str,
        mode: TransportMode,
    ) -> Vec<RouteOption> {
        let (origin, destination) = futures::join!(self.geocode(from), self.geocode(to));

        let (origin, destination) = match (origin, destination) {
            (Ok(origin), Ok(destination)) => (origin, destination),
            (origin, destination) => {
                if let Err(err) = origin {
                    tracing::warn!("failed to geocode {:?}: {}", from, err);
                }
                if let Err(err) = destination {
                    tracing::warn!("failed to geocode {:?}: {}", to, err);
                }

                return vec![];
            }
        };

        match self.directions.directions(&origin, &destination, mode).await {
            Ok(routes) => {
                tracing::info!("fetched {} routes", routes.len());
                routes
            }
            Err(err) => {
                tracing::warn!("failed to fetch routes: {}", err);
                vec![]
            }
        }
    }

    async fn geocode(&self, address: &str) -> Result<GeocodedPoint, Error> {
        if address.trim().is_empty() {
            return Err(invalid_input_error());
        }

        self.geocoder.geocode(address).await
    }
}

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn fetch_routes(
        &self,
        from: String,
        to: String,
        mode: TransportMode,
    ) -> Vec<RouteOption> {
        self.tracker.stop_tracking();

        let routes = self.resolve_routes(&from, &to, mode).await;
        // the selection is left alone, even if it is not in the new list
        self.routes.set(routes.clone());

        routes
    }

    fn routes(&self) -> Vec<RouteOption> {
        self.routes.get()
    }

    #[tracing::instrument(skip(self))]
    fn select_route(&self, id: Uuid) -> Result<RouteOption, Error> {
        let route = self
            .routes
            .get()
            .into_iter()
            .find(|route| route.id == id)
            .ok_or_else(|| invalid_input_error())?;

        tracing::info!("selected route {:?}", route.name);
        self.selected_route.set(Some(route.clone()));

        Ok(route)
    }

    fn selected_route(&self) -> Option<RouteOption> {
        self.selected_route.get()
    }
}

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::engine::Engine;
    use crate::entities::Coordinates;
    use crate::testing::{route, FakeMaps, RecordingSource};

    pub const GOOGLEPLEX: &str = "1600 Amphitheatre Parkway, Mountain View, CA";
    pub const INFINITE_LOOP: &str = "1 Infinite Loop, Cupertino, CA";

    pub fn maps() -> FakeMaps {
        FakeMaps::default()
            .with_place(
                GOOGLEPLEX,
                Coordinates::new(37.4220, -122.0841),
                Duration::from_millis(20),
            )
            .with_place(
                INFINITE_LOOP,
                Coordinates::new(37.3318, -122.0312),
                Duration::from_millis(5),
            )
            .with_routes(
                GOOGLEPLEX,
                vec![
                    route(
                        "CA-85 S",
                        vec![
                            Coordinates::new(37.4220, -122.0841),
                            Coordinates::new(37.3318, -122.0312),
                        ],
                    ),
                    route("I-280 S", vec![Coordinates::new(37.4220, -122.0841)]),
                    route("El Camino Real", vec![]),
                ],
            )
    }

    pub fn engine(maps: &Arc<FakeMaps>) -> Engine {
        Engine::new(
            maps.clone(),
            maps.clone(),
            Arc::new(RecordingSource::default()),
        )
    }
}

#[test]
fn resolves_routes_in_service_order() {
    use crate::entities::RouteOption;
    use fixtures::{engine, maps, GOOGLEPLEX, INFINITE_LOOP};
    use std::sync::Arc;
    use tokio_test::block_on;

    let maps = Arc::new(maps());
    let engine = engine(&maps);

    let routes = block_on(engine.resolve_routes(
        GOOGLEPLEX,
        INFINITE_LOOP,
        TransportMode::Automobile,
    ));

    let names: Vec<&str> = routes.iter().map(|r: &RouteOption| r.name.as_str()).collect();
    assert_eq!(names, vec!["CA-85 S", "I-280 S", "El Camino Real"]);
    assert_eq!(maps.directions_calls(), 1);
    assert!(maps
        .position_of(&format!(
            "directions:{}:{}:driving",
            GOOGLEPLEX, INFINITE_LOOP
        ))
        .is_some());
}

#[test]
fn directions_wait_for_both_geocodes() {
    use fixtures::{engine, maps, GOOGLEPLEX, INFINITE_LOOP};
    use std::sync::Arc;
    use tokio_test::block_on;

    let maps = Arc::new(maps());
    let engine = engine(&maps);

    block_on(engine.resolve_routes(GOOGLEPLEX, INFINITE_LOOP, TransportMode::Automobile));

    let started_from = maps.position_of(&format!("geocode:start:{}", GOOGLEPLEX)).unwrap();
    let started_to = maps.position_of(&format!("geocode:start:{}", INFINITE_LOOP)).unwrap();
    let done_from = maps.position_of(&format!("geocode:done:{}", GOOGLEPLEX)).unwrap();
    let done_to = maps.position_of(&format!("geocode:done:{}", INFINITE_LOOP)).unwrap();
    let directions = maps
        .position_of(&format!("directions:{}:{}:driving", GOOGLEPLEX, INFINITE_LOOP))
        .unwrap();

    // both geocodes are in flight at once
    assert!(started_from < done_to && started_to < done_from);
    // the slower origin geocode finishes last, and directions still wait for it
    assert!(done_to < done_from);
    assert!(directions > done_from && directions > done_to);
}

#[test]
fn failed_geocode_skips_directions() {
    use fixtures::{engine, maps, INFINITE_LOOP};
    use std::sync::Arc;
    use tokio_test::block_on;

    let maps = Arc::new(maps());
    let engine = engine(&maps);

    let routes = block_on(engine.resolve_routes(
        "###invalid###",
        INFINITE_LOOP,
        TransportMode::Automobile,
    ));

    assert!(routes.is_empty());
    assert_eq!(maps.directions_calls(), 0);
}

#[test]
fn blank_address_is_never_sent() {
    use fixtures::{engine, maps, GOOGLEPLEX};
    use std::sync::Arc;
    use tokio_test::block_on;

    let maps = Arc::new(maps());
    let engine = engine(&maps);

    let routes = block_on(engine.resolve_routes(GOOGLEPLEX, "   ", TransportMode::Walking));

    assert!(routes.is_empty());
    assert_eq!(maps.directions_calls(), 0);
    assert!(maps.position_of("geocode:start:   ").is_none());
}

#[test]
fn failed_directions_yield_empty_list() {
    use fixtures::{engine, maps, GOOGLEPLEX, INFINITE_LOOP};
    use std::sync::Arc;
    use tokio_test::block_on;

    let maps = Arc::new(maps());
    let engine = engine(&maps);

    // no routes are known from this origin
    let routes = block_on(engine.resolve_routes(
        INFINITE_LOOP,
        GOOGLEPLEX,
        TransportMode::Transit,
    ));

    assert!(routes.is_empty());
    assert_eq!(maps.directions_calls(), 1);
}

#[test]
fn fetch_replaces_list_and_stops_tracking() {
    use crate::api::LocationAPI;
    use fixtures::{engine, maps, GOOGLEPLEX, INFINITE_LOOP};
    use std::sync::Arc;
    use tokio_test::block_on;

    let maps = Arc::new(maps());
    let engine = engine(&maps);
    assert!(engine.is_tracking());

    let routes = block_on(engine.fetch_routes(
        GOOGLEPLEX.into(),
        INFINITE_LOOP.into(),
        TransportMode::Automobile,
    ));

    assert!(!engine.is_tracking());
    assert_eq!(engine.routes(), routes);

    block_on(engine.fetch_routes(
        "###invalid###".into(),
        INFINITE_LOOP.into(),
        TransportMode::Automobile,
    ));

    assert!(engine.routes().is_empty());
}

#[test]
fn selection_survives_a_new_fetch() {
    use fixtures::{engine, maps, GOOGLEPLEX, INFINITE_LOOP};
    use std::sync::Arc;
    use tokio_test::block_on;

    let maps = Arc::new(maps());
    let engine = engine(&maps);

    let routes = block_on(engine.fetch_routes(
        GOOGLEPLEX.into(),
        INFINITE_LOOP.into(),
        TransportMode::Automobile,
    ));
    let selected = engine.select_route(routes[1].id).unwrap();
    assert_eq!(engine.routes(), routes);

    block_on(engine.fetch_routes(
        "###invalid###".into(),
        INFINITE_LOOP.into(),
        TransportMode::Automobile,
    ));

    assert!(engine.routes().is_empty());
    assert_eq!(engine.selected_route(), Some(selected));
}

#[test]
fn selecting_unknown_route_fails() {
    use fixtures::{engine, maps};
    use std::sync::Arc;

    let maps = Arc::new(maps());
    let engine = engine(&maps);

    assert_eq!(engine.select_route(Uuid::new_v4()), Err(invalid_input_error()));
    assert_eq!(engine.selected_route(), None);
}

#[test]
fn concurrent_fetches_last_writer_wins() {
    use crate::entities::Coordinates;
    use crate::testing::{route, FakeMaps, RecordingSource};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::block_on;

    let maps = Arc::new(
        FakeMaps::default()
            .with_place("slow", Coordinates::new(1.0, 1.0), Duration::from_millis(30))
            .with_place("fast", Coordinates::new(2.0, 2.0), Duration::from_millis(1))
            .with_place("dest", Coordinates::new(3.0, 3.0), Duration::from_millis(1))
            .with_routes("slow", vec![route("slow road", vec![])])
            .with_routes("fast", vec![route("fast road", vec![])]),
    );
    let engine = Engine::new(maps.clone(), maps.clone(), Arc::new(RecordingSource::default()));

    block_on(async {
        futures::join!(
            engine.fetch_routes("slow".into(), "dest".into(), TransportMode::Automobile),
            engine.fetch_routes("fast".into(), "dest".into(), TransportMode::Automobile),
        )
    });

    let names: Vec<String> = engine.routes().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["slow road".to_string()]);
    assert_eq!(maps.directions_calls(), 2);
}
