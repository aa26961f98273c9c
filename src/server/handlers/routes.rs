use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::RouteAPI;
use crate::entities::{RouteOption, TransportMode};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct FetchParams {
    from: String,
    to: String,
    #[serde(default)]
    mode: TransportMode,
}

#[derive(Serialize, Deserialize)]
pub struct SelectParams {
    id: Uuid,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteListing {
    pub id: Uuid,
    pub name: String,
    pub distance: f64,
    pub expected_travel_time: f64,
    pub formatted_distance: String,
    pub formatted_expected_travel_time: String,
}

impl From<&RouteOption> for RouteListing {
    fn from(route: &RouteOption) -> Self {
        Self {
            id: route.id,
            name: route.name.clone(),
            distance: route.distance,
            expected_travel_time: route.expected_travel_time,
            formatted_distance: route.formatted_distance(),
            formatted_expected_travel_time: route.formatted_expected_travel_time(),
        }
    }
}

fn listings(routes: &[RouteOption]) -> Vec<RouteListing> {
    routes.iter().map(RouteListing::from).collect()
}

pub async fn fetch(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<FetchParams>,
) -> Json<Vec<RouteListing>> {
    let routes = api.fetch_routes(params.from, params.to, params.mode).await;

    listings(&routes).into()
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Json<Vec<RouteListing>> {
    listings(&api.routes()).into()
}

pub async fn selected(Extension(api): Extension<DynAPI>) -> Json<Option<RouteOption>> {
    api.selected_route().into()
}

pub async fn select(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SelectParams>,
) -> Result<Json<RouteOption>, Error> {
    let route = api.select_route(params.id)?;

    Ok(route.into())
}

#[cfg(test)]
fn api() -> DynAPI {
    use crate::engine::Engine;
    use crate::entities::Coordinates;
    use crate::testing::{FakeMaps, RecordingSource};
    use std::sync::Arc;
    use std::time::Duration;

    let maps = Arc::new(
        FakeMaps::default()
            .with_place("union station", Coordinates::new(43.6453, -79.3806), Duration::ZERO)
            .with_place("cn tower", Coordinates::new(43.6426, -79.3871), Duration::ZERO)
            .with_routes(
                "union station",
                vec![RouteOption::new("Front St W".into(), 1_300.0, 95.0, vec![])],
            ),
    );

    Arc::new(Engine::new(maps.clone(), maps, Arc::new(RecordingSource::default())))
}

#[test]
fn fetch_then_select_over_handlers() {
    use tokio_test::block_on;

    let api = api();

    let Json(fetched) = block_on(fetch(
        Extension(api.clone()),
        Json(FetchParams {
            from: "union station".into(),
            to: "cn tower".into(),
            mode: TransportMode::Walking,
        }),
    ));

    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].formatted_distance, "1.3 Km");
    assert_eq!(fetched[0].formatted_expected_travel_time, "00:01:35");

    let Json(listed) = block_on(list(Extension(api.clone())));
    assert_eq!(listed, fetched);

    let Json(route) = block_on(select(
        Extension(api.clone()),
        Json(SelectParams { id: fetched[0].id }),
    ))
    .unwrap();
    assert_eq!(route.name, "Front St W");

    let Json(current) = block_on(selected(Extension(api)));
    assert_eq!(current, Some(route));
}

#[test]
fn select_unknown_route_is_rejected() {
    use tokio_test::block_on;

    let result = block_on(select(
        Extension(api()),
        Json(SelectParams { id: Uuid::new_v4() }),
    ));

    assert_eq!(result.unwrap_err().code, 101);
}

#[test]
fn fetch_params_default_to_automobile() {
    let params: FetchParams = serde_json::from_str(r#"{"from": "a", "to": "b"}"#).unwrap();

    assert_eq!(params.mode, TransportMode::Automobile);
}
