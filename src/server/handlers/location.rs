use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::LocationAPI;
use crate::entities::Position;
use crate::server::DynAPI;
use crate::tracker::LocationEvent;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationStatus {
    pub position: Position,
    pub tracking: bool,
}

fn status(api: &DynAPI) -> Json<LocationStatus> {
    LocationStatus {
        position: api.position(),
        tracking: api.is_tracking(),
    }
    .into()
}

pub async fn start(Extension(api): Extension<DynAPI>) -> Json<LocationStatus> {
    api.start_tracking();

    status(&api)
}

pub async fn stop(Extension(api): Extension<DynAPI>) -> Json<LocationStatus> {
    api.stop_tracking();

    status(&api)
}

pub async fn find(Extension(api): Extension<DynAPI>) -> Json<LocationStatus> {
    status(&api)
}

pub async fn push_event(
    Extension(api): Extension<DynAPI>,
    Json(event): Json<LocationEvent>,
) -> Json<LocationStatus> {
    api.handle_location_event(event);

    status(&api)
}

#[test]
fn pushed_events_update_status() {
    use crate::engine::Engine;
    use crate::entities::Coordinates;
    use crate::testing::{FakeMaps, RecordingSource};
    use std::sync::Arc;
    use tokio_test::block_on;

    let maps = Arc::new(FakeMaps::default());
    let api: DynAPI = Arc::new(Engine::new(
        maps.clone(),
        maps,
        Arc::new(RecordingSource::default()),
    ));

    let event: LocationEvent = serde_json::from_str(
        r#"{
            "name": "locations_updated",
            "data": [{ "coordinates": { "lat": 49.2827, "lng": -123.1207 } }]
        }"#,
    )
    .unwrap();

    let Json(status) = block_on(push_event(Extension(api.clone()), Json(event)));
    assert_eq!(status.position.coordinates, Coordinates::new(49.2827, -123.1207));
    assert!(status.tracking);

    let event: LocationEvent =
        serde_json::from_str(r#"{ "name": "authorization_changed", "data": "denied" }"#).unwrap();
    let Json(status) = block_on(push_event(Extension(api.clone()), Json(event)));
    assert!(!status.tracking);

    let Json(status) = block_on(start(Extension(api.clone())));
    assert!(status.tracking);

    let Json(status) = block_on(stop(Extension(api.clone())));
    assert!(!status.tracking);

    let Json(status) = block_on(find(Extension(api)));
    assert_eq!(status.position.coordinates, Coordinates::new(49.2827, -123.1207));
}
