use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::MapAPI;
use crate::presenter::{DrawInstruction, MapState};
use crate::server::{DynAPI, SharedMap};

#[derive(Serialize, Deserialize)]
pub struct MapView {
    pub instructions: Vec<DrawInstruction>,
    pub state: MapState,
}

pub async fn render(
    Extension(api): Extension<DynAPI>,
    Extension(map): Extension<SharedMap>,
) -> Json<MapView> {
    let instructions = api.render();
    let state = map.lock().clone();

    MapView {
        instructions,
        state,
    }
    .into()
}

#[test]
fn render_centers_on_position_while_tracking() {
    use crate::api::LocationAPI;
    use crate::engine::Engine;
    use crate::entities::{Coordinates, Position};
    use crate::presenter::Camera;
    use crate::testing::{FakeMaps, RecordingSource};
    use crate::tracker::LocationEvent;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio_test::block_on;

    let maps = Arc::new(FakeMaps::default());
    let api: DynAPI = Arc::new(Engine::new(
        maps.clone(),
        maps,
        Arc::new(RecordingSource::default()),
    ));
    let map: SharedMap = Arc::new(Mutex::new(MapState::default()));
    api.attach_surface(map.clone());

    api.handle_location_event(LocationEvent::LocationsUpdated(vec![Position::new(
        Coordinates::new(51.5074, -0.1278),
    )]));

    let Json(view) = block_on(render(Extension(api), Extension(map)));

    assert_eq!(view.instructions.len(), 3);
    assert!(view.state.overlays.is_empty());
    assert!(view.state.annotations.is_empty());
    match view.state.camera {
        Some(Camera::Region { region }) => {
            assert_eq!(region.center, Coordinates::new(51.5074, -0.1278))
        }
        other => panic!("unexpected camera {:?}", other),
    }
}
