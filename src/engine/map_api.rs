use super::{Engine, Scene};

use crate::{
    api::MapAPI,
    presenter::{DrawInstruction, MapSurface, SharedSurface},
};

impl MapAPI for Engine {
    fn render(&self) -> Vec<DrawInstruction> {
        let scene = self.scene();

        self.presenter
            .render(&scene.position, scene.tracking, scene.selected.as_ref())
    }

    #[tracing::instrument(skip_all)]
    fn attach_surface(&self, surface: SharedSurface) {
        let presenter = self.presenter.clone();
        let paint = move |scene: &Scene| {
            let instructions =
                presenter.render(&scene.position, scene.tracking, scene.selected.as_ref());
            surface.lock().apply_all(&instructions);
        };

        paint(&self.scene());
        self.on_redraw(paint);
    }
}

#[test]
fn render_follows_the_selected_route() {
    use crate::api::{LocationAPI, RouteAPI};
    use crate::entities::{Coordinates, TransportMode};
    use crate::presenter::{Camera, MapState};
    use crate::testing::{route, FakeMaps, RecordingSource};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::block_on;

    let maps = Arc::new(
        FakeMaps::default()
            .with_place("a", Coordinates::new(10.0, 10.0), Duration::ZERO)
            .with_place("b", Coordinates::new(11.0, 12.0), Duration::ZERO)
            .with_routes(
                "a",
                vec![route(
                    "a to b",
                    vec![Coordinates::new(10.0, 10.0), Coordinates::new(11.0, 12.0)],
                )],
            ),
    );
    let engine = Engine::new(maps.clone(), maps, Arc::new(RecordingSource::default()));

    let mut state = MapState::default();
    state.apply_all(&engine.render());
    assert!(matches!(state.camera, Some(Camera::Region { .. })));

    let routes = block_on(engine.fetch_routes("a".into(), "b".into(), TransportMode::Automobile));
    engine.select_route(routes[0].id).unwrap();
    engine.start_tracking();

    state.apply_all(&engine.render());

    assert_eq!(state.overlays, vec![routes[0].path.clone()]);
    assert!(matches!(state.camera, Some(Camera::Rect { .. })));
    assert!(!state.shows_user_location);
}

#[test]
fn attached_surface_repaints_without_render() {
    use crate::api::{LocationAPI, RouteAPI};
    use crate::entities::{Coordinates, Position, TransportMode};
    use crate::presenter::{Camera, MapState, START_TITLE};
    use crate::testing::{route, FakeMaps, RecordingSource};
    use crate::tracker::LocationEvent;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::block_on;

    let path = vec![Coordinates::new(48.8566, 2.3522), Coordinates::new(48.8049, 2.1204)];
    let maps = Arc::new(
        FakeMaps::default()
            .with_place("paris", Coordinates::new(48.8566, 2.3522), Duration::ZERO)
            .with_place("versailles", Coordinates::new(48.8049, 2.1204), Duration::ZERO)
            .with_routes("paris", vec![route("A13", path.clone())]),
    );
    let engine = Engine::new(maps.clone(), maps, Arc::new(RecordingSource::default()));

    let state = Arc::new(Mutex::new(MapState::default()));
    engine.attach_surface(state.clone());

    // painted once on attach
    assert!(matches!(state.lock().camera, Some(Camera::Region { .. })));

    engine.handle_location_event(LocationEvent::LocationsUpdated(vec![Position::new(
        Coordinates::new(48.8584, 2.2945),
    )]));
    match state.lock().camera {
        Some(Camera::Region { region }) => {
            assert_eq!(region.center, Coordinates::new(48.8584, 2.2945))
        }
        ref other => panic!("unexpected camera {:?}", other),
    }

    let routes = block_on(engine.fetch_routes(
        "paris".into(),
        "versailles".into(),
        TransportMode::Automobile,
    ));
    engine.select_route(routes[0].id).unwrap();

    let state = state.lock();
    assert_eq!(state.overlays, vec![path.clone()]);
    assert_eq!(state.annotations[0].title, START_TITLE);
    assert_eq!(state.annotations[0].coordinates, path[0]);
    assert!(matches!(state.camera, Some(Camera::Rect { .. })));
    assert!(!state.shows_user_location);
}
