use super::Engine;

use crate::{api::LocationAPI, entities::Position, tracker::LocationEvent};

impl LocationAPI for Engine {
    #[tracing::instrument(skip(self))]
    fn start_tracking(&self) {
        self.tracker.start_tracking();
    }

    #[tracing::instrument(skip(self))]
    fn stop_tracking(&self) {
        self.tracker.stop_tracking();
    }

    fn handle_location_event(&self, event: LocationEvent) {
        self.tracker.handle_event(event);
    }

    fn position(&self) -> Position {
        self.tracker.position()
    }

    fn is_tracking(&self) -> bool {
        self.tracker.is_tracking()
    }
}

#[test]
fn engine_forwards_tracking_to_the_source() {
    use crate::testing::{FakeMaps, RecordingSource};
    use std::sync::Arc;

    let maps = Arc::new(FakeMaps::default());
    let source = Arc::new(RecordingSource::default());
    let engine = Engine::new(maps.clone(), maps, source.clone());

    engine.stop_tracking();
    assert!(!engine.is_tracking());

    engine.start_tracking();
    assert!(engine.is_tracking());

    assert_eq!(
        *source.calls.lock(),
        vec![
            "request_authorization",
            "start_updates",
            "stop_updates",
            "start_updates"
        ]
    );
}
