use async_channel::Receiver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::Position;
use crate::observable::{Published, SubscriptionId};

pub trait LocationSource {
    fn request_authorization(&self);
    fn start_updates(&self);
    fn stop_updates(&self);
}

pub type DynLocationSource = Arc<dyn LocationSource + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data", rename_all = "snake_case")]
pub enum LocationEvent {
    AuthorizationChanged(AuthorizationStatus),
    LocationsUpdated(Vec<Position>),
}

pub struct LocationTracker {
    source: DynLocationSource,
    position: Published<Position>,
    tracking: Published<bool>,
}

impl LocationTracker {
    #[tracing::instrument(name = "LocationTracker::new", skip_all)]
    pub fn new(source: DynLocationSource) -> Self {
        let tracker = Self {
            source,
            position: Published::new(Position::default()),
            tracking: Published::new(false),
        };

        tracker.source.request_authorization();
        tracker.start_tracking();

        tracker
    }

    pub fn start_tracking(&self) {
        self.source.start_updates();
        self.set_tracking(true);
    }

    pub fn stop_tracking(&self) {
        self.source.stop_updates();
        self.set_tracking(false);
    }

    pub fn position(&self) -> Position {
        self.position.get()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.get()
    }

    pub fn position_handle(&self) -> Published<Position> {
        self.position.clone()
    }

    pub fn tracking_handle(&self) -> Published<bool> {
        self.tracking.clone()
    }

    pub fn subscribe_position<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Position) + Send + Sync + 'static,
    {
        self.position.subscribe(listener)
    }

    pub fn subscribe_tracking<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.tracking.subscribe(listener)
    }

    pub fn handle_event(&self, event: LocationEvent) {
        match event {
            LocationEvent::AuthorizationChanged(status) => self.authorization_changed(status),
            LocationEvent::LocationsUpdated(mut positions) => {
                // only the most recent fix is kept
                if let Some(position) = positions.pop() {
                    self.position.set(position);
                }
            }
        }
    }

    /// Consumes events until every sender has been dropped.
    #[tracing::instrument(name = "LocationTracker::run", skip_all)]
    pub async fn run(&self, events: Receiver<LocationEvent>) {
        while let Ok(event) = events.recv().await {
            self.handle_event(event);
        }

        tracing::info!("location event stream closed");
    }

    fn authorization_changed(&self, status: AuthorizationStatus) {
        match status {
            AuthorizationStatus::Denied => {
                // updates are left running; tracking is just unavailable
                tracing::warn!("location access denied");
                self.set_tracking(false);
            }
            _ => {
                tracing::info!("location authorization: {:?}", status);
                self.start_tracking();
            }
        }
    }

    fn set_tracking(&self, tracking: bool) {
        if self.tracking.get() != tracking {
            tracing::info!("tracking {}", if tracking { "enabled" } else { "disabled" });
        }

        self.tracking.set(tracking);
    }
}

#[test]
fn new_tracker_requests_authorization_and_tracks() {
    use crate::testing::RecordingSource;

    let source = Arc::new(RecordingSource::default());
    let tracker = LocationTracker::new(source.clone());

    assert!(tracker.is_tracking());
    assert_eq!(tracker.position(), Position::default());
    assert_eq!(
        *source.calls.lock(),
        vec!["request_authorization", "start_updates"]
    );
}

#[test]
fn start_and_stop_are_idempotent() {
    use crate::testing::RecordingSource;

    let tracker = LocationTracker::new(Arc::new(RecordingSource::default()));

    tracker.stop_tracking();
    tracker.stop_tracking();
    assert!(!tracker.is_tracking());

    tracker.start_tracking();
    tracker.start_tracking();
    assert!(tracker.is_tracking());
}

#[test]
fn denied_authorization_disables_tracking_without_stopping_updates() {
    use crate::testing::RecordingSource;

    let source = Arc::new(RecordingSource::default());
    let tracker = LocationTracker::new(source.clone());
    source.calls.lock().clear();

    tracker.handle_event(LocationEvent::AuthorizationChanged(
        AuthorizationStatus::Denied,
    ));

    assert!(!tracker.is_tracking());
    assert!(source.calls.lock().is_empty());

    tracker.handle_event(LocationEvent::AuthorizationChanged(
        AuthorizationStatus::AuthorizedWhenInUse,
    ));

    assert!(tracker.is_tracking());
    assert_eq!(*source.calls.lock(), vec!["start_updates"]);
}

#[test]
fn location_update_keeps_only_the_last_fix() {
    use crate::entities::Coordinates;
    use crate::testing::RecordingSource;
    use parking_lot::Mutex;

    let tracker = LocationTracker::new(Arc::new(RecordingSource::default()));
    let notified = Arc::new(Mutex::new(vec![]));

    {
        let notified = notified.clone();
        tracker.subscribe_position(move |position: &Position| {
            notified.lock().push(position.coordinates)
        });
    }

    tracker.handle_event(LocationEvent::LocationsUpdated(vec![
        Position::new(Coordinates::new(43.0, -79.0)),
        Position::new(Coordinates::new(43.1, -79.1)),
    ]));
    tracker.handle_event(LocationEvent::LocationsUpdated(vec![]));

    assert_eq!(tracker.position().coordinates, Coordinates::new(43.1, -79.1));
    assert_eq!(*notified.lock(), vec![Coordinates::new(43.1, -79.1)]);
}

#[test]
fn denied_authorization_freezes_position() {
    use crate::entities::Coordinates;
    use crate::testing::RecordingSource;

    let tracker = LocationTracker::new(Arc::new(RecordingSource::default()));
    let fix = Position::new(Coordinates::new(45.5, -73.6));

    tracker.handle_event(LocationEvent::LocationsUpdated(vec![fix.clone()]));
    tracker.handle_event(LocationEvent::AuthorizationChanged(
        AuthorizationStatus::Denied,
    ));

    assert!(!tracker.is_tracking());
    assert_eq!(tracker.position(), fix);
}

#[test]
fn run_drains_the_event_channel() {
    use crate::entities::Coordinates;
    use crate::testing::RecordingSource;
    use tokio_test::block_on;

    let tracker = LocationTracker::new(Arc::new(RecordingSource::default()));
    let (tx, rx) = async_channel::unbounded();

    block_on(async {
        tx.send(LocationEvent::LocationsUpdated(vec![Position::new(
            Coordinates::new(1.0, 2.0),
        )]))
        .await
        .unwrap();
        tx.send(LocationEvent::AuthorizationChanged(
            AuthorizationStatus::Denied,
        ))
        .await
        .unwrap();
        drop(tx);

        tracker.run(rx).await;
    });

    assert_eq!(tracker.position().coordinates, Coordinates::new(1.0, 2.0));
    assert!(!tracker.is_tracking());
}
