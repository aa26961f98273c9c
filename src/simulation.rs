use async_channel::Sender;
use rand_distr::{Distribution, Normal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::entities::{Coordinates, Position};
use crate::tracker::{AuthorizationStatus, LocationEvent, LocationSource};

// roughly 50m of GPS noise
const JITTER_DEGREES: f64 = 0.00045;

#[derive(Debug, Default)]
pub struct SimulatedLocationSource {
    active: AtomicBool,
}

impl SimulatedLocationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl LocationSource for SimulatedLocationSource {
    fn request_authorization(&self) {}

    fn start_updates(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    fn stop_updates(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

pub fn sample_position(center: Coordinates, noise: &Normal<f64>) -> Position {
    let mut rng = rand::thread_rng();

    Position::new(Coordinates::new(
        center.lat + noise.sample(&mut rng),
        center.lng + noise.sample(&mut rng),
    ))
}

/// Sends a fix every `interval` while `source` is active, until the receiver is gone.
#[tracing::instrument(skip(source, events))]
pub async fn drive(
    source: Arc<SimulatedLocationSource>,
    center: Coordinates,
    interval: Duration,
    events: Sender<LocationEvent>,
) {
    let noise = match Normal::new(0.0, JITTER_DEGREES) {
        Ok(noise) => noise,
        Err(err) => {
            tracing::error!("invalid jitter distribution: {}", err);
            return;
        }
    };

    if events
        .send(LocationEvent::AuthorizationChanged(
            AuthorizationStatus::AuthorizedWhenInUse,
        ))
        .await
        .is_err()
    {
        return;
    }

    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        if !source.is_active() {
            continue;
        }

        let position = sample_position(center, &noise);
        if events
            .send(LocationEvent::LocationsUpdated(vec![position]))
            .await
            .is_err()
        {
            tracing::info!("location feed stopped");
            return;
        }
    }
}

#[test]
fn simulated_source_follows_start_and_stop() {
    let source = SimulatedLocationSource::new();
    assert!(!source.is_active());

    source.start_updates();
    assert!(source.is_active());

    source.stop_updates();
    assert!(!source.is_active());
}

#[test]
fn sampled_positions_stay_near_center() {
    let center = Coordinates::new(43.6532, -79.3832);
    let noise = Normal::new(0.0, JITTER_DEGREES).unwrap();

    for _ in 0..100 {
        let position = sample_position(center, &noise);
        assert!((position.coordinates.lat - center.lat).abs() < 0.01);
        assert!((position.coordinates.lng - center.lng).abs() < 0.01);
    }
}

#[test]
fn drive_feeds_the_tracker() {
    use crate::tracker::LocationTracker;
    use tokio_test::block_on;

    let source = Arc::new(SimulatedLocationSource::new());
    let tracker = LocationTracker::new(source.clone());
    let center = Coordinates::new(45.5017, -73.5673);
    let (tx, rx) = async_channel::unbounded();

    block_on(async {
        let feed = tokio::spawn(drive(source.clone(), center, Duration::from_millis(1), tx));

        // authorization grant plus two fixes
        for _ in 0..3 {
            let event = rx.recv().await.unwrap();
            tracker.handle_event(event);
        }

        drop(rx);
        feed.await.unwrap();
    });

    assert!(tracker.is_tracking());
    assert!((tracker.position().coordinates.lat - center.lat).abs() < 0.01);
}
