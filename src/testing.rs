use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

use crate::entities::{Coordinates, GeocodedPoint, RouteOption, TransportMode};
use crate::error::{directions_error, geocode_error, Error};
use crate::external::{DirectionsService, GeocodingService};
use crate::tracker::LocationSource;

#[derive(Default)]
pub struct RecordingSource {
    pub calls: Mutex<Vec<&'static str>>,
}

impl LocationSource for RecordingSource {
    fn request_authorization(&self) {
        self.calls.lock().push("request_authorization");
    }

    fn start_updates(&self) {
        self.calls.lock().push("start_updates");
    }

    fn stop_updates(&self) {
        self.calls.lock().push("stop_updates");
    }
}

#[derive(Default)]
pub struct FakeMaps {
    places: HashMap<String, (GeocodedPoint, Duration)>,
    routes: HashMap<String, Vec<RouteOption>>,
    pub log: Mutex<Vec<String>>,
}

impl FakeMaps {
    pub fn with_place(mut self, address: &str, coordinates: Coordinates, delay: Duration) -> Self {
        let point = GeocodedPoint::new(address.into(), address.into(), coordinates);
        self.places.insert(address.into(), (point, delay));
        self
    }

    pub fn with_routes(mut self, address: &str, routes: Vec<RouteOption>) -> Self {
        self.routes.insert(address.into(), routes);
        self
    }

    pub fn directions_calls(&self) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|entry| entry.starts_with("directions"))
            .count()
    }

    pub fn position_of(&self, entry: &str) -> Option<usize> {
        self.log.lock().iter().position(|e| e == entry)
    }
}

#[async_trait]
impl GeocodingService for FakeMaps {
    async fn geocode(&self, address: &str) -> Result<GeocodedPoint, Error> {
        self.log.lock().push(format!("geocode:start:{}", address));

        let result = match self.places.get(address) {
            Some((point, delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(point.clone())
            }
            None => Err(geocode_error()),
        };

        self.log.lock().push(format!("geocode:done:{}", address));

        result
    }
}

#[async_trait]
impl DirectionsService for FakeMaps {
    async fn directions(
        &self,
        origin: &GeocodedPoint,
        destination: &GeocodedPoint,
        mode: TransportMode,
    ) -> Result<Vec<RouteOption>, Error> {
        self.log.lock().push(format!(
            "directions:{}:{}:{}",
            origin.place_id,
            destination.place_id,
            mode.name()
        ));

        self.routes
            .get(&origin.place_id)
            .cloned()
            .ok_or_else(|| directions_error())
    }
}

pub fn route(name: &str, path: Vec<Coordinates>) -> RouteOption {
    RouteOption::new(name.into(), 10_000.0, 600.0, path)
}
