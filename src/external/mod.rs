pub mod google_maps;
pub mod polyline;

use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{GeocodedPoint, RouteOption, TransportMode};
use crate::error::Error;

#[async_trait]
pub trait GeocodingService {
    async fn geocode(&self, address: &str) -> Result<GeocodedPoint, Error>;
}

#[async_trait]
pub trait DirectionsService {
    async fn directions(
        &self,
        origin: &GeocodedPoint,
        destination: &GeocodedPoint,
        mode: TransportMode,
    ) -> Result<Vec<RouteOption>, Error>;
}

pub type DynGeocodingService = Arc<dyn GeocodingService + Send + Sync>;
pub type DynDirectionsService = Arc<dyn DirectionsService + Send + Sync>;
