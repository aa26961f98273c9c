use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Position, RouteOption, TransportMode};
use crate::error::Error;
use crate::presenter::{DrawInstruction, SharedSurface};
use crate::tracker::LocationEvent;

#[async_trait]
pub trait RouteAPI {
    async fn fetch_routes(
        &self,
        from: String,
        to: String,
        mode: TransportMode,
    ) -> Vec<RouteOption>;
    fn routes(&self) -> Vec<RouteOption>;
    fn select_route(&self, id: Uuid) -> Result<RouteOption, Error>;
    fn selected_route(&self) -> Option<RouteOption>;
}

pub trait LocationAPI {
    fn start_tracking(&self);
    fn stop_tracking(&self);
    fn handle_location_event(&self, event: LocationEvent);
    fn position(&self) -> Position;
    fn is_tracking(&self) -> bool;
}

pub trait MapAPI {
    fn render(&self) -> Vec<DrawInstruction>;
    fn attach_surface(&self, surface: SharedSurface);
}

pub trait API: RouteAPI + LocationAPI + MapAPI {}
