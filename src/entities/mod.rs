mod coordinates;
mod place;
mod position;
mod region;
mod route;
mod transport;

pub use coordinates::Coordinates;
pub use place::GeocodedPoint;
pub use position::Position;
pub use region::{EdgePadding, MapRect, Region, Span};
pub use route::RouteOption;
pub use transport::TransportMode;
