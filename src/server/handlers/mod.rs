pub mod location;
pub mod map;
pub mod routes;
