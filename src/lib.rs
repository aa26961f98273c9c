pub mod api;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod observable;
pub mod presenter;
pub mod server;
pub mod simulation;
pub mod tracker;

#[cfg(test)]
mod testing;
