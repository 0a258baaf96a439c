pub mod alerts;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod events;
pub mod geo;
pub mod model;
pub mod sim;
pub mod state;
pub mod timeline;
