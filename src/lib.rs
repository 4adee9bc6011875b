// Library crate entry to allow integration tests to access internal modules
pub mod api;
pub mod app_state;
pub mod config;
pub mod conversion;
pub mod routes;
pub mod server;
pub mod store;
