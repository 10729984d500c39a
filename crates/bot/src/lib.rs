pub mod config;
pub mod error;
pub mod handlers;
pub mod poller;
pub mod render;
pub mod routes;
pub mod state;
