pub mod app;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod tenant;

#[cfg(test)]
pub mod testing;

pub use app::app;
pub use state::AppState;
