//! HTTP transport and command-line surface for the study planner.

pub mod api;
pub mod maintenance;
pub mod config;
pub mod state;

pub use api::router;
pub use state::AppState;
