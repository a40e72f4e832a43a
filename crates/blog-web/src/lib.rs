//! # blog-web
//!
//! Server-rendered blog built with Axum and minijinja.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
