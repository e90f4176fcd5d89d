//! Access gateway for the DMHCA academy CRM: sessions, role-based permission
//! checks and lead visibility in front of the CRM REST backend.

pub mod app;
pub mod backend;
pub mod common;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use app::build_router;
pub use config::{AppState, Config};
