//! Arena API
//!
//! HTTP surface for the Arena Exchange engine: axum router, handlers and the
//! single boundary layer translating domain errors into transport responses.

pub mod auth;
pub mod handlers;
pub mod router;
pub mod security;
pub mod state;

pub use auth::Identity;
pub use router::create_router;
pub use state::AppState;
