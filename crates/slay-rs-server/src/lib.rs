//! HTTP surface for the slay relay.
//!
//! Routes are thin: they validate input, call the upstream traits, and record
//! results in the shared gallery carried by [`AppState`].

mod app;
mod error;
mod response;
mod routes;
mod serve;
mod state;

pub use app::{build_router, cors_layer};
pub use error::{ApiError, ServerError};
pub use response::Envelope;
pub use serve::{serve, serve_with_shutdown, shutdown_signal};
pub use state::AppState;
