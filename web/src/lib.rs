//! Axum HTTP surface for Volunteer Hub.
//!
//! Handlers are thin: parse the request, call
//! [`VolunteerHub`](volunteer_hub_core::VolunteerHub), map the result. All
//! invariants live in the core crate.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract** path ID, JSON body and (for admin routes) the bearer token
//! 3. **Call** the service
//! 4. **Map** `HubError` to a status through [`AppError`]
//! 5. **Notify** after a committed signup, on a detached task
//!
//! # Example
//!
//! ```ignore
//! use volunteer_hub_web::{AppState, build_router};
//!
//! let state = AppState::new(hub, notifier, "secret");
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, build_router(state)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;
pub mod views;

pub use error::AppError;
pub use extractors::{ApiJson, EventPath, RequireAdmin};
pub use router::build_router;
pub use state::AppState;
pub use views::{EventResponse, EventView, MessageResponse};

