//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by audience.

pub mod admin;
pub mod events;
pub mod health;

pub use health::{health_check, readiness_check};
