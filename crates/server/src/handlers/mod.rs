//! # Route Handlers
//!
//! Axum handlers for the climate assistant server, split by concern.

pub mod general;
pub mod sessions;

pub use general::*;
pub use sessions::*;

pub use crate::{errors::AppError, state::AppState};
