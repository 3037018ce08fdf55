//! Shared types for the offer desk
//!
//! Domain types for offer negotiation (offers, counter-offers, status graph,
//! derived events and statistics), the unified error system and small
//! utilities used by every crate in the workspace.

pub mod error;
pub mod offer;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode, FieldError};
pub use serde::{Deserialize, Serialize};
