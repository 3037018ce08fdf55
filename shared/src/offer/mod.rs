//! Offer negotiation domain types
//!
//! - Records: offers and their counter-offers
//! - Status graph: allowed transitions and action gating
//! - Projections: timeline events and summary statistics
//! - Query: raw list filter/sort state

pub mod event;
pub mod query;
pub mod stats;
pub mod status;
pub mod types;

// Re-exports
pub use event::{EventPayload, OfferEvent, OfferEventType};
pub use query::{ExpirationBucket, OfferQuery, OfferSort, SortDirection, SortKey};
pub use stats::OfferStats;
pub use status::{OfferAction, OfferStatus, can_perform_action};
pub use types::*;
