//! Offer negotiation engine
//!
//! Pure functions over a caller-owned snapshot of offers:
//!
//! - [`validator`] - field rules, status graph checks, sanitizing
//! - [`filter`] / [`sort`] - derived list views
//! - [`stats`] - summary counters
//! - [`timeline`] - event projection
//! - [`actions`] - create / edit / transition / counter-offer / bulk

pub mod actions;
pub mod filter;
pub mod money;
pub mod sort;
pub mod stats;
pub mod timeline;
pub mod validator;

pub use actions::{
    BulkOutcome, BulkSkip, OfferError, OfferResult, add_counter_offer, bulk_transition,
    create_offer, expire_overdue, merge_updates, transition_offer, update_offer,
};
pub use filter::{OfferFilter, filter_offers};
pub use sort::{collate, sort_from_query, sort_offers};
pub use stats::compute_stats;
pub use timeline::derive_timeline;
pub use validator::{
    TransitionError, sanitize_counter_offer, sanitize_offer, validate_counter_offer,
    validate_offer, validate_transition,
};

use shared::AppResult;
use shared::offer::{Offer, OfferQuery};

use crate::utils::BusinessCalendar;

/// Compile `query`, filter and sort in one call
pub fn build_view<'a>(
    offers: &'a [Offer],
    query: &OfferQuery,
    calendar: &BusinessCalendar,
) -> AppResult<Vec<&'a Offer>> {
    let filter = OfferFilter::try_from(query)?;
    let sort = sort_from_query(query)?;

    let mut view = filter_offers(offers, &filter, calendar);
    sort_offers(&mut view, sort);

    tracing::debug!(
        total = offers.len(),
        matched = view.len(),
        unconstrained = filter.is_unconstrained(),
        sort_by = sort.key.as_str(),
        direction = ?sort.direction,
        "Offer view built"
    );
    Ok(view)
}
