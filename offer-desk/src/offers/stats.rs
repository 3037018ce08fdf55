//! Offer statistics aggregator

use rust_decimal::Decimal;

use shared::offer::{Offer, OfferStats};
use shared::util::MILLIS_PER_DAY;

use super::money::{round_whole, to_decimal, to_f64};

/// Reduce a collection (filtered or not) into summary counters in one pass
///
/// - `acceptanceRate` and `averageResolutionDays` only look at resolved
///   offers (`aceptada`, `rechazada`, `expirada`) and are 0 when there are
///   none.
/// - `averageAmount` is 0 for an empty collection.
pub fn compute_stats<'a, I>(offers: I) -> OfferStats
where
    I: IntoIterator<Item = &'a Offer>,
{
    let mut stats = OfferStats::default();
    let mut total_amount = Decimal::ZERO;
    let mut resolution_days_sum: i64 = 0;

    for offer in offers {
        stats.record(offer.estado);
        total_amount += to_decimal(offer.importe);
        if offer.estado.is_resolved() {
            resolution_days_sum = resolution_days_sum.saturating_add(resolution_days(offer));
        }
    }

    stats.total_amount = to_f64(total_amount);
    if stats.total > 0 {
        stats.average_amount = to_f64(total_amount / Decimal::from(stats.total));
    }

    let resolved = stats.resolved();
    if resolved > 0 {
        let resolved = Decimal::from(resolved);
        stats.acceptance_rate =
            round_whole(Decimal::from(stats.accepted) * Decimal::ONE_HUNDRED / resolved);
        stats.average_resolution_days =
            round_whole(Decimal::from(resolution_days_sum) / resolved);
    }

    stats
}

/// Whole days between creation and the last update, rounded up
///
/// Saturates instead of overflowing on out-of-range snapshot timestamps.
fn resolution_days(offer: &Offer) -> i64 {
    let elapsed = offer.updated_at.saturating_sub(offer.created_at).max(0);
    elapsed.saturating_add(MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}
