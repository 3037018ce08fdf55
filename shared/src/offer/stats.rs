//! Offer summary counters

use super::status::OfferStatus;
use serde::{Deserialize, Serialize};

/// Summary of an offer collection. Always computed, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfferStats {
    pub total: u32,
    #[serde(rename = "abiertas")]
    pub open: u32,
    #[serde(rename = "counter")]
    pub countered: u32,
    #[serde(rename = "aceptadas")]
    pub accepted: u32,
    #[serde(rename = "rechazadas")]
    pub rejected: u32,
    #[serde(rename = "expiradas")]
    pub expired: u32,
    /// Sum of `importe` across every status
    pub total_amount: f64,
    /// `total_amount / total`, 0 for an empty collection
    pub average_amount: f64,
    /// Whole percent of resolved offers that were accepted
    pub acceptance_rate: u32,
    /// Mean whole days from creation to resolution
    pub average_resolution_days: u32,
}

impl OfferStats {
    /// Count for a single status
    pub fn count(&self, status: OfferStatus) -> u32 {
        match status {
            OfferStatus::Open => self.open,
            OfferStatus::Countered => self.countered,
            OfferStatus::Accepted => self.accepted,
            OfferStatus::Rejected => self.rejected,
            OfferStatus::Expired => self.expired,
        }
    }

    pub(crate) fn count_mut(&mut self, status: OfferStatus) -> &mut u32 {
        match status {
            OfferStatus::Open => &mut self.open,
            OfferStatus::Countered => &mut self.countered,
            OfferStatus::Accepted => &mut self.accepted,
            OfferStatus::Rejected => &mut self.rejected,
            OfferStatus::Expired => &mut self.expired,
        }
    }

    /// Record one offer in the per-status counters and total
    pub fn record(&mut self, status: OfferStatus) {
        self.total += 1;
        *self.count_mut(status) += 1;
    }

    /// Offers counted in the acceptance-rate denominator
    pub fn resolved(&self) -> u32 {
        self.accepted + self.rejected + self.expired
    }
}
