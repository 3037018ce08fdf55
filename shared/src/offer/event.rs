//! Offer timeline events - a projection regenerated from offer state

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Timeline entry for an offer
///
/// Never stored: the whole list is derived from the offer's status and
/// counter-offer history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferEvent {
    pub offer_id: String,
    /// Unix millis
    pub timestamp: i64,
    pub actor_id: String,
    /// Actor name snapshot
    pub actor_name: String,
    pub event_type: OfferEventType,
    /// Human-readable summary
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<EventPayload>,
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OfferEventType {
    Create,
    Counter,
    Accept,
    Reject,
    Expire,
    Update,
}

impl std::fmt::Display for OfferEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferEventType::Create => write!(f, "create"),
            OfferEventType::Counter => write!(f, "counter"),
            OfferEventType::Accept => write!(f, "accept"),
            OfferEventType::Reject => write!(f, "reject"),
            OfferEventType::Expire => write!(f, "expire"),
            OfferEventType::Update => write!(f, "update"),
        }
    }
}

/// Snapshot of the terms at the time of the event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    Terms {
        importe: f64,
        condiciones: String,
    },
    CounterOffer {
        counter_offer_id: String,
        importe: f64,
        condiciones: String,
    },
    Expiration {
        vence_el: NaiveDate,
    },
}
