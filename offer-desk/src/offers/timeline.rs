//! Offer timeline projection
//!
//! Events are regenerated from the offer on every call and never stored.
//! The projection is deterministic: the same offer always yields the same
//! list.

use shared::offer::{EventPayload, Offer, OfferEvent, OfferEventType, OfferStatus};

/// Derive the timeline of an offer, oldest first
///
/// `create` is always first. Counter-offers follow in recording order,
/// then an `update` for an active offer edited after its creation and its
/// last counter-offer, then the terminal event (`accept` / `reject` /
/// `expire`) at `updatedAt`.
pub fn derive_timeline(offer: &Offer) -> Vec<OfferEvent> {
    let mut events = vec![event(
        offer,
        offer.created_at,
        OfferEventType::Create,
        format!("Offer of {:.2} submitted by {}", offer.importe, offer.client.name),
        Some(EventPayload::Terms {
            importe: offer.importe,
            condiciones: offer.condiciones.clone(),
        }),
    )];

    let mut later = Vec::with_capacity(offer.counter_offers.len() + 1);

    for counter in &offer.counter_offers {
        later.push(OfferEvent {
            offer_id: offer.id.clone(),
            timestamp: counter.created_at.max(offer.created_at),
            actor_id: counter.author_id.clone(),
            actor_name: counter.author_name.clone(),
            event_type: OfferEventType::Counter,
            note: format!("Counter-offer of {:.2}", counter.importe),
            payload: Some(EventPayload::CounterOffer {
                counter_offer_id: counter.id.clone(),
                importe: counter.importe,
                condiciones: counter.condiciones.clone(),
            }),
        });
    }

    let last_activity = offer
        .counter_offers
        .iter()
        .map(|c| c.created_at)
        .fold(offer.created_at, i64::max);
    if offer.estado.is_active() && offer.updated_at > last_activity {
        later.push(event(
            offer,
            offer.updated_at,
            OfferEventType::Update,
            "Terms updated".to_string(),
            Some(EventPayload::Terms {
                importe: offer.importe,
                condiciones: offer.condiciones.clone(),
            }),
        ));
    }

    let terminal = match offer.estado {
        OfferStatus::Accepted => Some((
            OfferEventType::Accept,
            format!("Accepted at {:.2}", offer.current_amount()),
            None,
        )),
        OfferStatus::Rejected => Some((OfferEventType::Reject, "Rejected".to_string(), None)),
        OfferStatus::Expired => Some((
            OfferEventType::Expire,
            format!("Expired on {}", offer.vence_el),
            Some(EventPayload::Expiration {
                vence_el: offer.vence_el,
            }),
        )),
        OfferStatus::Open | OfferStatus::Countered => None,
    };
    if let Some((event_type, note, payload)) = terminal {
        later.push(event(
            offer,
            offer.updated_at.max(offer.created_at),
            event_type,
            note,
            payload,
        ));
    }

    // stable: equal timestamps keep the order pushed above
    later.sort_by_key(|e| e.timestamp);
    events.extend(later);
    events
}

/// Event attributed to the offer's agent
fn event(
    offer: &Offer,
    timestamp: i64,
    event_type: OfferEventType,
    note: String,
    payload: Option<EventPayload>,
) -> OfferEvent {
    OfferEvent {
        offer_id: offer.id.clone(),
        timestamp,
        actor_id: offer.agent.id.clone(),
        actor_name: offer.agent.name.clone(),
        event_type,
        note,
        payload,
    }
}
