//! Offer mutations
//!
//! Every operation takes the current offer by reference and returns a new
//! value; the caller decides whether to commit it. All input goes through
//! the validator before anything is built, and `updatedAt` never moves
//! backwards.

use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;

use shared::offer::{
    AgentRef, ClientRef, CounterOffer, CounterOfferDraft, Offer, OfferAction, OfferDraft,
    OfferStatus, OfferUpdate, PropertyRef, can_perform_action,
};
use shared::{AppError, ErrorCode, FieldError};

use super::validator::{
    TransitionError, fields, sanitize_counter_offer, sanitize_offer, validate_counter_offer,
    validate_offer, validate_transition,
};
use crate::utils::BusinessCalendar;

/// Offer mutation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OfferError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Offer not found: {0}")]
    NotFound(String),

    #[error("Offer in status {0} cannot be edited")]
    NotEditable(OfferStatus),

    #[error("Offer in status {0} cannot receive a counter-offer")]
    CounterNotAllowed(OfferStatus),

    #[error("Moving to counter requires a counter-offer")]
    CounterWithoutTerms,
}

impl From<OfferError> for AppError {
    fn from(err: OfferError) -> Self {
        match err {
            OfferError::Validation(errors) => AppError::from_field_errors(&errors),
            OfferError::Transition(e) => {
                AppError::with_message(ErrorCode::OfferTransitionNotAllowed, e.to_string())
                    .with_detail("from", e.from.as_str())
                    .with_detail("to", e.to.as_str())
            }
            OfferError::NotFound(id) => {
                AppError::with_message(ErrorCode::OfferNotFound, format!("Offer not found: {}", id))
                    .with_detail("id", id)
            }
            e @ OfferError::NotEditable(status) => {
                AppError::with_message(ErrorCode::OfferNotEditable, e.to_string())
                    .with_detail("estado", status.as_str())
            }
            e @ OfferError::CounterNotAllowed(status) => {
                AppError::with_message(ErrorCode::CounterOfferNotAllowed, e.to_string())
                    .with_detail("estado", status.as_str())
            }
            e @ OfferError::CounterWithoutTerms => {
                AppError::with_message(ErrorCode::CounterOfferNotAllowed, e.to_string())
            }
        }
    }
}

pub type OfferResult<T> = Result<T, OfferError>;

/// Validated terms pulled out of a sanitized draft
struct Terms {
    client: ClientRef,
    property: PropertyRef,
    agent: AgentRef,
    importe: f64,
    condiciones: String,
    notas: Option<String>,
    vence_el: NaiveDate,
}

impl Terms {
    /// Unpack a draft that already passed validation
    fn from_draft(
        draft: OfferDraft,
        default_agent: &AgentRef,
        calendar: &BusinessCalendar,
    ) -> OfferResult<Self> {
        let vence_raw = required(draft.vence_el, fields::VENCE_EL)?;
        let vence_el = calendar.parse_input_date(&vence_raw).map_err(|e| {
            OfferError::Validation(vec![FieldError::new(fields::VENCE_EL, e.code, e.message)])
        })?;
        Ok(Self {
            client: required(draft.client, fields::CLIENT_ID)?,
            property: required(draft.property, fields::PROPERTY_ID)?,
            agent: draft
                .agent
                .filter(|a| !a.id.is_empty())
                .unwrap_or_else(|| default_agent.clone()),
            importe: required(draft.importe, fields::IMPORTE)?,
            condiciones: required(draft.condiciones, fields::CONDICIONES)?,
            notas: draft.notas,
            vence_el,
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> OfferResult<T> {
    value.ok_or_else(|| OfferError::Validation(vec![FieldError::required(field)]))
}

/// Build a new `abierta` offer from form input
///
/// When the draft names no agent the operator is assigned.
pub fn create_offer(
    draft: &OfferDraft,
    operator: &AgentRef,
    calendar: &BusinessCalendar,
    now: i64,
    id: String,
) -> OfferResult<Offer> {
    let clean = sanitize_offer(draft);
    let errors = validate_offer(&clean, calendar);
    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "Offer draft rejected");
        return Err(OfferError::Validation(errors));
    }

    let terms = Terms::from_draft(clean, operator, calendar)?;
    tracing::debug!(offer_id = %id, importe = terms.importe, "Offer created");

    Ok(Offer {
        id,
        client: terms.client,
        agent: terms.agent,
        property: terms.property,
        importe: terms.importe,
        condiciones: terms.condiciones,
        notas: terms.notas,
        estado: OfferStatus::Open,
        vence_el: terms.vence_el,
        created_at: now,
        updated_at: now,
        counter_offers: Vec::new(),
    })
}

/// Edit the terms of an `abierta` or `counter` offer
///
/// Fields absent from `update` keep their current value. An unchanged
/// `venceEl` is not re-checked against today, so an overdue offer can still
/// have its conditions corrected.
pub fn update_offer(
    offer: &Offer,
    update: &OfferUpdate,
    calendar: &BusinessCalendar,
    now: i64,
) -> OfferResult<Offer> {
    if !can_perform_action(offer.estado, OfferAction::Edit) {
        return Err(OfferError::NotEditable(offer.estado));
    }

    let merged = OfferDraft {
        client: Some(offer.client.clone()),
        property: Some(offer.property.clone()),
        agent: update.agent.clone().or_else(|| Some(offer.agent.clone())),
        importe: update.importe.or(Some(offer.importe)),
        condiciones: update
            .condiciones
            .clone()
            .or_else(|| Some(offer.condiciones.clone())),
        notas: update.notas.clone().or_else(|| offer.notas.clone()),
        vence_el: update
            .vence_el
            .clone()
            .or_else(|| Some(offer.vence_el.to_string())),
    };

    let clean = sanitize_offer(&merged);
    let mut errors = validate_offer(&clean, calendar);
    if update.vence_el.is_none() {
        errors.retain(|e| e.field != fields::VENCE_EL);
    }
    if !errors.is_empty() {
        return Err(OfferError::Validation(errors));
    }

    let terms = Terms::from_draft(clean, &offer.agent, calendar)?;
    Ok(Offer {
        agent: terms.agent,
        importe: terms.importe,
        condiciones: terms.condiciones,
        notas: terms.notas,
        vence_el: terms.vence_el,
        updated_at: now.max(offer.updated_at),
        ..offer.clone()
    })
}

/// Move an offer to `target` if the status graph allows it
///
/// `counter` is only reachable through [`add_counter_offer`], which records
/// the terms that justify it.
pub fn transition_offer(offer: &Offer, target: OfferStatus, now: i64) -> OfferResult<Offer> {
    if target == OfferStatus::Countered {
        tracing::warn!(offer_id = %offer.id, "Counter status requested without a counter-offer");
        return Err(OfferError::CounterWithoutTerms);
    }
    if let Err(e) = validate_transition(offer.estado, target) {
        tracing::warn!(offer_id = %offer.id, from = %e.from, to = %e.to, "Transition rejected");
        return Err(e.into());
    }

    Ok(Offer {
        estado: target,
        updated_at: now.max(offer.updated_at),
        ..offer.clone()
    })
}

/// Record a counter-offer and move the offer to `counter`
pub fn add_counter_offer(
    offer: &Offer,
    draft: &CounterOfferDraft,
    author: &AgentRef,
    now: i64,
    id: String,
) -> OfferResult<Offer> {
    if validate_transition(offer.estado, OfferStatus::Countered).is_err() {
        return Err(OfferError::CounterNotAllowed(offer.estado));
    }

    let clean = sanitize_counter_offer(draft);
    let errors = validate_counter_offer(&clean);
    if !errors.is_empty() {
        return Err(OfferError::Validation(errors));
    }

    let counter = CounterOffer {
        id,
        offer_id: offer.id.clone(),
        importe: required(clean.importe, fields::IMPORTE)?,
        condiciones: required(clean.condiciones, fields::CONDICIONES)?,
        notas: clean.notas,
        author_id: author.id.clone(),
        author_name: author.name.clone(),
        created_at: now.max(offer.updated_at),
    };
    tracing::debug!(
        offer_id = %offer.id,
        counter_offer_id = %counter.id,
        importe = counter.importe,
        "Counter-offer recorded"
    );

    let mut next = offer.clone();
    next.counter_offers.push(counter);
    next.estado = OfferStatus::Countered;
    next.updated_at = now.max(offer.updated_at);
    Ok(next)
}

/// `expirada` copies of every active offer whose `venceEl` is before today
pub fn expire_overdue(offers: &[Offer], calendar: &BusinessCalendar, now: i64) -> Vec<Offer> {
    let expired: Vec<Offer> = offers
        .iter()
        .filter(|o| o.estado.is_active() && o.vence_el < calendar.today())
        .filter_map(|o| transition_offer(o, OfferStatus::Expired, now).ok())
        .collect();
    if !expired.is_empty() {
        tracing::info!(count = expired.len(), today = %calendar.today(), "Overdue offers expired");
    }
    expired
}

/// Id that a bulk action could not apply to
#[derive(Debug, Clone, PartialEq)]
pub struct BulkSkip {
    pub id: String,
    pub reason: OfferError,
}

/// Result of a bulk status change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkOutcome {
    pub updated: Vec<Offer>,
    pub skipped: Vec<BulkSkip>,
}

/// Apply the same transition to several offers
///
/// Each id is handled on its own: unknown ids and disallowed transitions
/// end up in `skipped` and never abort the batch. Repeated ids are applied
/// once.
pub fn bulk_transition(
    offers: &[Offer],
    ids: &[String],
    target: OfferStatus,
    now: i64,
) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    let mut seen = HashSet::new();

    for id in ids {
        if !seen.insert(id.as_str()) {
            continue;
        }
        let result = offers
            .iter()
            .find(|o| o.id == *id)
            .ok_or_else(|| OfferError::NotFound(id.clone()))
            .and_then(|o| transition_offer(o, target, now));
        match result {
            Ok(offer) => outcome.updated.push(offer),
            Err(reason) => {
                tracing::warn!(offer_id = %id, %reason, "Bulk action skipped offer");
                outcome.skipped.push(BulkSkip {
                    id: id.clone(),
                    reason,
                });
            }
        }
    }

    tracing::debug!(
        to = %target,
        updated = outcome.updated.len(),
        skipped = outcome.skipped.len(),
        "Bulk transition finished"
    );
    outcome
}

/// Replace offers by id with their updated copies, keeping collection order
pub fn merge_updates(offers: &[Offer], updated: &[Offer]) -> Vec<Offer> {
    offers
        .iter()
        .map(|o| {
            updated
                .iter()
                .find(|u| u.id == o.id)
                .unwrap_or(o)
                .clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::test_support::*;
    use chrono::Duration;

    const NOW: i64 = 1_792_400_000_000;

    fn operator() -> AgentRef {
        AgentRef {
            id: "a-7".to_string(),
            name: "Operadora".to_string(),
        }
    }

    fn draft() -> OfferDraft {
        OfferDraft {
            client: Some(ClientRef {
                id: "c-1".to_string(),
                name: "Lucía Pérez".to_string(),
                email: Some(" lucia@example.com ".to_string()),
                phone: None,
            }),
            property: Some(PropertyRef {
                id: "p-1".to_string(),
                title: "Piso en Ruzafa".to_string(),
                address: "Calle Sueca 3, Valencia".to_string(),
                list_price: Some(320_000.0),
            }),
            agent: None,
            importe: Some(300_000.004),
            condiciones: Some("  Pago al contado  ".to_string()),
            notas: Some("  ".to_string()),
            vence_el: Some((calendar().today() + Duration::days(30)).to_string()),
        }
    }

    fn counter_draft(importe: f64) -> CounterOfferDraft {
        CounterOfferDraft {
            importe: Some(importe),
            condiciones: Some("Entrega de llaves en enero".to_string()),
            notas: None,
        }
    }

    #[test]
    fn test_create_offer_sanitizes_and_defaults_agent() {
        let offer = create_offer(&draft(), &operator(), &calendar(), NOW, "o-1".to_string()).unwrap();
        assert_eq!(offer.estado, OfferStatus::Open);
        assert_eq!(offer.importe, 300_000.0);
        assert_eq!(offer.condiciones, "Pago al contado");
        assert_eq!(offer.notas, None);
        assert_eq!(offer.client.email.as_deref(), Some("lucia@example.com"));
        assert_eq!(offer.agent, operator());
        assert_eq!(offer.created_at, NOW);
        assert_eq!(offer.updated_at, NOW);
        assert_eq!(offer.vence_el, date(2026, 11, 18));
    }

    #[test]
    fn test_create_offer_reports_all_errors() {
        let bad = OfferDraft {
            importe: Some(-1.0),
            condiciones: Some("corto".to_string()),
            ..draft()
        };
        let err = create_offer(&bad, &operator(), &calendar(), NOW, "o-1".to_string()).unwrap_err();
        match err {
            OfferError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_update_offer_merges_terms() {
        let offer = offer("o1", OfferStatus::Countered, 1000.0);
        let update = OfferUpdate {
            importe: Some(1200.0),
            notas: Some("Revisar con el banco".to_string()),
            ..OfferUpdate::default()
        };
        let next = update_offer(&offer, &update, &calendar(), offer.updated_at + 10).unwrap();
        assert_eq!(next.importe, 1200.0);
        assert_eq!(next.condiciones, offer.condiciones);
        assert_eq!(next.notas.as_deref(), Some("Revisar con el banco"));
        assert_eq!(next.estado, OfferStatus::Countered);
        assert_eq!(next.updated_at, offer.updated_at + 10);

        let cleared = update_offer(
            &next,
            &OfferUpdate {
                notas: Some(String::new()),
                ..OfferUpdate::default()
            },
            &calendar(),
            NOW,
        )
        .unwrap();
        assert_eq!(cleared.notas, None);
    }

    #[test]
    fn test_update_offer_keeps_overdue_date_unchecked() {
        let mut offer = offer("o1", OfferStatus::Open, 1000.0);
        offer.vence_el = date(2026, 10, 1);
        let update = OfferUpdate {
            condiciones: Some("Nuevas condiciones de pago".to_string()),
            ..OfferUpdate::default()
        };
        assert!(update_offer(&offer, &update, &calendar(), NOW).is_ok());

        let moved = OfferUpdate {
            vence_el: Some("2026-10-02".to_string()),
            ..OfferUpdate::default()
        };
        assert!(matches!(
            update_offer(&offer, &moved, &calendar(), NOW),
            Err(OfferError::Validation(_))
        ));
    }

    #[test]
    fn test_update_rejected_on_resolved_offers() {
        for status in [OfferStatus::Accepted, OfferStatus::Rejected, OfferStatus::Expired] {
            let o = offer("o1", status, 1000.0);
            assert_eq!(
                update_offer(&o, &OfferUpdate::default(), &calendar(), NOW),
                Err(OfferError::NotEditable(status))
            );
        }
    }

    #[test]
    fn test_transition_offer() {
        let o = offer("o1", OfferStatus::Open, 1000.0);
        let accepted = transition_offer(&o, OfferStatus::Accepted, NOW).unwrap();
        assert_eq!(accepted.estado, OfferStatus::Accepted);
        assert_eq!(o.estado, OfferStatus::Open);

        let err = transition_offer(&accepted, OfferStatus::Rejected, NOW).unwrap_err();
        assert_eq!(
            err,
            OfferError::Transition(TransitionError {
                from: OfferStatus::Accepted,
                to: OfferStatus::Rejected,
            })
        );
    }

    #[test]
    fn test_updated_at_never_moves_backwards() {
        let mut o = offer("o1", OfferStatus::Open, 1000.0);
        o.updated_at = NOW;
        let next = transition_offer(&o, OfferStatus::Rejected, NOW - 1_000).unwrap();
        assert_eq!(next.updated_at, NOW);
    }

    #[test]
    fn test_counter_offer_appends_and_moves_to_counter() {
        let o = offer("o1", OfferStatus::Open, 1000.0);
        let once = add_counter_offer(&o, &counter_draft(1100.0), &operator(), NOW, "co-1".to_string())
            .unwrap();
        let twice =
            add_counter_offer(&once, &counter_draft(1050.0), &operator(), NOW + 1, "co-2".to_string())
                .unwrap();
        assert_eq!(twice.estado, OfferStatus::Countered);
        assert_eq!(twice.counter_offers.len(), 2);
        assert_eq!(twice.counter_offers[0], once.counter_offers[0]);
        assert_eq!(twice.counter_offers[1].author_name, "Operadora");
        assert_eq!(twice.current_amount(), 1050.0);
        // original terms stay on the offer
        assert_eq!(twice.importe, 1000.0);
    }

    #[test]
    fn test_counter_status_requires_counter_offer() {
        let o = offer("o1", OfferStatus::Open, 1000.0);
        assert_eq!(
            transition_offer(&o, OfferStatus::Countered, NOW),
            Err(OfferError::CounterWithoutTerms)
        );

        let outcome = bulk_transition(&[o], &["o1".to_string()], OfferStatus::Countered, NOW);
        assert!(outcome.updated.is_empty());
        assert_eq!(outcome.skipped[0].reason, OfferError::CounterWithoutTerms);
    }

    #[test]
    fn test_counter_offer_never_predates_last_change() {
        let mut o = offer("o1", OfferStatus::Open, 1000.0);
        o.updated_at = NOW;
        let next =
            add_counter_offer(&o, &counter_draft(1100.0), &operator(), NOW - 5_000, "co-1".to_string())
                .unwrap();
        assert_eq!(next.counter_offers[0].created_at, NOW);
        assert_eq!(next.updated_at, NOW);
    }

    #[test]
    fn test_counter_offer_gating_and_validation() {
        let accepted = offer("o1", OfferStatus::Accepted, 1000.0);
        assert_eq!(
            add_counter_offer(&accepted, &counter_draft(1.0), &operator(), NOW, "co".to_string()),
            Err(OfferError::CounterNotAllowed(OfferStatus::Accepted))
        );

        let open = offer("o2", OfferStatus::Open, 1000.0);
        let result = add_counter_offer(&open, &counter_draft(0.0), &operator(), NOW, "co".to_string());
        assert!(matches!(result, Err(OfferError::Validation(ref e)) if e[0].field == "importe"));
    }

    #[test]
    fn test_expire_overdue() {
        let mut overdue = offer("o1", OfferStatus::Countered, 1000.0);
        overdue.vence_el = date(2026, 10, 18);
        let mut due_today = offer("o2", OfferStatus::Open, 1000.0);
        due_today.vence_el = date(2026, 10, 19);
        let mut closed = offer("o3", OfferStatus::Accepted, 1000.0);
        closed.vence_el = date(2026, 9, 1);
        let offers = vec![overdue, due_today, closed];

        let expired = expire_overdue(&offers, &calendar(), NOW);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, "o1");
        assert_eq!(expired[0].estado, OfferStatus::Expired);
    }

    #[test]
    fn test_bulk_transition_reports_per_id() {
        let offers = vec![
            offer("o1", OfferStatus::Open, 1000.0),
            offer("o2", OfferStatus::Accepted, 1000.0),
            offer("o3", OfferStatus::Countered, 1000.0),
        ];
        let ids: Vec<String> = ["o1", "o2", "missing", "o3", "o1"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let outcome = bulk_transition(&offers, &ids, OfferStatus::Rejected, NOW);
        let updated: Vec<&str> = outcome.updated.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(updated, vec!["o1", "o3"]);
        assert_eq!(outcome.skipped.len(), 2);
        assert!(matches!(outcome.skipped[0].reason, OfferError::Transition(_)));
        assert_eq!(
            outcome.skipped[1].reason,
            OfferError::NotFound("missing".to_string())
        );
    }

    #[test]
    fn test_merge_updates_keeps_order() {
        let offers = vec![
            offer("o1", OfferStatus::Open, 1.0),
            offer("o2", OfferStatus::Open, 2.0),
        ];
        let changed = transition_offer(&offers[1], OfferStatus::Accepted, NOW).unwrap();
        let merged = merge_updates(&offers, &[changed]);
        assert_eq!(merged[0], offers[0]);
        assert_eq!(merged[1].estado, OfferStatus::Accepted);
    }

    #[test]
    fn test_offer_error_into_app_error() {
        let err: AppError = OfferError::NotFound("o-9".to_string()).into();
        assert_eq!(err.code, ErrorCode::OfferNotFound);

        let err: AppError = OfferError::Validation(vec![FieldError::required("importe")]).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "importe: importe is required");

        let err: AppError = OfferError::NotEditable(OfferStatus::Accepted).into();
        assert_eq!(err.code, ErrorCode::OfferNotEditable);
        assert_eq!(err.message, "Offer in status aceptada cannot be edited");

        let err: AppError = OfferError::from(TransitionError {
            from: OfferStatus::Rejected,
            to: OfferStatus::Open,
        })
        .into();
        assert_eq!(err.code, ErrorCode::OfferTransitionNotAllowed);

        let err: AppError = OfferError::CounterWithoutTerms.into();
        assert_eq!(err.code, ErrorCode::CounterOfferNotAllowed);
    }
}
