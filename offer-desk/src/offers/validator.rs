//! Offer validator
//!
//! Side-effect-free checks shared by live form validation and the commit
//! path. Every check runs independently and all violations are returned;
//! nothing here panics or returns early on bad input.

use thiserror::Error;

use shared::offer::{
    AgentRef, ClientRef, CounterOfferDraft, OfferDraft, OfferStatus, PropertyRef,
};
use shared::{ErrorCode, FieldError};

use super::money::{MAX_IMPORTE, round_cents};
use crate::utils::BusinessCalendar;

/// Minimum trimmed length of `condiciones`
pub const MIN_CONDICIONES_LEN: usize = 10;
/// Maximum trimmed length of `condiciones`
pub const MAX_CONDICIONES_LEN: usize = 1000;
/// Maximum trimmed length of `notas`
pub const MAX_NOTAS_LEN: usize = 500;

/// Form field names used in [`FieldError::field`]
pub mod fields {
    pub const CLIENT_ID: &str = "clientId";
    pub const PROPERTY_ID: &str = "propertyId";
    pub const IMPORTE: &str = "importe";
    pub const CONDICIONES: &str = "condiciones";
    pub const NOTAS: &str = "notas";
    pub const VENCE_EL: &str = "venceEl";
}

/// Status change outside the allowed graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Transition from {from} to {to} is not allowed")]
pub struct TransitionError {
    pub from: OfferStatus,
    pub to: OfferStatus,
}

impl From<TransitionError> for FieldError {
    fn from(err: TransitionError) -> Self {
        FieldError::new("estado", ErrorCode::OfferTransitionNotAllowed, err.to_string())
    }
}

/// Validate a create/edit payload against `calendar.today()`
pub fn validate_offer(draft: &OfferDraft, calendar: &BusinessCalendar) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !draft.client.as_ref().is_some_and(|c| !c.id.trim().is_empty()) {
        errors.push(FieldError::required(fields::CLIENT_ID));
    }
    if !draft
        .property
        .as_ref()
        .is_some_and(|p| !p.id.trim().is_empty())
    {
        errors.push(FieldError::required(fields::PROPERTY_ID));
    }

    check_terms(
        draft.importe,
        draft.condiciones.as_deref(),
        draft.notas.as_deref(),
        &mut errors,
    );
    check_vence_el(draft.vence_el.as_deref(), calendar, &mut errors);

    errors
}

/// Validate a counter-offer payload. Client, property and dates come from
/// the owning offer.
pub fn validate_counter_offer(draft: &CounterOfferDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_terms(
        draft.importe,
        draft.condiciones.as_deref(),
        draft.notas.as_deref(),
        &mut errors,
    );
    errors
}

/// Check a status change against the transition graph
pub fn validate_transition(
    current: OfferStatus,
    target: OfferStatus,
) -> Result<(), TransitionError> {
    if current.can_transition_to(target) {
        Ok(())
    } else {
        Err(TransitionError {
            from: current,
            to: target,
        })
    }
}

/// Normalized copy of an offer draft: strings trimmed, blank notes dropped,
/// amount rounded to cents. Idempotent.
pub fn sanitize_offer(draft: &OfferDraft) -> OfferDraft {
    OfferDraft {
        client: draft.client.as_ref().map(|c| ClientRef {
            id: c.id.trim().to_string(),
            name: c.name.trim().to_string(),
            email: trim_optional(c.email.as_deref()),
            phone: trim_optional(c.phone.as_deref()),
        }),
        property: draft.property.as_ref().map(|p| PropertyRef {
            id: p.id.trim().to_string(),
            title: p.title.trim().to_string(),
            address: p.address.trim().to_string(),
            list_price: p.list_price,
        }),
        agent: draft.agent.as_ref().map(|a| AgentRef {
            id: a.id.trim().to_string(),
            name: a.name.trim().to_string(),
        }),
        importe: draft.importe.map(round_cents),
        condiciones: draft.condiciones.as_deref().map(|s| s.trim().to_string()),
        notas: trim_optional(draft.notas.as_deref()),
        vence_el: draft.vence_el.as_deref().map(|s| s.trim().to_string()),
    }
}

/// Normalized copy of a counter-offer draft
pub fn sanitize_counter_offer(draft: &CounterOfferDraft) -> CounterOfferDraft {
    CounterOfferDraft {
        importe: draft.importe.map(round_cents),
        condiciones: draft.condiciones.as_deref().map(|s| s.trim().to_string()),
        notas: trim_optional(draft.notas.as_deref()),
    }
}

fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn check_terms(
    importe: Option<f64>,
    condiciones: Option<&str>,
    notas: Option<&str>,
    errors: &mut Vec<FieldError>,
) {
    match importe {
        None => errors.push(FieldError::required(fields::IMPORTE)),
        Some(v) if !v.is_finite() || v <= 0.0 => errors.push(FieldError::new(
            fields::IMPORTE,
            ErrorCode::ValueOutOfRange,
            "importe must be greater than 0",
        )),
        Some(v) if v > MAX_IMPORTE => errors.push(FieldError::new(
            fields::IMPORTE,
            ErrorCode::ValueOutOfRange,
            format!("importe must not exceed {}", MAX_IMPORTE),
        )),
        Some(_) => {}
    }

    let condiciones_len = condiciones.map(|s| s.trim().chars().count()).unwrap_or(0);
    if condiciones_len == 0 {
        errors.push(FieldError::required(fields::CONDICIONES));
    } else if condiciones_len < MIN_CONDICIONES_LEN {
        errors.push(FieldError::new(
            fields::CONDICIONES,
            ErrorCode::ValueOutOfRange,
            format!(
                "condiciones must be at least {} characters",
                MIN_CONDICIONES_LEN
            ),
        ));
    } else if condiciones_len > MAX_CONDICIONES_LEN {
        errors.push(FieldError::new(
            fields::CONDICIONES,
            ErrorCode::ValueOutOfRange,
            format!(
                "condiciones must be at most {} characters",
                MAX_CONDICIONES_LEN
            ),
        ));
    }

    if let Some(notas) = notas
        && notas.trim().chars().count() > MAX_NOTAS_LEN
    {
        errors.push(FieldError::new(
            fields::NOTAS,
            ErrorCode::ValueOutOfRange,
            format!("notas must be at most {} characters", MAX_NOTAS_LEN),
        ));
    }
}

fn check_vence_el(raw: Option<&str>, calendar: &BusinessCalendar, errors: &mut Vec<FieldError>) {
    let raw = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw,
        None => {
            errors.push(FieldError::required(fields::VENCE_EL));
            return;
        }
    };

    let date = match calendar.parse_input_date(raw) {
        Ok(date) => date,
        Err(e) => {
            errors.push(FieldError::new(
                fields::VENCE_EL,
                ErrorCode::InvalidFormat,
                e.message,
            ));
            return;
        }
    };

    if date < calendar.today() {
        errors.push(FieldError::new(
            fields::VENCE_EL,
            ErrorCode::OfferExpirationOutOfRange,
            format!("venceEl {} is in the past (today is {})", date, calendar.today()),
        ));
    } else if date > calendar.max_expiration() {
        errors.push(FieldError::new(
            fields::VENCE_EL,
            ErrorCode::OfferExpirationOutOfRange,
            format!(
                "venceEl {} is more than one year ahead (latest {})",
                date,
                calendar.max_expiration()
            ),
        ));
    }
}
