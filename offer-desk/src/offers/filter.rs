//! Offer filter engine
//!
//! [`OfferFilter`] is the compiled, typed form of an [`OfferQuery`]. Matching
//! is a pure predicate: AND across dimensions, OR inside the free-text
//! haystack.

use chrono::NaiveDate;

use shared::offer::query::constraint;
use shared::offer::{ExpirationBucket, Offer, OfferQuery, OfferStatus};
use shared::{AppError, AppResult};

use crate::utils::BusinessCalendar;
use crate::utils::time::parse_date;

/// Typed filter; `None` means "no constraint"
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OfferFilter {
    /// Lowercased search needle
    pub text: Option<String>,
    pub property_id: Option<String>,
    pub client_id: Option<String>,
    pub agent_id: Option<String>,
    pub status: Option<OfferStatus>,
    /// Inclusive
    pub amount_min: Option<f64>,
    /// Inclusive
    pub amount_max: Option<f64>,
    /// Inclusive, compared with the business date of `createdAt`
    pub created_from: Option<NaiveDate>,
    /// Inclusive, compared with the business date of `createdAt`
    pub created_to: Option<NaiveDate>,
    pub expiration: ExpirationBucket,
}

impl OfferFilter {
    /// True when no dimension constrains the result
    pub fn is_unconstrained(&self) -> bool {
        *self == OfferFilter::default()
    }

    /// Whether `offer` satisfies every active dimension
    pub fn matches(&self, offer: &Offer, calendar: &BusinessCalendar) -> bool {
        if let Some(needle) = &self.text
            && !search_haystack(offer).contains(needle.as_str())
        {
            return false;
        }
        if let Some(id) = &self.property_id
            && offer.property.id != *id
        {
            return false;
        }
        if let Some(id) = &self.client_id
            && offer.client.id != *id
        {
            return false;
        }
        if let Some(id) = &self.agent_id
            && offer.agent.id != *id
        {
            return false;
        }
        if let Some(status) = self.status
            && offer.estado != status
        {
            return false;
        }
        if let Some(min) = self.amount_min
            && offer.importe < min
        {
            return false;
        }
        if let Some(max) = self.amount_max
            && offer.importe > max
        {
            return false;
        }
        if self.created_from.is_some() || self.created_to.is_some() {
            let created = calendar.date_of(offer.created_at);
            if self.created_from.is_some_and(|from| created < from) {
                return false;
            }
            if self.created_to.is_some_and(|to| created > to) {
                return false;
            }
        }
        self.expiration
            .contains(calendar.days_until(offer.vence_el))
    }
}

impl TryFrom<&OfferQuery> for OfferFilter {
    type Error = AppError;

    /// Compile raw query state. Malformed values are a caller bug and are
    /// reported as errors instead of being silently ignored.
    fn try_from(query: &OfferQuery) -> AppResult<Self> {
        let status = constraint(&query.status)
            .map(str::parse::<OfferStatus>)
            .transpose()?;
        let expiration = match constraint(&query.expiration_bucket) {
            None => ExpirationBucket::All,
            Some(raw) => ExpirationBucket::parse(raw).ok_or_else(|| {
                AppError::invalid_request(format!("Unknown expiration bucket: {}", raw))
                    .with_detail("expirationBucket", raw)
            })?,
        };

        Ok(Self {
            text: constraint(&query.text_query).map(str::to_lowercase),
            property_id: constraint(&query.property_id).map(str::to_string),
            client_id: constraint(&query.client_id).map(str::to_string),
            agent_id: constraint(&query.agent_id).map(str::to_string),
            status,
            amount_min: parse_amount("amountMin", constraint(&query.amount_min))?,
            amount_max: parse_amount("amountMax", constraint(&query.amount_max))?,
            created_from: constraint(&query.created_from).map(parse_date).transpose()?,
            created_to: constraint(&query.created_to).map(parse_date).transpose()?,
            expiration,
        })
    }
}

/// Keep the offers matching `filter`, in collection order
pub fn filter_offers<'a>(
    offers: &'a [Offer],
    filter: &OfferFilter,
    calendar: &BusinessCalendar,
) -> Vec<&'a Offer> {
    offers
        .iter()
        .filter(|offer| filter.matches(offer, calendar))
        .collect()
}

/// Lowercased text searched by `textQuery`
fn search_haystack(offer: &Offer) -> String {
    [
        offer.client.name.as_str(),
        offer.property.title.as_str(),
        offer.property.address.as_str(),
        offer.condiciones.as_str(),
        offer.notas.as_deref().unwrap_or_default(),
    ]
    .join(" ")
    .to_lowercase()
}

fn parse_amount(field: &str, raw: Option<&str>) -> AppResult<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(
            AppError::invalid_format(format!("{} must be a number, got {}", field, raw))
                .with_detail("field", field),
        ),
    }
}
