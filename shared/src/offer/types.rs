//! Offer and counter-offer records, plus the draft shapes that forms submit

use super::status::OfferStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// References
// ============================================================================

/// Buyer making the offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientRef {
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Agent the offer is assigned to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AgentRef {
    pub id: String,
    pub name: String,
}

/// Property the offer is made on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRef {
    pub id: String,
    pub title: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_price: Option<f64>,
}

// ============================================================================
// Records
// ============================================================================

/// Negotiation response to an offer. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CounterOffer {
    pub id: String,
    /// Owning offer
    pub offer_id: String,
    pub importe: f64,
    pub condiciones: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    pub author_id: String,
    /// Author name snapshot
    pub author_name: String,
    /// Unix millis
    pub created_at: i64,
}

/// A buyer's monetary proposal for a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub client: ClientRef,
    pub agent: AgentRef,
    pub property: PropertyRef,
    /// Offered amount
    pub importe: f64,
    /// Conditions attached to the offer
    pub condiciones: String,
    /// Internal notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    pub estado: OfferStatus,
    /// Expiration date (business calendar)
    pub vence_el: NaiveDate,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,
    /// Append-only negotiation history, oldest first
    #[serde(default)]
    pub counter_offers: Vec<CounterOffer>,
}

impl Offer {
    /// Most recent counter-offer, if any
    pub fn latest_counter(&self) -> Option<&CounterOffer> {
        self.counter_offers.last()
    }

    /// Amount currently on the table: the latest counter-offer's, or the
    /// original offer's.
    pub fn current_amount(&self) -> f64 {
        self.latest_counter()
            .map(|c| c.importe)
            .unwrap_or(self.importe)
    }
}

// ============================================================================
// Drafts (form input)
// ============================================================================

/// Offer as submitted by a create form. Every field is optional so that
/// incomplete input can be validated and reported field by field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfferDraft {
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub property: Option<PropertyRef>,
    /// Defaults to the acting operator when absent
    #[serde(default)]
    pub agent: Option<AgentRef>,
    #[serde(default)]
    pub importe: Option<f64>,
    #[serde(default)]
    pub condiciones: Option<String>,
    #[serde(default)]
    pub notas: Option<String>,
    /// Raw date input (`YYYY-MM-DD` or RFC 3339)
    #[serde(default)]
    pub vence_el: Option<String>,
}

/// Counter-offer as submitted by the negotiation dialog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CounterOfferDraft {
    #[serde(default)]
    pub importe: Option<f64>,
    #[serde(default)]
    pub condiciones: Option<String>,
    #[serde(default)]
    pub notas: Option<String>,
}

/// Partial edit of an offer's terms (None = no change)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfferUpdate {
    #[serde(default)]
    pub importe: Option<f64>,
    #[serde(default)]
    pub condiciones: Option<String>,
    /// `Some("")` clears the notes
    #[serde(default)]
    pub notas: Option<String>,
    #[serde(default)]
    pub vence_el: Option<String>,
    #[serde(default)]
    pub agent: Option<AgentRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_offer() -> Offer {
        Offer {
            id: "o-1".to_string(),
            client: ClientRef {
                id: "c-1".to_string(),
                name: "Lucía Pérez".to_string(),
                email: None,
                phone: None,
            },
            agent: AgentRef {
                id: "a-1".to_string(),
                name: "Mario".to_string(),
            },
            property: PropertyRef {
                id: "p-1".to_string(),
                title: "Ático en Chamberí".to_string(),
                address: "Calle Luchana 10, Madrid".to_string(),
                list_price: Some(450_000.0),
            },
            importe: 410_000.0,
            condiciones: "Pago al contado".to_string(),
            notas: None,
            estado: OfferStatus::Open,
            vence_el: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
            counter_offers: vec![],
        }
    }

    #[test]
    fn test_offer_wire_format() {
        let json = serde_json::to_value(sample_offer()).unwrap();
        assert_eq!(json["venceEl"], "2026-11-01");
        assert_eq!(json["estado"], "abierta");
        assert_eq!(json["property"]["listPrice"], 450_000.0);
        assert_eq!(json["counterOffers"], serde_json::json!([]));
        assert!(json.get("notas").is_none());
    }

    #[test]
    fn test_offer_deserialize_without_counter_offers() {
        let mut json = serde_json::to_value(sample_offer()).unwrap();
        json.as_object_mut().unwrap().remove("counterOffers");
        let offer: Offer = serde_json::from_value(json).unwrap();
        assert!(offer.counter_offers.is_empty());
    }

    #[test]
    fn test_current_amount_follows_latest_counter() {
        let mut offer = sample_offer();
        assert_eq!(offer.current_amount(), 410_000.0);

        offer.counter_offers.push(CounterOffer {
            id: "co-1".to_string(),
            offer_id: "o-1".to_string(),
            importe: 440_000.0,
            condiciones: "Firma antes de fin de mes".to_string(),
            notas: None,
            author_id: "a-1".to_string(),
            author_name: "Mario".to_string(),
            created_at: 1_700_000_100_000,
        });
        assert_eq!(offer.current_amount(), 440_000.0);
    }

    #[test]
    fn test_draft_accepts_partial_json() {
        let draft: OfferDraft = serde_json::from_str(r#"{"importe": 12.5}"#).unwrap();
        assert_eq!(draft.importe, Some(12.5));
        assert!(draft.client.is_none());
        assert!(draft.vence_el.is_none());
    }
}
