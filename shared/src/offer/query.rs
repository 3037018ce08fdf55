//! Offer list query parameters
//!
//! [`OfferQuery`] is the raw filter state as it round-trips through URL
//! query strings and form controls. A value that is absent, empty or
//! `"all"` means "no constraint" for that dimension.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw filter + sort state for the offers list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OfferQuery {
    #[serde(deserialize_with = "lenient_string")]
    pub text_query: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub property_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub client_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub agent_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub amount_min: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub amount_max: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    #[serde(deserialize_with = "lenient_string")]
    pub created_from: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    #[serde(deserialize_with = "lenient_string")]
    pub created_to: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub expiration_bucket: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub sort_by: Option<String>,
    /// `asc` | `desc`
    #[serde(deserialize_with = "lenient_string")]
    pub sort_order: Option<String>,
}

/// Normalize a raw query value: trimmed, with `""` and `"all"` meaning unset
pub fn constraint(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "all")
}

/// Accept strings, numbers, booleans or null for a query value.
///
/// Query state serialized by a form may carry `amountMin` as `100000` or
/// `"100000"`; both are kept as text and parsed when the filter is compiled.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

/// Sortable column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Importe,
    #[default]
    CreatedAt,
    UpdatedAt,
    VenceEl,
    ClienteNombre,
    PropertyTitle,
    Estado,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Importe,
        SortKey::CreatedAt,
        SortKey::UpdatedAt,
        SortKey::VenceEl,
        SortKey::ClienteNombre,
        SortKey::PropertyTitle,
        SortKey::Estado,
    ];

    /// Wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            SortKey::Importe => "importe",
            SortKey::CreatedAt => "createdAt",
            SortKey::UpdatedAt => "updatedAt",
            SortKey::VenceEl => "venceEl",
            SortKey::ClienteNombre => "clienteNombre",
            SortKey::PropertyTitle => "propertyTitle",
            SortKey::Estado => "estado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Sort request; the default is newest first (`createdAt` descending)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfferSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Bucket of offers by days left before `venceEl`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum ExpirationBucket {
    #[default]
    All,
    /// 0..=7 days remaining
    ExpiringSoon,
    /// Negative days remaining
    Expired,
}

impl ExpirationBucket {
    /// Inclusive upper bound of the "expiring soon" window
    pub const EXPIRING_SOON_DAYS: i64 = 7;

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(ExpirationBucket::All),
            "expiringSoon" => Some(ExpirationBucket::ExpiringSoon),
            "expired" => Some(ExpirationBucket::Expired),
            _ => None,
        }
    }

    pub fn contains(self, days_remaining: i64) -> bool {
        match self {
            ExpirationBucket::All => true,
            ExpirationBucket::ExpiringSoon => {
                (0..=Self::EXPIRING_SOON_DAYS).contains(&days_remaining)
            }
            ExpirationBucket::Expired => days_remaining < 0,
        }
    }
}
