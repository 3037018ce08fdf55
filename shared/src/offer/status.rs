//! Offer status graph and action gating

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Offer status
///
/// Exactly one status is active at a time. Wire names follow the back-office
/// vocabulary (`abierta`, `counter`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum OfferStatus {
    #[default]
    #[serde(rename = "abierta")]
    Open,
    #[serde(rename = "counter")]
    Countered,
    #[serde(rename = "aceptada")]
    Accepted,
    #[serde(rename = "rechazada")]
    Rejected,
    #[serde(rename = "expirada")]
    Expired,
}

impl OfferStatus {
    pub const ALL: [OfferStatus; 5] = [
        OfferStatus::Open,
        OfferStatus::Countered,
        OfferStatus::Accepted,
        OfferStatus::Rejected,
        OfferStatus::Expired,
    ];

    /// Adjacency table of the status graph
    pub const fn allowed_successors(self) -> &'static [OfferStatus] {
        match self {
            OfferStatus::Open => &[
                OfferStatus::Countered,
                OfferStatus::Accepted,
                OfferStatus::Rejected,
                OfferStatus::Expired,
            ],
            // Repeated counters are part of a negotiation
            OfferStatus::Countered => &[
                OfferStatus::Accepted,
                OfferStatus::Rejected,
                OfferStatus::Expired,
                OfferStatus::Countered,
            ],
            OfferStatus::Accepted | OfferStatus::Rejected => &[],
            // Only an explicit reopen
            OfferStatus::Expired => &[OfferStatus::Open],
        }
    }

    pub fn can_transition_to(self, target: OfferStatus) -> bool {
        self.allowed_successors().contains(&target)
    }

    /// No successor at all (`aceptada`, `rechazada`)
    pub fn is_terminal(self) -> bool {
        self.allowed_successors().is_empty()
    }

    /// Counted in the acceptance-rate denominator
    pub fn is_resolved(self) -> bool {
        matches!(
            self,
            OfferStatus::Accepted | OfferStatus::Rejected | OfferStatus::Expired
        )
    }

    /// Still under negotiation
    pub fn is_active(self) -> bool {
        matches!(self, OfferStatus::Open | OfferStatus::Countered)
    }

    /// Wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            OfferStatus::Open => "abierta",
            OfferStatus::Countered => "counter",
            OfferStatus::Accepted => "aceptada",
            OfferStatus::Rejected => "rechazada",
            OfferStatus::Expired => "expirada",
        }
    }

    /// Actions the desk may offer for an offer in this status
    pub fn available_actions(self) -> Vec<OfferAction> {
        OfferAction::ALL
            .into_iter()
            .filter(|action| action.is_allowed_from(self))
            .collect()
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferStatus {
    type Err = AppError;

    /// Unknown status strings are a broken caller contract, not user input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OfferStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidOfferStatus,
                    format!("Unknown offer status: {}", s),
                )
                .with_detail("status", s)
            })
    }
}

/// User-facing action on an offer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OfferAction {
    Edit,
    Counter,
    Accept,
    Reject,
    Expire,
    Reopen,
}

impl OfferAction {
    pub const ALL: [OfferAction; 6] = [
        OfferAction::Edit,
        OfferAction::Counter,
        OfferAction::Accept,
        OfferAction::Reject,
        OfferAction::Expire,
        OfferAction::Reopen,
    ];

    /// Status the action moves the offer to (`Edit` keeps the status)
    pub const fn target_status(self) -> Option<OfferStatus> {
        match self {
            OfferAction::Edit => None,
            OfferAction::Counter => Some(OfferStatus::Countered),
            OfferAction::Accept => Some(OfferStatus::Accepted),
            OfferAction::Reject => Some(OfferStatus::Rejected),
            OfferAction::Expire => Some(OfferStatus::Expired),
            OfferAction::Reopen => Some(OfferStatus::Open),
        }
    }

    pub fn is_allowed_from(self, status: OfferStatus) -> bool {
        match self.target_status() {
            Some(target) => status.can_transition_to(target),
            None => status.is_active(),
        }
    }
}

/// Whether `action` should be offered for an offer in `status`
pub fn can_perform_action(status: OfferStatus, action: OfferAction) -> bool {
    action.is_allowed_from(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_wire_names() {
        for status in OfferStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: OfferStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
        assert!(serde_json::from_str::<OfferStatus>("\"pendiente\"").is_err());
    }

    #[test]
    fn test_from_str_unknown_is_contract_error() {
        assert_eq!("aceptada".parse::<OfferStatus>().unwrap(), OfferStatus::Accepted);

        let err = "ACEPTADA".parse::<OfferStatus>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOfferStatus);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OfferStatus::Accepted.is_terminal());
        assert!(OfferStatus::Rejected.is_terminal());
        assert!(!OfferStatus::Expired.is_terminal());
        assert!(!OfferStatus::Open.is_terminal());
    }

    #[test]
    fn test_repeated_counter_and_reopen() {
        assert!(OfferStatus::Countered.can_transition_to(OfferStatus::Countered));
        assert!(!OfferStatus::Open.can_transition_to(OfferStatus::Open));
        assert!(OfferStatus::Expired.can_transition_to(OfferStatus::Open));
        assert!(!OfferStatus::Expired.can_transition_to(OfferStatus::Accepted));
    }

    #[test]
    fn test_available_actions() {
        assert_eq!(
            OfferStatus::Open.available_actions(),
            vec![
                OfferAction::Edit,
                OfferAction::Counter,
                OfferAction::Accept,
                OfferAction::Reject,
                OfferAction::Expire,
            ]
        );
        assert!(OfferStatus::Accepted.available_actions().is_empty());
        assert_eq!(
            OfferStatus::Expired.available_actions(),
            vec![OfferAction::Reopen]
        );
    }

    #[test]
    fn test_can_perform_action() {
        assert!(can_perform_action(OfferStatus::Countered, OfferAction::Edit));
        assert!(can_perform_action(OfferStatus::Countered, OfferAction::Counter));
        assert!(!can_perform_action(OfferStatus::Rejected, OfferAction::Edit));
        assert!(!can_perform_action(OfferStatus::Open, OfferAction::Reopen));
    }
}
