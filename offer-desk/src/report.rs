//! Desk report - snapshot loading and the JSON summary printed by the binary

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use shared::offer::{Offer, OfferQuery, OfferStats};
use shared::{AppError, AppResult};

use crate::offers::{build_view, compute_stats, expire_overdue};
use crate::utils::BusinessCalendar;

/// Everything the desk shows for one snapshot
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeskReport {
    /// Unix millis
    pub generated_at: i64,
    /// Business date the report was computed for
    pub today: NaiveDate,
    pub timezone: String,
    /// Filtered and sorted offers
    pub view: Vec<Offer>,
    /// Counters over `view`
    pub stats: OfferStats,
    /// Counters over the whole snapshot
    pub overall_stats: OfferStats,
    /// Active offers past `venceEl`, as their `expirada` copies
    pub overdue: Vec<Offer>,
}

/// Read a JSON array of offers
pub fn load_offers(path: &Path) -> AppResult<Vec<Offer>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::from(e).with_detail("path", path.display().to_string())
    })?;
    let offers: Vec<Offer> = serde_json::from_str(&raw).map_err(|e| {
        AppError::from(e).with_detail("path", path.display().to_string())
    })?;
    tracing::debug!(path = %path.display(), count = offers.len(), "Offers loaded");
    Ok(offers)
}

/// Read raw filter state; no file means the default view
pub fn load_query(path: Option<&Path>) -> AppResult<OfferQuery> {
    let Some(path) = path else {
        return Ok(OfferQuery::default());
    };
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::from(e).with_detail("path", path.display().to_string())
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Compute the report for `offers` as seen on `calendar.today()`
pub fn build_report(
    offers: &[Offer],
    query: &OfferQuery,
    calendar: &BusinessCalendar,
    now: i64,
) -> AppResult<DeskReport> {
    let view = build_view(offers, query, calendar)?;
    let stats = compute_stats(view.iter().copied());

    Ok(DeskReport {
        generated_at: now,
        today: calendar.today(),
        timezone: calendar.tz().name().to_string(),
        view: view.into_iter().cloned().collect(),
        stats,
        overall_stats: compute_stats(offers),
        overdue: expire_overdue(offers, calendar, now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::test_support::*;
    use shared::ErrorCode;
    use shared::offer::OfferStatus;
    use std::io::Write;

    #[test]
    fn test_load_offers_roundtrip_through_file() {
        let offers = sample_offers();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&offers).unwrap().as_bytes())
            .unwrap();

        let loaded = load_offers(file.path()).unwrap();
        assert_eq!(loaded, offers);
    }

    #[test]
    fn test_load_offers_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load_offers(&missing).unwrap_err();
        assert_eq!(err.code, ErrorCode::IoError);

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "[{\"id\": 1}]").unwrap();
        let err = load_offers(&broken).unwrap_err();
        assert_eq!(err.code, ErrorCode::SerializationError);
        assert!(err.details.unwrap().contains_key("path"));
    }

    #[test]
    fn test_load_query() {
        assert_eq!(load_query(None).unwrap(), OfferQuery::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.json");
        std::fs::write(&path, r#"{"status": "aceptada", "amountMin": 200000}"#).unwrap();
        let query = load_query(Some(path.as_path())).unwrap();
        assert_eq!(query.status.as_deref(), Some("aceptada"));
        assert_eq!(query.amount_min.as_deref(), Some("200000"));
    }

    #[test]
    fn test_build_report() {
        let mut offers = sample_offers();
        offers[7].vence_el = date(2026, 10, 10);

        let query = OfferQuery {
            status: Some("aceptada".to_string()),
            sort_by: Some("importe".to_string()),
            sort_order: Some("asc".to_string()),
            ..OfferQuery::default()
        };
        let report = build_report(&offers, &query, &calendar(), 42).unwrap();

        let ids: Vec<&str> = report.view.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["o3", "o1", "o2", "o4"]);
        assert_eq!(report.stats.total, 4);
        assert_eq!(report.overall_stats.total, 10);
        assert_eq!(report.overall_stats.acceptance_rate, 57);
        assert_eq!(report.overdue.len(), 1);
        assert_eq!(report.overdue[0].estado, OfferStatus::Expired);
        assert_eq!(report.timezone, "Europe/Madrid");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["today"], "2026-10-19");
        assert_eq!(json["overallStats"]["aceptadas"], 4);
    }

    #[test]
    fn test_build_report_rejects_malformed_query() {
        let query = OfferQuery {
            sort_by: Some("precio".to_string()),
            ..OfferQuery::default()
        };
        let err = build_report(&sample_offers(), &query, &calendar(), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }
}
