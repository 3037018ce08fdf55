/// Current UTC timestamp in Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Milliseconds in one calendar day
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Generate a new resource id (UUID v4, hyphenated)
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
