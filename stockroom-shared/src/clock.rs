use chrono::{DateTime, SecondsFormat, Utc};

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`.
pub fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_iso() -> String {
    iso(Utc::now())
}
