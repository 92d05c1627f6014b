//! Serde adapters for dates crossing the JSON boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};
use tracing::warn;

use super::dates::parse_day;

/// Deserialize an optional date, turning missing, empty or malformed values
/// into `None` instead of failing the whole payload.
pub fn lenient_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        if s.trim().is_empty() {
            return None;
        }
        match parse_day(&s) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("ignoring history date: {e}");
                None
            }
        }
    }))
}

/// Optional date written as an ISO-8601 string, with `""` standing for `None`.
pub mod day_or_empty {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        parse_day(&raw).map(Some).map_err(serde::de::Error::custom)
    }
}
