use chrono::{DateTime, Datelike, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};

/// Decode an optional RFC 3339 timestamp.
///
/// `null`, `""` and the zero time (`0001-01-01T00:00:00Z`) all decode to `None`;
/// the server emits the latter for fields that were never set.
pub(crate) fn deserialize_optional<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .map_err(|err| D::Error::custom(format!("invalid timestamp {trimmed:?}: {err}")))?
        .with_timezone(&Utc);
    if parsed.year() <= 1 {
        return Ok(None);
    }
    Ok(Some(parsed))
}
