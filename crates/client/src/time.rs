//! Timestamp decoding for API payloads.
//! Older servers send naive ISO-8601
//! (UTC implied), newer ones RFC 3339.

use chrono::{
  DateTime,
  NaiveDateTime,
  Utc
};
use serde::{
  Deserialize,
  Deserializer
};

pub(crate) fn parse_timestamp(
  raw: &str
) -> Option<DateTime<Utc>> {
  if let Ok(dt) =
    DateTime::parse_from_rfc3339(raw)
  {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(
    raw,
    "%Y-%m-%dT%H:%M:%S%.f"
  )
  .ok()
  .map(|naive| naive.and_utc())
}

pub(crate) fn deserialize_timestamp<'de, D>(
  deserializer: D
) -> Result<DateTime<Utc>, D::Error>
where
  D: Deserializer<'de>
{
  let raw =
    String::deserialize(deserializer)?;
  parse_timestamp(&raw).ok_or_else(|| {
    serde::de::Error::custom(format!(
      "invalid timestamp: {raw}"
    ))
  })
}
