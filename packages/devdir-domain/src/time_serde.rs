//! Timestamps as fixed-width UTC RFC 3339 strings.
//!
//! Nanosecond precision is always written, so lexicographic order of the stored strings
//! equals chronological order. Stores compare these values as plain strings when sorting.

use serde::{Deserialize, Deserializer, Serializer};
use time::{
	OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339, macros::format_description,
};

const SORTABLE: &[time::format_description::BorrowedFormatItem<'static>] = format_description!(
	"[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
);

pub fn format(value: &OffsetDateTime) -> Result<String, time::error::Format> {
	value.to_offset(UtcOffset::UTC).format(SORTABLE)
}

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let formatted = format(value).map_err(serde::ser::Error::custom)?;

	serializer.serialize_str(&formatted)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	OffsetDateTime::parse(&raw, &Rfc3339).map_err(serde::de::Error::custom)
}
