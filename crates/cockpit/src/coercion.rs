//! Conversion between typed setting values and their stored string form
//!
//! | Type     | Stored as                                         |
//! |----------|---------------------------------------------------|
//! | String   | text, verbatim                                    |
//! | Integer  | decimal                                           |
//! | Float    | shortest decimal text that round-trips            |
//! | Boolean  | `true` / `false`                                  |
//! | DateTime | RFC 3339 in UTC                                   |
//! | Array    | elements joined by `,`; `\` and `,` are escaped   |
//! | Custom   | JSON text                                         |
//!
//! [`serialize`] and [`deserialize`] are strict and form a round trip for
//! every value [`coerce`] admits. [`coerce`] is the lenient entry point used
//! on writes: it also accepts textual input such as `"200"` for an integer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::value::{SettingType, SettingValue};

pub const ARRAY_DELIMITER: char = ',';
const ESCAPE: char = '\\';

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Serialize a value that was admitted for `kind`
pub fn serialize(value: &SettingValue, kind: SettingType) -> String {
	if kind == SettingType::Custom {
		return value.to_json().to_string();
	}

	match value {
		SettingValue::String(s) => s.clone(),
		SettingValue::Int(i) => i.to_string(),
		SettingValue::Float(f) => f.to_string(),
		SettingValue::Bool(b) => b.to_string(),
		SettingValue::DateTime(dt) => format_datetime(dt),
		SettingValue::Array(items) => join_array(items),
		SettingValue::Json(json) => json.to_string(),
	}
}

/// Read a stored string back as `kind`. `None` if the text does not parse.
pub fn deserialize(raw: &str, kind: SettingType) -> Option<SettingValue> {
	match kind {
		SettingType::String => Some(SettingValue::String(raw.to_string())),
		SettingType::Integer => raw.parse::<i64>().ok().map(SettingValue::Int),
		SettingType::Float => {
			raw.parse::<f64>().ok().filter(|f| f.is_finite()).map(SettingValue::Float)
		}
		SettingType::Boolean => match raw {
			"true" => Some(SettingValue::Bool(true)),
			"false" => Some(SettingValue::Bool(false)),
			_ => None,
		},
		SettingType::DateTime => DateTime::parse_from_rfc3339(raw)
			.ok()
			.map(|dt| SettingValue::DateTime(dt.with_timezone(&Utc))),
		SettingType::Array => split_array(raw).map(SettingValue::Array),
		SettingType::Custom => {
			serde_json::from_str::<serde_json::Value>(raw).ok().map(SettingValue::from)
		}
	}
}

/// Convert an incoming value to `kind`. `None` if it is incompatible.
///
/// `Custom` values are normalized to the form they read back as from JSON
/// text. Arrays must not contain empty elements: `[""]` and `[]` would both
/// be stored as the empty string.
pub fn coerce(value: SettingValue, kind: SettingType) -> Option<SettingValue> {
	match (kind, value) {
		(SettingType::Custom, SettingValue::Float(f)) if !f.is_finite() => None,
		(SettingType::Custom, value) => Some(SettingValue::from(value.to_json())),

		(SettingType::String, SettingValue::String(s)) => Some(SettingValue::String(s)),
		(SettingType::String, SettingValue::Int(i)) => Some(SettingValue::String(i.to_string())),
		(SettingType::String, SettingValue::Float(f)) => Some(SettingValue::String(f.to_string())),
		(SettingType::String, SettingValue::Bool(b)) => Some(SettingValue::String(b.to_string())),
		(SettingType::String, SettingValue::DateTime(dt)) => {
			Some(SettingValue::String(format_datetime(&dt)))
		}

		(SettingType::Integer, SettingValue::Int(i)) => Some(SettingValue::Int(i)),
		(SettingType::Integer, SettingValue::String(s)) => {
			s.trim().parse::<i64>().ok().map(SettingValue::Int)
		}
		(SettingType::Integer, SettingValue::Float(f)) => whole_float(f).map(SettingValue::Int),

		(SettingType::Float, SettingValue::Float(f)) => {
			f.is_finite().then_some(SettingValue::Float(f))
		}
		#[allow(clippy::cast_precision_loss)]
		(SettingType::Float, SettingValue::Int(i)) => Some(SettingValue::Float(i as f64)),
		(SettingType::Float, SettingValue::String(s)) => {
			s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).map(SettingValue::Float)
		}

		(SettingType::Boolean, SettingValue::Bool(b)) => Some(SettingValue::Bool(b)),
		(SettingType::Boolean, SettingValue::Int(0)) => Some(SettingValue::Bool(false)),
		(SettingType::Boolean, SettingValue::Int(1)) => Some(SettingValue::Bool(true)),
		(SettingType::Boolean, SettingValue::String(s)) => {
			match s.trim().to_ascii_lowercase().as_str() {
				"true" | "1" => Some(SettingValue::Bool(true)),
				"false" | "0" => Some(SettingValue::Bool(false)),
				_ => None,
			}
		}

		(SettingType::DateTime, SettingValue::DateTime(dt)) => Some(SettingValue::DateTime(dt)),
		(SettingType::DateTime, SettingValue::String(s)) => {
			parse_datetime(&s).map(SettingValue::DateTime)
		}
		(SettingType::DateTime, SettingValue::Int(secs)) => {
			DateTime::<Utc>::from_timestamp(secs, 0).map(SettingValue::DateTime)
		}

		(SettingType::Array, SettingValue::Array(items)) => {
			items.iter().all(|item| !item.is_empty()).then_some(SettingValue::Array(items))
		}
		(SettingType::Array, SettingValue::String(s)) if !s.is_empty() => {
			Some(SettingValue::Array(vec![s]))
		}

		_ => None,
	}
}

/// Canonical text form of a timestamp
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
	dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse a timestamp from any of the accepted input formats
///
/// Inputs without an offset are taken as UTC; bare dates as midnight UTC.
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
	let input = input.trim();
	if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
		return Some(dt.with_timezone(&Utc));
	}
	for format in DATETIME_FORMATS {
		if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
			return Some(naive.and_utc());
		}
	}
	for format in DATE_FORMATS {
		if let Ok(date) = NaiveDate::parse_from_str(input, format) {
			return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
		}
	}
	None
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_float(f: f64) -> Option<i64> {
	if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
		Some(f as i64)
	} else {
		None
	}
}

fn join_array(items: &[String]) -> String {
	let mut out = String::new();
	for (i, item) in items.iter().enumerate() {
		if i > 0 {
			out.push(ARRAY_DELIMITER);
		}
		for c in item.chars() {
			if c == ESCAPE || c == ARRAY_DELIMITER {
				out.push(ESCAPE);
			}
			out.push(c);
		}
	}
	out
}

fn split_array(raw: &str) -> Option<Vec<String>> {
	if raw.is_empty() {
		return Some(Vec::new());
	}

	let mut items = Vec::new();
	let mut current = String::new();
	let mut chars = raw.chars();
	while let Some(c) = chars.next() {
		match c {
			ESCAPE => current.push(chars.next()?),
			ARRAY_DELIMITER => items.push(std::mem::take(&mut current)),
			c => current.push(c),
		}
	}
	items.push(current);
	Some(items)
}


// vim: ts=4
