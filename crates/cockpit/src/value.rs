//! Typed setting values and their type tags

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type tag of a setting, fixed at declaration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
	String,
	Integer,
	Float,
	Boolean,
	DateTime,
	Array,
	/// Passthrough: any value is accepted and stored as JSON
	Custom,
}

impl SettingType {
	/// Classify a value by its concrete variant
	pub fn infer(value: &SettingValue) -> SettingType {
		match value {
			SettingValue::Bool(_) => SettingType::Boolean,
			SettingValue::Int(_) => SettingType::Integer,
			SettingValue::Float(_) => SettingType::Float,
			SettingValue::DateTime(_) => SettingType::DateTime,
			SettingValue::Array(_) => SettingType::Array,
			SettingValue::String(_) => SettingType::String,
			SettingValue::Json(_) => SettingType::Custom,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			SettingType::String => "string",
			SettingType::Integer => "integer",
			SettingType::Float => "float",
			SettingType::Boolean => "boolean",
			SettingType::DateTime => "datetime",
			SettingType::Array => "array",
			SettingType::Custom => "custom",
		}
	}
}

impl std::fmt::Display for SettingType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// Setting value types
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
	Bool(bool), // Must be before Int to avoid bool -> int coercion
	Int(i64),
	Float(f64),
	DateTime(DateTime<Utc>),
	String(String),
	Array(Vec<String>),
	Json(serde_json::Value),
}

impl SettingValue {
	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		SettingType::infer(self).name()
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			SettingValue::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			SettingValue::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			SettingValue::Float(f) => Some(*f),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			SettingValue::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
		match self {
			SettingValue::DateTime(dt) => Some(*dt),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&[String]> {
		match self {
			SettingValue::Array(items) => Some(items),
			_ => None,
		}
	}

	/// JSON view of the value, used for attribute maps and custom storage
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			SettingValue::Bool(b) => serde_json::Value::Bool(*b),
			SettingValue::Int(i) => serde_json::Value::from(*i),
			SettingValue::Float(f) => serde_json::Value::from(*f),
			SettingValue::DateTime(dt) => serde_json::Value::String(crate::coercion::format_datetime(dt)),
			SettingValue::String(s) => serde_json::Value::String(s.clone()),
			SettingValue::Array(items) => {
				serde_json::Value::Array(items.iter().cloned().map(serde_json::Value::String).collect())
			}
			SettingValue::Json(json) => json.clone(),
		}
	}
}

impl std::fmt::Display for SettingValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SettingValue::String(s) => write!(f, "{:?}", s),
			other => write!(f, "{}", other.to_json()),
		}
	}
}

impl From<bool> for SettingValue {
	fn from(value: bool) -> Self {
		SettingValue::Bool(value)
	}
}

impl From<i64> for SettingValue {
	fn from(value: i64) -> Self {
		SettingValue::Int(value)
	}
}

impl From<i32> for SettingValue {
	fn from(value: i32) -> Self {
		SettingValue::Int(i64::from(value))
	}
}

impl From<u32> for SettingValue {
	fn from(value: u32) -> Self {
		SettingValue::Int(i64::from(value))
	}
}

impl From<f64> for SettingValue {
	fn from(value: f64) -> Self {
		SettingValue::Float(value)
	}
}

impl From<DateTime<Utc>> for SettingValue {
	fn from(value: DateTime<Utc>) -> Self {
		SettingValue::DateTime(value)
	}
}

impl From<&str> for SettingValue {
	fn from(value: &str) -> Self {
		SettingValue::String(value.to_string())
	}
}

impl From<String> for SettingValue {
	fn from(value: String) -> Self {
		SettingValue::String(value)
	}
}

impl From<Vec<String>> for SettingValue {
	fn from(value: Vec<String>) -> Self {
		SettingValue::Array(value)
	}
}

impl From<Vec<&str>> for SettingValue {
	fn from(value: Vec<&str>) -> Self {
		SettingValue::Array(value.into_iter().map(str::to_string).collect())
	}
}

impl<const N: usize> From<[&str; N]> for SettingValue {
	fn from(value: [&str; N]) -> Self {
		SettingValue::Array(value.into_iter().map(str::to_string).collect())
	}
}

/// JSON scalars and string arrays map onto the native variants, everything
/// else stays a custom value
impl From<serde_json::Value> for SettingValue {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Bool(b) => SettingValue::Bool(b),
			serde_json::Value::String(s) => SettingValue::String(s),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => SettingValue::Int(i),
				None => match n.as_f64() {
					Some(f) => SettingValue::Float(f),
					None => SettingValue::Json(serde_json::Value::Number(n)),
				},
			},
			serde_json::Value::Array(items)
				if !items.is_empty() && items.iter().all(serde_json::Value::is_string) =>
			{
				SettingValue::Array(
					items
						.into_iter()
						.filter_map(|item| match item {
							serde_json::Value::String(s) => Some(s),
							_ => None,
						})
						.collect(),
				)
			}
			other => SettingValue::Json(other),
		}
	}
}


// vim: ts=4
