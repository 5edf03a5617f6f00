//! Common types used by the settings engine and store adapters.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

// Timestamp //
//***********//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		#[allow(clippy::cast_possible_wrap)]
		Timestamp(res.as_secs() as i64)
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

// OwnerRef //
//**********//
/// Identifies the entity a per-record setting belongs to.
///
/// `kind` names the owning entity type (e.g. "User"), `id` its identity
/// within that type. Global settings have no owner at all.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
	pub kind: Box<str>,
	pub id: Box<str>,
}

impl OwnerRef {
	pub fn new(kind: impl Into<Box<str>>, id: impl std::fmt::Display) -> Self {
		Self { kind: kind.into(), id: id.to_string().into() }
	}
}

impl std::fmt::Display for OwnerRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}#{}", self.kind, self.id)
	}
}

// SettingRecord //
//***************//
/// A persisted override of one setting.
///
/// `(key, owner, store_name)` is unique: a backend keeps at most one record
/// per path per owner per store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingRecord {
	pub key: Box<str>,
	#[serde(rename = "value")]
	pub raw_value: Box<str>,
	pub owner: Option<OwnerRef>,
	#[serde(rename = "store")]
	pub store_name: Box<str>,
	#[serde(rename = "createdAt")]
	pub created_at: Timestamp,
	#[serde(rename = "updatedAt")]
	pub updated_at: Timestamp,
}


// vim: ts=4
