//! Adapter that persists setting overrides.
//!
//! The engine never performs I/O itself: every read and write of a
//! [`SettingRecord`] goes through an implementation of [`StoreAdapter`].
//! Records are addressed by `(key, owner, store_name)`; a `None` owner
//! addresses the global settings of a store.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	/// Reads a single record
	async fn find(
		&self,
		key: &str,
		owner: Option<&OwnerRef>,
		store_name: &str,
	) -> ClResult<Option<SettingRecord>>;

	/// Reads every record of an owner in a store
	///
	/// Records must be returned in creation order, and the order must be
	/// stable between calls.
	async fn find_all(&self, owner: Option<&OwnerRef>, store_name: &str)
	-> ClResult<Vec<SettingRecord>>;

	/// Creates the record or replaces its value if it already exists
	///
	/// Must be safe to call concurrently for distinct keys. Concurrent calls
	/// for the same key must resolve last-write-wins.
	async fn create_or_update(
		&self,
		key: &str,
		raw_value: &str,
		owner: Option<&OwnerRef>,
		store_name: &str,
	) -> ClResult<SettingRecord>;

	/// Deletes a record. Returns whether a record existed.
	async fn delete(&self, key: &str, owner: Option<&OwnerRef>, store_name: &str)
	-> ClResult<bool>;
}

// vim: ts=4
