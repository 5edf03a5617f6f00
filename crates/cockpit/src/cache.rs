//! Per-store write-through cache of persisted setting records
//!
//! The cache is populated with a single bulk load on first use and kept
//! current by every write afterwards. It is never shared between owners.

use parking_lot::RwLock;
use tokio::sync::OnceCell;

use crate::prelude::*;

/// Ordered collection of the records of one owner in one store
#[derive(Debug, Default)]
pub struct SettingsCache {
	loaded: OnceCell<()>,
	records: RwLock<Vec<SettingRecord>>,
}

impl SettingsCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_loaded(&self) -> bool {
		self.loaded.initialized()
	}

	/// Populate the cache from `load`, at most once per cache lifetime
	///
	/// Concurrent callers wait for the first load to finish. A failed load
	/// leaves the cache cold so the next call retries.
	pub async fn ensure_loaded<F, Fut>(&self, load: F) -> ClResult<()>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = ClResult<Vec<SettingRecord>>>,
	{
		self.loaded
			.get_or_try_init(|| async move {
				let records = load().await?;
				debug!("Settings cache loaded with {} records", records.len());
				let mut cache = self.records.write();
				// Writes that raced ahead of the load are newer than what was read
				let mut merged = records;
				for record in cache.drain(..) {
					upsert(&mut merged, record);
				}
				*cache = merged;
				Ok(())
			})
			.await
			.map(|_| ())
	}

	pub fn get(&self, key: &str) -> Option<SettingRecord> {
		self.records.read().iter().find(|record| &*record.key == key).cloned()
	}

	/// Append a new record, or replace the record with the same key in place
	pub fn put(&self, record: SettingRecord) {
		upsert(&mut self.records.write(), record);
	}

	pub fn remove(&self, key: &str) -> Option<SettingRecord> {
		let mut records = self.records.write();
		let idx = records.iter().position(|record| &*record.key == key)?;
		Some(records.remove(idx))
	}

	/// Snapshot of the cached records in insertion order
	pub fn records(&self) -> Vec<SettingRecord> {
		self.records.read().clone()
	}

	pub fn len(&self) -> usize {
		self.records.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.read().is_empty()
	}
}

fn upsert(records: &mut Vec<SettingRecord>, record: SettingRecord) {
	match records.iter_mut().find(|existing| existing.key == record.key) {
		Some(existing) => *existing = record,
		None => records.push(record),
	}
}


// vim: ts=4
