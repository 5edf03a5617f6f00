//! Process-wide entry point
//!
//! [`Cockpit`] owns the frozen registry and the store adapter. Global
//! stores are created on first access and kept for the lifetime of the
//! `Cockpit`; owned stores are handed to the caller, who keeps them for as
//! long as the owner lives.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use cockpit_types::store_adapter::StoreAdapter;

use crate::config::CockpitOpts;
use crate::hooks::{Configurable, WriteOutcome};
use crate::prelude::*;
use crate::registry::FrozenSettingsRegistry;
use crate::store::Store;
use crate::value::SettingValue;

pub struct Cockpit {
	registry: Arc<FrozenSettingsRegistry>,
	adapter: Arc<dyn StoreAdapter>,
	opts: Arc<CockpitOpts>,
	globals: RwLock<HashMap<Box<str>, Arc<Store>>>,
}

impl std::fmt::Debug for Cockpit {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Cockpit")
			.field("stores", &self.registry.names())
			.field("adapter", &self.adapter)
			.field("opts", &self.opts)
			.finish_non_exhaustive()
	}
}

impl Cockpit {
	pub fn new(
		registry: FrozenSettingsRegistry,
		adapter: Arc<dyn StoreAdapter>,
		opts: CockpitOpts,
	) -> Self {
		if registry.get(&opts.default_store).is_err() {
			warn!("Default settings store '{}' is not declared", opts.default_store);
		}
		Self {
			registry: Arc::new(registry),
			adapter,
			opts: Arc::new(opts),
			globals: RwLock::new(HashMap::new()),
		}
	}

	pub fn registry(&self) -> &Arc<FrozenSettingsRegistry> {
		&self.registry
	}

	pub fn opts(&self) -> &CockpitOpts {
		&self.opts
	}

	/// Global store of the default store name
	pub fn global(&self) -> ClResult<Arc<Store>> {
		self.global_named(&self.opts.default_store)
	}

	/// Global store of a named store, created on first access
	pub fn global_named(&self, store_name: &str) -> ClResult<Arc<Store>> {
		if let Some(store) = self.globals.read().get(store_name) {
			return Ok(store.clone());
		}

		let tree = self.registry.get(store_name)?.clone();
		let mut globals = self.globals.write();
		let store = globals.entry(store_name.into()).or_insert_with(|| {
			debug!("Creating global settings store '{}'", store_name);
			Arc::new(Store::global(tree, self.adapter.clone(), self.opts.clone()))
		});
		Ok(store.clone())
	}

	/// New store for an owner's settings
	pub fn store_for(&self, store_name: &str, owner: Arc<dyn Configurable>) -> ClResult<Store> {
		let tree = self.registry.get(store_name)?.clone();
		debug!("Creating settings store '{}' for {}", store_name, owner.owner_ref());
		Ok(Store::owned(tree, owner, self.adapter.clone(), self.opts.clone()))
	}

	/// New store for an owner's settings in the default store
	pub fn default_store_for(&self, owner: Arc<dyn Configurable>) -> ClResult<Store> {
		self.store_for(&self.opts.default_store, owner)
	}

	/// Read a global setting of the default store
	pub async fn get(&self, path: &str) -> ClResult<SettingValue> {
		self.global()?.get(path).await
	}

	/// Write a global setting of the default store
	pub async fn set(&self, path: &str, value: impl Into<SettingValue>) -> ClResult<WriteOutcome> {
		self.global()?.set(path, value).await
	}
}

// vim: ts=4
