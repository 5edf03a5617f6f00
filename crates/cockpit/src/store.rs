//! Live binding of a definition tree to an owner and a store adapter
//!
//! # Reads
//!
//! 1. Resolve the path in the definition tree
//! 2. Load the owner's records into the cache (once per store)
//! 3. A cached record wins; its raw value is read back under the setting's type
//! 4. Otherwise the default is returned (never written back)
//!
//! # Writes
//!
//! Coerce to the setting's type, check options, run the validator (which may
//! reject or replace the value), persist through the adapter, update the
//! cache, then run post-write callbacks.

use std::collections::BTreeMap;
use std::sync::Arc;

use cockpit_types::store_adapter::StoreAdapter;

use crate::cache::SettingsCache;
use crate::coercion;
use crate::config::CockpitOpts;
use crate::definition::{Definition, DefinitionTree, OptionsPolicy};
use crate::hooks::{Configurable, WriteContext, WriteOutcome};
use crate::prelude::*;
use crate::scope::Scope;
use crate::value::SettingValue;

pub struct Store {
	tree: Arc<DefinitionTree>,
	owner: Option<Arc<dyn Configurable>>,
	owner_ref: Option<OwnerRef>,
	adapter: Arc<dyn StoreAdapter>,
	opts: Arc<CockpitOpts>,
	cache: SettingsCache,
}

impl std::fmt::Debug for Store {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Store")
			.field("name", &self.tree.name())
			.field("owner", &self.owner_ref)
			.field("cache", &self.cache)
			.finish_non_exhaustive()
	}
}

impl Store {
	/// Store for the global settings of a tree
	pub fn global(
		tree: Arc<DefinitionTree>,
		adapter: Arc<dyn StoreAdapter>,
		opts: Arc<CockpitOpts>,
	) -> Self {
		Self { tree, owner: None, owner_ref: None, adapter, opts, cache: SettingsCache::new() }
	}

	/// Store for the settings of one owner
	pub fn owned(
		tree: Arc<DefinitionTree>,
		owner: Arc<dyn Configurable>,
		adapter: Arc<dyn StoreAdapter>,
		opts: Arc<CockpitOpts>,
	) -> Self {
		let owner_ref = Some(owner.owner_ref());
		Self { tree, owner: Some(owner), owner_ref, adapter, opts, cache: SettingsCache::new() }
	}

	/// Store name
	pub fn name(&self) -> &str {
		self.tree.name()
	}

	pub fn tree(&self) -> &Arc<DefinitionTree> {
		&self.tree
	}

	pub fn owner(&self) -> Option<&dyn Configurable> {
		self.owner.as_deref()
	}

	pub fn owner_ref(&self) -> Option<&OwnerRef> {
		self.owner_ref.as_ref()
	}

	pub fn is_global(&self) -> bool {
		self.owner_ref.is_none()
	}

	/// Navigable handle on the root of the tree
	pub fn scope(&self) -> Scope<'_> {
		Scope::new(self, self.tree.root())
	}

	/// Whether a setting or namespace is declared at `path`
	pub fn exists(&self, path: &str) -> bool {
		self.tree.contains(path)
	}

	/// Definition of the setting at `path`
	pub fn definition(&self, path: &str) -> ClResult<&Definition> {
		self.tree.resolve_setting(path)
	}

	/// Current value of the setting at `path`
	pub async fn get(&self, path: &str) -> ClResult<SettingValue> {
		let def = self.tree.resolve_setting(path)?;
		self.value_of(def).await
	}

	/// Whether the setting at `path` has a persisted override
	pub async fn is_set(&self, path: &str) -> ClResult<bool> {
		let def = self.tree.resolve_setting(path)?;
		self.ensure_loaded().await?;
		Ok(self.cache.get(def.path()).is_some())
	}

	/// Write one setting
	pub async fn set(&self, path: &str, value: impl Into<SettingValue>) -> ClResult<WriteOutcome> {
		let def = self.tree.resolve_setting(path)?;
		self.write(def, value.into()).await
	}

	/// Write several settings, one after another
	///
	/// Not atomic: the first error stops the batch, and writes already
	/// applied stay applied.
	pub async fn update<I, K, V>(&self, values: I) -> ClResult<Vec<WriteOutcome>>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<SettingValue>,
	{
		let mut outcomes = Vec::new();
		for (path, value) in values {
			outcomes.push(self.set(path.as_ref(), value).await?);
		}
		Ok(outcomes)
	}

	/// Remove the persisted override of a setting, returning it to its default
	pub async fn reset(&self, path: &str) -> ClResult<bool> {
		let def = self.tree.resolve_setting(path)?;
		self.ensure_loaded().await?;

		let existed = self.adapter.delete(def.path(), self.owner_ref.as_ref(), self.name()).await?;
		self.cache.remove(def.path());
		if existed {
			info!("Setting '{}' reset in store {}{}", def.path(), self.name(), self.owner_suffix());
		}
		Ok(existed)
	}

	/// Cached records in insertion order
	pub async fn records(&self) -> ClResult<Vec<SettingRecord>> {
		self.ensure_loaded().await?;
		Ok(self.cache.records())
	}

	/// Raw stored value of any key, declared or not
	pub async fn raw(&self, key: &str) -> ClResult<Option<Box<str>>> {
		self.ensure_loaded().await?;
		Ok(self.cache.get(key).map(|record| record.raw_value))
	}

	/// Built-in attributes merged with the definition's custom ones
	///
	/// Built-ins are `key`, `type`, and `default` (static defaults only).
	/// Custom attributes win on conflict.
	pub fn merged_attributes(def: &Definition) -> BTreeMap<Box<str>, serde_json::Value> {
		let mut attributes = BTreeMap::new();
		attributes.insert("key".into(), serde_json::Value::from(def.path()));
		if let Some(spec) = def.spec() {
			attributes.insert("type".into(), serde_json::Value::from(spec.kind.name()));
			if let Some(default) = spec.default.as_static() {
				attributes.insert("default".into(), default.to_json());
			}
		}
		attributes.extend(def.attributes().iter().map(|(k, v)| (k.clone(), v.clone())));
		attributes
	}

	pub(crate) async fn value_of(&self, def: &Definition) -> ClResult<SettingValue> {
		self.ensure_loaded().await?;
		self.current(def)
	}

	pub(crate) async fn write(&self, def: &Definition, value: SettingValue) -> ClResult<WriteOutcome> {
		self.ensure_loaded().await?;

		// Unreadable stored values can always be overwritten
		let old = match self.current(def) {
			Err(Error::Coercion { .. }) => def
				.default_value()
				.ok_or_else(|| Error::WrongNode { path: def.path().into(), expected: "setting" })?,
			other => other?,
		};
		let new = self.admit(def, value)?;

		let ctx = WriteContext { definition: def, old: &old, new: &new, owner: self.owner() };
		let value = match def.validate(&ctx) {
			None => new,
			Some(Ok(derived)) if derived == new => new,
			Some(Ok(derived)) => self.admit(def, derived)?,
			Some(Err(rejection)) => {
				warn!(
					"Write to setting '{}' rejected{}: {}",
					def.path(),
					self.owner_suffix(),
					rejection
				);
				return Ok(WriteOutcome::Rejected(rejection));
			}
		};

		let kind = def.kind().unwrap_or(crate::value::SettingType::Custom);
		let raw = coercion::serialize(&value, kind);
		let record = self
			.adapter
			.create_or_update(def.path(), &raw, self.owner_ref.as_ref(), self.name())
			.await?;
		self.cache.put(record);
		info!("Setting '{}' updated in store {}{}", def.path(), self.name(), self.owner_suffix());

		for callback in def.callbacks() {
			if let Err(err) = callback(self.owner(), def, &value) {
				warn!("Post-write callback of setting '{}' failed: {}", def.path(), err);
			}
		}

		Ok(WriteOutcome::Written(value))
	}

	async fn ensure_loaded(&self) -> ClResult<()> {
		self.cache
			.ensure_loaded(|| self.adapter.find_all(self.owner_ref.as_ref(), self.name()))
			.await
	}

	/// Value from the (loaded) cache, or the default
	fn current(&self, def: &Definition) -> ClResult<SettingValue> {
		let default = || {
			def.default_value()
				.ok_or_else(|| Error::WrongNode { path: def.path().into(), expected: "setting" })
		};

		let Some(record) = self.cache.get(def.path()) else {
			return default();
		};

		let kind = def.kind().unwrap_or(crate::value::SettingType::Custom);
		match coercion::deserialize(&record.raw_value, kind) {
			Some(value) => Ok(value),
			None if self.opts.strict_reads => Err(Error::Coercion {
				path: def.path().into(),
				raw: record.raw_value,
				expected: kind.name(),
			}),
			None => {
				warn!(
					"Stored value {:?} of setting '{}' is not a {}, using default",
					record.raw_value,
					def.path(),
					kind
				);
				default()
			}
		}
	}

	/// Coerce an incoming value and check it against the options
	fn admit(&self, def: &Definition, value: SettingValue) -> ClResult<SettingValue> {
		let Some(spec) = def.spec() else {
			return Err(Error::WrongNode { path: def.path().into(), expected: "setting" });
		};

		let found = value.type_name();
		let value = coercion::coerce(value, spec.kind).ok_or_else(|| Error::TypeMismatch {
			path: def.path().into(),
			expected: spec.kind.name(),
			found,
		})?;

		if self.opts.enforce_options && spec.options_policy == OptionsPolicy::Enforce {
			let options = def.options();
			if !options.is_empty() && !options.contains(&value) {
				return Err(Error::NotAnOption {
					path: def.path().into(),
					value: value.to_string().into(),
				});
			}
		}

		Ok(value)
	}

	fn owner_suffix(&self) -> String {
		self.owner_ref.as_ref().map(|owner| format!(" for {}", owner)).unwrap_or_default()
	}
}

// vim: ts=4
