//! Test adapter, owners, and schema fixtures
//!
//! `MemoryAdapter` keeps records in insertion order and counts every call,
//! so tests can assert how often the engine reaches the persistence layer.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use cockpit::definition::Definition;
use cockpit::hooks::{Configurable, Rejection, downcast_owner};
use cockpit::registry::SettingsRegistry;
use cockpit::store_adapter::StoreAdapter;
use cockpit::{Cockpit, CockpitOpts, SettingType, SettingValue};
use cockpit_types::prelude::*;

/// Common test setup helper
pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

#[derive(Debug, Default)]
pub struct CallCounts {
	pub find: AtomicUsize,
	pub find_all: AtomicUsize,
	pub create_or_update: AtomicUsize,
	pub delete: AtomicUsize,
}

impl CallCounts {
	pub fn find_all(&self) -> usize {
		self.find_all.load(Ordering::SeqCst)
	}

	pub fn writes(&self) -> usize {
		self.create_or_update.load(Ordering::SeqCst)
	}

	pub fn total(&self) -> usize {
		self.find.load(Ordering::SeqCst)
			+ self.find_all.load(Ordering::SeqCst)
			+ self.create_or_update.load(Ordering::SeqCst)
			+ self.delete.load(Ordering::SeqCst)
	}
}

#[derive(Debug, Default)]
pub struct MemoryAdapter {
	records: Mutex<Vec<SettingRecord>>,
	clock: AtomicUsize,
	pub calls: CallCounts,
	/// Fail every call with an adapter error
	pub offline: AtomicBool,
}

impl MemoryAdapter {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Insert a record behind the engine's back
	pub fn seed(&self, key: &str, raw_value: &str, owner: Option<&OwnerRef>, store_name: &str) {
		let now = self.tick();
		self.records.lock().push(SettingRecord {
			key: key.into(),
			raw_value: raw_value.into(),
			owner: owner.cloned(),
			store_name: store_name.into(),
			created_at: now,
			updated_at: now,
		});
	}

	/// Every persisted record of an owner in a store
	pub fn stored(&self, owner: Option<&OwnerRef>, store_name: &str) -> Vec<SettingRecord> {
		self.records
			.lock()
			.iter()
			.filter(|r| r.owner.as_ref() == owner && &*r.store_name == store_name)
			.cloned()
			.collect()
	}

	pub fn stored_value(&self, key: &str, owner: Option<&OwnerRef>, store_name: &str) -> Option<String> {
		self.stored(owner, store_name)
			.into_iter()
			.find(|r| &*r.key == key)
			.map(|r| r.raw_value.to_string())
	}

	fn tick(&self) -> Timestamp {
		#[allow(clippy::cast_possible_wrap)]
		Timestamp(self.clock.fetch_add(1, Ordering::SeqCst) as i64)
	}

	fn check_online(&self) -> ClResult<()> {
		if self.offline.load(Ordering::SeqCst) {
			Err(Error::Adapter("connection refused".into()))
		} else {
			Ok(())
		}
	}
}

fn matches(record: &SettingRecord, key: &str, owner: Option<&OwnerRef>, store_name: &str) -> bool {
	&*record.key == key && record.owner.as_ref() == owner && &*record.store_name == store_name
}

#[async_trait]
impl StoreAdapter for MemoryAdapter {
	async fn find(
		&self,
		key: &str,
		owner: Option<&OwnerRef>,
		store_name: &str,
	) -> ClResult<Option<SettingRecord>> {
		self.calls.find.fetch_add(1, Ordering::SeqCst);
		self.check_online()?;
		Ok(self.records.lock().iter().find(|r| matches(r, key, owner, store_name)).cloned())
	}

	async fn find_all(
		&self,
		owner: Option<&OwnerRef>,
		store_name: &str,
	) -> ClResult<Vec<SettingRecord>> {
		self.calls.find_all.fetch_add(1, Ordering::SeqCst);
		self.check_online()?;
		Ok(self.stored(owner, store_name))
	}

	async fn create_or_update(
		&self,
		key: &str,
		raw_value: &str,
		owner: Option<&OwnerRef>,
		store_name: &str,
	) -> ClResult<SettingRecord> {
		self.calls.create_or_update.fetch_add(1, Ordering::SeqCst);
		self.check_online()?;

		let now = self.tick();
		let mut records = self.records.lock();
		if let Some(record) = records.iter_mut().find(|r| matches(r, key, owner, store_name)) {
			record.raw_value = raw_value.into();
			record.updated_at = now;
			return Ok(record.clone());
		}

		let record = SettingRecord {
			key: key.into(),
			raw_value: raw_value.into(),
			owner: owner.cloned(),
			store_name: store_name.into(),
			created_at: now,
			updated_at: now,
		};
		records.push(record.clone());
		Ok(record)
	}

	async fn delete(&self, key: &str, owner: Option<&OwnerRef>, store_name: &str) -> ClResult<bool> {
		self.calls.delete.fetch_add(1, Ordering::SeqCst);
		self.check_online()?;

		let mut records = self.records.lock();
		let before = records.len();
		records.retain(|r| !matches(r, key, owner, store_name));
		Ok(records.len() != before)
	}
}

/// Owner with fields that callbacks write into
#[derive(Debug, Default)]
pub struct User {
	pub id: u32,
	pub name: Mutex<Option<String>>,
	pub car: Mutex<Option<String>>,
}

impl User {
	pub fn new(id: u32) -> Arc<Self> {
		Arc::new(Self { id, ..Self::default() })
	}
}

impl Configurable for User {
	fn owner_ref(&self) -> OwnerRef {
		OwnerRef::new("User", self.id)
	}
}

/// Global schema modelled on a small blog engine
pub fn declare_site_settings(registry: &mut SettingsRegistry) -> ClResult<()> {
	registry.declare("default", |tree| {
		tree.namespace("asset", [("title", "Asset (and related) Settings")])?;
		for (size, width, height) in [("thumb", 100, 100), ("medium", 600, 250), ("large", 600, 295)] {
			tree.define(
				Definition::builder(format!("asset.{size}.width"))
					.default(width)
					.attr("tip", format!("{size}'s width")),
			)?;
			tree.define(
				Definition::builder(format!("asset.{size}.height"))
					.default(height)
					.attr("tip", format!("{size}'s height")),
			)?;
		}

		tree.namespace("authentication", [("title", "Authentication Settings")])?;
		tree.define(Definition::builder("authentication.use_open_id").default(true))?;
		tree.define(Definition::builder("authentication.use_oauth").default(true))?;

		tree.define(Definition::builder("page.per_page").default(10))?;
		tree.define(Definition::builder("page.feed_per_page").default(10))?;

		tree.define(Definition::builder("site.title").default("Martini"))?;
		tree.define(
			Definition::builder("site.week_starts_on")
				.default("Monday")
				.options(["Monday", "Sunday", "Friday"]),
		)?;
		tree.define(
			Definition::builder("site.language").default("en-US").options(["en-US", "de"]).permissive_options(),
		)?;
		tree.define(
			Definition::builder("site.timezone")
				.default_with(|| SettingValue::from("UTC"))
				.kind(SettingType::String)
				.options_with(|| vec!["UTC".into(), "Europe/Budapest".into()]),
		)?;
		tree.namespace("site.teasers", [("title", "Teasers")])?;
		tree.define(Definition::builder("site.teasers.disable").default(false))?;
		tree.define(Definition::builder("site.teasers.left").default(1).attr("title", "Left Teaser"))?;
		tree.define(Definition::builder("site.teasers.right").default(2))?;
		tree.define(Definition::builder("site.teasers.center").default(3))?;
		Ok(())
	})?;

	registry.declare("more_settings", |tree| {
		tree.define(Definition::builder("hello").default("world"))?;
		tree.define(Definition::builder("clock.now").default_with(|| chrono::Utc::now().into()))
	})
}

/// Per-user schema with every inferred type, attributes, and hooks
pub fn declare_user_settings(registry: &mut SettingsRegistry) -> ClResult<()> {
	registry.declare("user", |tree| {
		tree.define(Definition::builder("implicitly_typed.string").default("Lance"))?;
		tree.define(Definition::builder("implicitly_typed.array").default(["red", "green", "blue"]))?;
		tree.define(Definition::builder("implicitly_typed.integer").default(1))?;
		tree.define(Definition::builder("implicitly_typed.float").default(1.0))?;
		tree.define(
			Definition::builder("implicitly_typed.datetime")
				.default("2001-01-01")
				.kind(SettingType::DateTime),
		)?;

		tree.define(
			Definition::builder("with_attributes.array")
				.default(["red", "green", "blue"])
				.attr("title", "Colors")
				.attr("tip", "Pick your colors"),
		)?;

		tree.define(Definition::builder("settings_with_callbacks.name").default("").on_write(
			|owner, _, value| {
				if let Some(user) = owner.and_then(downcast_owner::<User>) {
					*user.name.lock() = value.as_str().map(str::to_string);
				}
				Ok(())
			},
		))?;
		tree.define(Definition::builder("settings_with_callbacks.car").default("").on_write(
			|owner, _, value| {
				if let Some(user) = owner.and_then(downcast_owner::<User>) {
					*user.car.lock() = value.as_str().map(str::to_string);
				}
				Ok(())
			},
		))?;
		tree.define(
			Definition::builder("settings_with_callbacks.nope")
				.default("I'm invalid")
				.validator(|_| Err(Rejection::new("this setting is locked"))),
		)?;
		tree.define(
			Definition::builder("settings_with_callbacks.birthday")
				.default("1970-01-01")
				.kind(SettingType::DateTime)
				.validator(|ctx| {
					if let Some(user) = ctx.owner.and_then(downcast_owner::<User>) {
						*user.name.lock() = Some("Lance".into());
					}
					Ok(ctx.new.clone())
				}),
		)?;
		tree.define(
			Definition::builder("settings_with_callbacks.shout")
				.default("hello")
				.validator(|ctx| match ctx.new.as_str() {
					Some(s) => Ok(SettingValue::from(s.to_uppercase())),
					None => Err(Rejection::new("not text")),
				}),
		)?;
		tree.define(
			Definition::builder("settings_with_callbacks.flaky")
				.default(0)
				.on_write(|_, def, _| Err(Error::Config(format!("{} callback failed", def.path())))),
		)?;
		Ok(())
	})
}

pub fn build_cockpit(adapter: Arc<MemoryAdapter>) -> Cockpit {
	build_cockpit_with(adapter, CockpitOpts::default())
}

pub fn build_cockpit_with(adapter: Arc<MemoryAdapter>, opts: CockpitOpts) -> Cockpit {
	let mut registry = SettingsRegistry::new();
	declare_site_settings(&mut registry).expect("site settings");
	declare_user_settings(&mut registry).expect("user settings");
	Cockpit::new(registry.freeze(), adapter, opts)
}

// vim: ts=4
