//! Registry of named definition trees
//!
//! Schemas are declared into a mutable [`SettingsRegistry`] during
//! initialization, then frozen into a [`FrozenSettingsRegistry`] that is
//! shared read-only for the rest of the process.

use std::collections::HashMap;
use std::sync::Arc;

use crate::definition::DefinitionTree;
use crate::prelude::*;

/// Mutable registry used during initialization
#[derive(Debug, Default)]
pub struct SettingsRegistry {
	trees: HashMap<Box<str>, DefinitionTree>,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declare settings into the tree of `store_name`
	///
	/// Declaring the same store twice extends its tree.
	pub fn declare<F>(&mut self, store_name: &str, declare: F) -> ClResult<()>
	where
		F: FnOnce(&mut DefinitionTree) -> ClResult<()>,
	{
		if store_name.is_empty() {
			return Err(Error::Config("Store name must not be empty".into()));
		}

		let tree =
			self.trees.entry(store_name.into()).or_insert_with(|| DefinitionTree::new(store_name));
		declare(tree)?;
		debug!("Declared settings store '{}' ({} settings)", store_name, tree.len());
		Ok(())
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenSettingsRegistry {
		info!("Freezing settings registry with {} stores", self.trees.len());
		FrozenSettingsRegistry {
			trees: self.trees.into_iter().map(|(name, tree)| (name, Arc::new(tree))).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.trees.len()
	}

	pub fn is_empty(&self) -> bool {
		self.trees.is_empty()
	}
}

/// Immutable registry shared by every store
#[derive(Debug, Default)]
pub struct FrozenSettingsRegistry {
	trees: HashMap<Box<str>, Arc<DefinitionTree>>,
}

impl FrozenSettingsRegistry {
	/// Get the tree declared under a store name
	pub fn get(&self, store_name: &str) -> ClResult<&Arc<DefinitionTree>> {
		self.trees.get(store_name).ok_or_else(|| Error::UnknownStore(store_name.into()))
	}

	/// Declared store names, sorted
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.trees.keys().map(|name| &**name).collect();
		names.sort_unstable();
		names
	}

	pub fn len(&self) -> usize {
		self.trees.len()
	}

	pub fn is_empty(&self) -> bool {
		self.trees.is_empty()
	}
}


// vim: ts=4
