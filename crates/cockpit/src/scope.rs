//! Tree-walking accessors over a store
//!
//! A [`Scope`] is a handle on one namespace of a store. Each step down the
//! tree yields a [`Node`]: another scope for namespaces, or a
//! [`SettingHandle`] for settings.
//!
//! ```ignore
//! let width = store.scope().namespace("asset")?.namespace("thumb")?.setting("width")?;
//! width.set(200).await?;
//! assert_eq!(width.value().await?, SettingValue::Int(200));
//! ```

use std::collections::BTreeMap;

use crate::definition::{Attributes, Definition, PATH_SEPARATOR};
use crate::hooks::WriteOutcome;
use crate::prelude::*;
use crate::store::Store;
use crate::value::{SettingType, SettingValue};

pub enum Node<'a> {
	Namespace(Scope<'a>),
	Setting(SettingHandle<'a>),
}

impl<'a> Node<'a> {
	pub fn definition(&self) -> &'a Definition {
		match self {
			Node::Namespace(scope) => scope.node,
			Node::Setting(handle) => handle.def,
		}
	}

	pub fn into_namespace(self) -> ClResult<Scope<'a>> {
		match self {
			Node::Namespace(scope) => Ok(scope),
			Node::Setting(handle) => {
				Err(Error::WrongNode { path: handle.def.path().into(), expected: "namespace" })
			}
		}
	}

	pub fn into_setting(self) -> ClResult<SettingHandle<'a>> {
		match self {
			Node::Setting(handle) => Ok(handle),
			Node::Namespace(scope) => {
				Err(Error::WrongNode { path: scope.node.path().into(), expected: "setting" })
			}
		}
	}

	fn wrap(store: &'a Store, def: &'a Definition) -> Self {
		if def.is_namespace() {
			Node::Namespace(Scope::new(store, def))
		} else {
			Node::Setting(SettingHandle { store, def })
		}
	}
}

/// Handle on a namespace of a store
#[derive(Clone, Copy)]
pub struct Scope<'a> {
	store: &'a Store,
	node: &'a Definition,
}

impl<'a> Scope<'a> {
	pub(crate) fn new(store: &'a Store, node: &'a Definition) -> Self {
		Self { store, node }
	}

	/// Dotted path of this namespace; empty for the root
	pub fn path(&self) -> &'a str {
		self.node.path()
	}

	pub fn attributes(&self) -> &'a Attributes {
		self.node.attributes()
	}

	/// Whether a direct child with this name is declared
	pub fn has(&self, name: &str) -> bool {
		self.node.child(name).is_some()
	}

	pub fn child(&self, name: &str) -> ClResult<Node<'a>> {
		let def = self.node.child(name).ok_or_else(|| Error::UnknownSetting(self.join(name).into()))?;
		Ok(Node::wrap(self.store, def))
	}

	pub fn namespace(&self, name: &str) -> ClResult<Scope<'a>> {
		self.child(name)?.into_namespace()
	}

	pub fn setting(&self, name: &str) -> ClResult<SettingHandle<'a>> {
		self.child(name)?.into_setting()
	}

	/// Walk a dotted path relative to this namespace
	pub fn walk(&self, path: &str) -> ClResult<Node<'a>> {
		let full = self.join(path);
		let def = self.store.tree().resolve(&full)?;
		Ok(Node::wrap(self.store, def))
	}

	/// Direct children in declaration order
	pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
		let store = self.store;
		self.node.children().iter().map(move |def| Node::wrap(store, def))
	}

	fn join(&self, path: &str) -> String {
		if self.node.path().is_empty() {
			path.to_string()
		} else {
			format!("{}{}{}", self.node.path(), PATH_SEPARATOR, path)
		}
	}
}

/// Handle on one setting of a store
#[derive(Clone, Copy)]
pub struct SettingHandle<'a> {
	store: &'a Store,
	def: &'a Definition,
}

impl<'a> SettingHandle<'a> {
	pub fn definition(&self) -> &'a Definition {
		self.def
	}

	pub fn path(&self) -> &'a str {
		self.def.path()
	}

	pub fn kind(&self) -> SettingType {
		self.def.kind().unwrap_or(SettingType::Custom)
	}

	pub fn options(&self) -> Vec<SettingValue> {
		self.def.options()
	}

	/// Built-in attributes merged with the custom ones
	pub fn attributes(&self) -> BTreeMap<Box<str>, serde_json::Value> {
		Store::merged_attributes(self.def)
	}

	pub async fn value(&self) -> ClResult<SettingValue> {
		self.store.value_of(self.def).await
	}

	pub async fn set(&self, value: impl Into<SettingValue>) -> ClResult<WriteOutcome> {
		self.store.write(self.def, value.into()).await
	}

	pub async fn reset(&self) -> ClResult<bool> {
		self.store.reset(self.def.path()).await
	}
}

// vim: ts=4
