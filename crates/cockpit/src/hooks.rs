//! Write hooks and setting owners
//!
//! A setting may carry one [`SettingValidator`], run before a write is
//! persisted, and any number of [`PostWriteCallback`]s, run after it.
//! Validators can accept, reject, or replace the incoming value. Callbacks
//! are fire-and-forget: their failures are logged and never undo the write.

use std::any::Any;
use std::sync::Arc;

use crate::definition::Definition;
use crate::prelude::*;
use crate::value::SettingValue;

/// An entity that owns per-record settings
///
/// Callbacks receive the owner as `&dyn Configurable`; use
/// [`downcast_owner`] to reach the concrete type.
pub trait Configurable: Any + Send + Sync + 'static {
	fn owner_ref(&self) -> OwnerRef;
}

/// Downcast an owner to its concrete type
pub fn downcast_owner<T: Configurable>(owner: &dyn Configurable) -> Option<&T> {
	let any: &dyn Any = owner;
	any.downcast_ref::<T>()
}

/// Everything a validator sees about a pending write
pub struct WriteContext<'a> {
	pub definition: &'a Definition,
	/// Current value: the persisted override, or the default
	pub old: &'a SettingValue,
	/// Incoming value, already coerced to the setting's type
	pub new: &'a SettingValue,
	pub owner: Option<&'a dyn Configurable>,
}

/// Why a validator declined a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
	pub reason: Box<str>,
}

impl Rejection {
	pub fn new(reason: impl Into<Box<str>>) -> Self {
		Self { reason: reason.into() }
	}
}

impl std::fmt::Display for Rejection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.reason)
	}
}

/// Validator: returns the value to persist, or a rejection
pub type SettingValidator =
	Arc<dyn Fn(&WriteContext<'_>) -> Result<SettingValue, Rejection> + Send + Sync>;

/// Callback run after a value has been persisted
pub type PostWriteCallback =
	Arc<dyn Fn(Option<&dyn Configurable>, &Definition, &SettingValue) -> ClResult<()> + Send + Sync>;

/// Result of a single write
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
	/// The value was persisted (after coercion and validation)
	Written(SettingValue),
	/// A validator declined; the previous value stays authoritative
	Rejected(Rejection),
}

impl WriteOutcome {
	pub fn is_written(&self) -> bool {
		matches!(self, WriteOutcome::Written(_))
	}

	pub fn value(&self) -> Option<&SettingValue> {
		match self {
			WriteOutcome::Written(value) => Some(value),
			WriteOutcome::Rejected(_) => None,
		}
	}
}


// vim: ts=4
