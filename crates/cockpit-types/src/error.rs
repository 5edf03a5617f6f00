//! Error type shared by the engine and all store adapters

use thiserror::Error;

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// The path does not resolve in the definition tree
	#[error("unknown setting: {0}")]
	UnknownSetting(Box<str>),

	/// No definition tree was declared under this store name
	#[error("unknown settings store: {0}")]
	UnknownStore(Box<str>),

	/// The path resolves, but to the wrong kind of node
	#[error("'{path}' is not a {expected}")]
	WrongNode { path: Box<str>, expected: &'static str },

	/// A value being written cannot be coerced to the setting's type
	#[error("type mismatch for setting '{path}': expected {expected}, got {found}")]
	TypeMismatch { path: Box<str>, expected: &'static str, found: &'static str },

	/// A persisted raw value cannot be read back under the setting's type
	#[error("cannot read stored value {raw:?} of setting '{path}' as {expected}")]
	Coercion { path: Box<str>, raw: Box<str>, expected: &'static str },

	/// The value is not one of the setting's allowed options
	#[error("value {value} is not an allowed option of setting '{path}'")]
	NotAnOption { path: Box<str>, value: Box<str> },

	/// Invalid schema declaration or engine configuration
	#[error("configuration error: {0}")]
	Config(String),

	/// Persistence failure reported by a store adapter
	#[error("store adapter error: {0}")]
	Adapter(String),
}

// vim: ts=4
