//! Engine options

use serde::Deserialize;

use crate::prelude::*;

pub const DEFAULT_STORE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CockpitOpts {
	/// Store name used by [`Cockpit::global`](crate::Cockpit::global)
	pub default_store: Box<str>,
	/// Reject values outside a setting's options (unless the setting opts out)
	pub enforce_options: bool,
	/// Fail reads of stored values that no longer match the setting's type,
	/// instead of falling back to the default
	pub strict_reads: bool,
}

impl Default for CockpitOpts {
	fn default() -> Self {
		Self { default_store: DEFAULT_STORE.into(), enforce_options: true, strict_reads: false }
	}
}

impl CockpitOpts {
	/// Read options from `COCKPIT_*` environment variables
	pub fn from_env() -> ClResult<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	fn from_lookup<F>(lookup: F) -> ClResult<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut opts = Self::default();
		if let Some(store) = lookup("COCKPIT_DEFAULT_STORE") {
			if store.is_empty() {
				return Err(Error::Config("COCKPIT_DEFAULT_STORE must not be empty".into()));
			}
			opts.default_store = store.into();
		}
		if let Some(value) = lookup("COCKPIT_ENFORCE_OPTIONS") {
			opts.enforce_options = parse_flag("COCKPIT_ENFORCE_OPTIONS", &value)?;
		}
		if let Some(value) = lookup("COCKPIT_STRICT_READS") {
			opts.strict_reads = parse_flag("COCKPIT_STRICT_READS", &value)?;
		}
		Ok(opts)
	}
}

fn parse_flag(name: &str, value: &str) -> ClResult<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(Error::Config(format!("{} must be a boolean, got '{}'", name, value))),
	}
}


// vim: ts=4
