//! Setting definitions and the definition tree
//!
//! A [`DefinitionTree`] is the schema of one settings store: a tree of
//! namespaces whose leaves are typed settings. Paths are dot-separated
//! (`"asset.thumb.width"`) and identify exactly one node.
//!
//! Trees are built once while declaring the schema, then shared read-only
//! by every store of that name.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::coercion;
use crate::hooks::{PostWriteCallback, SettingValidator, WriteContext};
use crate::prelude::*;
use crate::value::{SettingType, SettingValue};

pub const PATH_SEPARATOR: char = '.';

/// Free-form metadata attached to a definition ("title", "tip", ...)
pub type Attributes = BTreeMap<Box<str>, serde_json::Value>;

/// Producer for lazily computed values
pub type Producer<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Default value of a setting
#[derive(Clone)]
pub enum DefaultValue {
	Static(SettingValue),
	/// Evaluated on every read, never cached
	Producer(Producer<SettingValue>),
}

impl DefaultValue {
	pub fn evaluate(&self) -> SettingValue {
		match self {
			DefaultValue::Static(value) => value.clone(),
			DefaultValue::Producer(producer) => producer(),
		}
	}

	pub fn as_static(&self) -> Option<&SettingValue> {
		match self {
			DefaultValue::Static(value) => Some(value),
			DefaultValue::Producer(_) => None,
		}
	}
}

impl Debug for DefaultValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
			Self::Producer(_) => f.debug_tuple("Producer").field(&"<function>").finish(),
		}
	}
}

/// Allowed values of a setting
#[derive(Clone, Default)]
pub enum SettingOptions {
	#[default]
	Any,
	Fixed(Vec<SettingValue>),
	/// Evaluated whenever the options are needed
	Producer(Producer<Vec<SettingValue>>),
}

impl SettingOptions {
	/// Current option list; empty means unrestricted
	pub fn evaluate(&self) -> Vec<SettingValue> {
		match self {
			SettingOptions::Any => Vec::new(),
			SettingOptions::Fixed(values) => values.clone(),
			SettingOptions::Producer(producer) => producer(),
		}
	}

	pub fn is_any(&self) -> bool {
		matches!(self, SettingOptions::Any)
	}
}

impl Debug for SettingOptions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Any => write!(f, "Any"),
			Self::Fixed(values) => f.debug_tuple("Fixed").field(values).finish(),
			Self::Producer(_) => f.debug_tuple("Producer").field(&"<function>").finish(),
		}
	}
}

/// What happens when a written value is not one of the options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionsPolicy {
	#[default]
	Enforce,
	Permissive,
}

/// The settable part of a leaf definition
#[derive(Clone)]
pub struct SettingSpec {
	pub default: DefaultValue,
	pub kind: SettingType,
	pub options: SettingOptions,
	pub options_policy: OptionsPolicy,
	pub validator: Option<SettingValidator>,
	pub callbacks: Vec<PostWriteCallback>,
}

impl Debug for SettingSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingSpec")
			.field("default", &self.default)
			.field("kind", &self.kind)
			.field("options", &self.options)
			.field("options_policy", &self.options_policy)
			.field("validator", &self.validator.is_some())
			.field("callbacks", &self.callbacks.len())
			.finish()
	}
}

#[derive(Debug, Clone)]
pub enum DefinitionBody {
	Setting(SettingSpec),
	Namespace(Vec<Definition>),
}

/// A node of the definition tree
#[derive(Debug, Clone)]
pub struct Definition {
	name: Box<str>,
	path: Box<str>,
	attributes: Attributes,
	body: DefinitionBody,
}

impl Definition {
	/// Create a builder for a setting at a dotted path
	pub fn builder(path: impl Into<String>) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder::new(path)
	}

	fn namespace(name: &str, path: String) -> Self {
		Self {
			name: name.into(),
			path: path.into(),
			attributes: Attributes::new(),
			body: DefinitionBody::Namespace(Vec::new()),
		}
	}

	/// Last path segment
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Full dotted path from the root
	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
		self.attributes.get(key)
	}

	pub fn body(&self) -> &DefinitionBody {
		&self.body
	}

	pub fn is_namespace(&self) -> bool {
		matches!(self.body, DefinitionBody::Namespace(_))
	}

	pub fn is_setting(&self) -> bool {
		matches!(self.body, DefinitionBody::Setting(_))
	}

	pub fn spec(&self) -> Option<&SettingSpec> {
		match &self.body {
			DefinitionBody::Setting(spec) => Some(spec),
			DefinitionBody::Namespace(_) => None,
		}
	}

	/// Declared or inferred type; `None` for namespaces
	pub fn kind(&self) -> Option<SettingType> {
		self.spec().map(|spec| spec.kind)
	}

	/// Current default, evaluating a producer if needed
	pub fn default_value(&self) -> Option<SettingValue> {
		let spec = self.spec()?;
		let value = spec.default.evaluate();
		// Producers are free to return loosely typed values
		Some(coercion::coerce(value.clone(), spec.kind).unwrap_or(value))
	}

	/// Current option list; empty for unrestricted settings and namespaces
	pub fn options(&self) -> Vec<SettingValue> {
		self.spec()
			.map(|spec| {
				spec.options
					.evaluate()
					.into_iter()
					.map(|value| coercion::coerce(value.clone(), spec.kind).unwrap_or(value))
					.collect()
			})
			.unwrap_or_default()
	}

	pub fn children(&self) -> &[Definition] {
		match &self.body {
			DefinitionBody::Namespace(children) => children,
			DefinitionBody::Setting(_) => &[],
		}
	}

	pub fn child(&self, name: &str) -> Option<&Definition> {
		self.children().iter().find(|child| &*child.name == name)
	}

	/// Run the validator, if any. Without one every value is accepted as is.
	pub(crate) fn validate(
		&self,
		ctx: &WriteContext<'_>,
	) -> Option<Result<SettingValue, crate::hooks::Rejection>> {
		self.spec()?.validator.as_ref().map(|validator| validator(ctx))
	}

	pub(crate) fn callbacks(&self) -> &[PostWriteCallback] {
		self.spec().map(|spec| spec.callbacks.as_slice()).unwrap_or_default()
	}
}

/// Builder for setting definitions with fluent API
pub struct SettingDefinitionBuilder {
	path: String,
	default: Option<DefaultValue>,
	kind: Option<SettingType>,
	options: SettingOptions,
	options_policy: OptionsPolicy,
	attributes: Attributes,
	validator: Option<SettingValidator>,
	callbacks: Vec<PostWriteCallback>,
}

impl SettingDefinitionBuilder {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			default: None,
			kind: None,
			options: SettingOptions::Any,
			options_policy: OptionsPolicy::Enforce,
			attributes: Attributes::new(),
			validator: None,
			callbacks: Vec::new(),
		}
	}

	/// Set a static default; the type is inferred from it unless given
	pub fn default(mut self, value: impl Into<SettingValue>) -> Self {
		self.default = Some(DefaultValue::Static(value.into()));
		self
	}

	/// Set a default computed on every read
	///
	/// Without an explicit [`kind`](Self::kind) the setting is `Custom` and
	/// accepts any value, kept in its JSON form (timestamps read as text).
	pub fn default_with<F>(mut self, producer: F) -> Self
	where
		F: Fn() -> SettingValue + Send + Sync + 'static,
	{
		self.default = Some(DefaultValue::Producer(Arc::new(producer)));
		self
	}

	/// Set the type explicitly instead of inferring it from the default
	pub fn kind(mut self, kind: SettingType) -> Self {
		self.kind = Some(kind);
		self
	}

	/// Restrict the setting to a fixed list of values
	pub fn options<I, V>(mut self, options: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<SettingValue>,
	{
		self.options = SettingOptions::Fixed(options.into_iter().map(Into::into).collect());
		self
	}

	/// Restrict the setting to a list computed at write time
	pub fn options_with<F>(mut self, producer: F) -> Self
	where
		F: Fn() -> Vec<SettingValue> + Send + Sync + 'static,
	{
		self.options = SettingOptions::Producer(Arc::new(producer));
		self
	}

	/// Accept values outside the options list
	pub fn permissive_options(mut self) -> Self {
		self.options_policy = OptionsPolicy::Permissive;
		self
	}

	pub fn attr(mut self, key: impl Into<Box<str>>, value: impl Into<serde_json::Value>) -> Self {
		self.attributes.insert(key.into(), value.into());
		self
	}

	pub fn validator<F>(mut self, f: F) -> Self
	where
		F: Fn(&WriteContext<'_>) -> Result<SettingValue, crate::hooks::Rejection>
			+ Send
			+ Sync
			+ 'static,
	{
		self.validator = Some(Arc::new(f));
		self
	}

	/// Add a callback run after each successful write
	pub fn on_write<F>(mut self, f: F) -> Self
	where
		F: Fn(Option<&dyn crate::hooks::Configurable>, &Definition, &SettingValue) -> ClResult<()>
			+ Send
			+ Sync
			+ 'static,
	{
		self.callbacks.push(Arc::new(f));
		self
	}

	pub fn build(self) -> ClResult<Definition> {
		let segments = split_path(&self.path)?;
		let name = segments.last().copied().unwrap_or_default();

		let default = self
			.default
			.ok_or_else(|| Error::Config(format!("Setting '{}' has no default", self.path)))?;

		let kind = match (self.kind, &default) {
			(Some(kind), _) => kind,
			(None, DefaultValue::Static(value)) => SettingType::infer(value),
			(None, DefaultValue::Producer(_)) => SettingType::Custom,
		};

		let default = match default {
			DefaultValue::Static(value) => {
				let found = value.type_name();
				DefaultValue::Static(coercion::coerce(value, kind).ok_or_else(|| {
					Error::Config(format!(
						"Default of setting '{}' is a {}, not a {}",
						self.path, found, kind
					))
				})?)
			}
			producer @ DefaultValue::Producer(_) => producer,
		};

		let options = match self.options {
			SettingOptions::Fixed(values) => SettingOptions::Fixed(
				values
					.into_iter()
					.map(|value| {
						let shown = value.to_string();
						coercion::coerce(value, kind).ok_or_else(|| {
							Error::Config(format!(
								"Option {} of setting '{}' is not a {}",
								shown, self.path, kind
							))
						})
					})
					.collect::<ClResult<Vec<_>>>()?,
			),
			other => other,
		};

		Ok(Definition {
			name: name.into(),
			path: self.path.as_str().into(),
			attributes: self.attributes,
			body: DefinitionBody::Setting(SettingSpec {
				default,
				kind,
				options,
				options_policy: self.options_policy,
				validator: self.validator,
				callbacks: self.callbacks,
			}),
		})
	}
}

/// Schema of one named settings store
#[derive(Debug, Clone)]
pub struct DefinitionTree {
	name: Box<str>,
	root: Definition,
}

impl DefinitionTree {
	pub fn new(name: impl Into<Box<str>>) -> Self {
		Self { name: name.into(), root: Definition::namespace("", String::new()) }
	}

	/// Store name this tree was declared under
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn root(&self) -> &Definition {
		&self.root
	}

	/// Insert or replace a setting, creating parent namespaces as needed
	pub fn define(&mut self, builder: SettingDefinitionBuilder) -> ClResult<()> {
		self.insert(builder.build()?)
	}

	/// Insert or replace an already built definition
	pub fn insert(&mut self, definition: Definition) -> ClResult<()> {
		let segments = split_path(&definition.path)?;
		let parents = &segments[..segments.len() - 1];

		let mut node = &mut self.root;
		for segment in parents {
			node = ensure_namespace(node, segment)?;
		}

		let DefinitionBody::Namespace(children) = &mut node.body else {
			return Err(Error::Config(format!("Cannot declare '{}' under a setting", definition.path)));
		};

		debug!("Defining setting {}:{}", self.name, definition.path);
		match children.iter().position(|child| child.name == definition.name) {
			Some(idx) => children[idx] = definition,
			None => children.push(definition),
		}
		Ok(())
	}

	/// Declare a namespace and merge attributes into it
	pub fn namespace<I, K, V>(&mut self, path: &str, attributes: I) -> ClResult<()>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<Box<str>>,
		V: Into<serde_json::Value>,
	{
		let segments = split_path(path)?;

		let mut node = &mut self.root;
		for segment in &segments {
			node = ensure_namespace(node, segment)?;
		}
		node.attributes.extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
		Ok(())
	}

	/// Find the node at a dotted path; the empty path is the root
	pub fn resolve(&self, path: &str) -> ClResult<&Definition> {
		if path.is_empty() {
			return Ok(&self.root);
		}

		let mut node = &self.root;
		for segment in path.split(PATH_SEPARATOR) {
			node = node.child(segment).ok_or_else(|| Error::UnknownSetting(path.into()))?;
		}
		Ok(node)
	}

	/// Find a settable leaf at a dotted path
	pub fn resolve_setting(&self, path: &str) -> ClResult<&Definition> {
		let def = self.resolve(path)?;
		if def.is_setting() {
			Ok(def)
		} else {
			Err(Error::WrongNode { path: path.into(), expected: "setting" })
		}
	}

	pub fn contains(&self, path: &str) -> bool {
		self.resolve(path).is_ok()
	}

	/// All settings, depth first in declaration order
	pub fn settings(&self) -> Vec<&Definition> {
		fn collect<'a>(node: &'a Definition, out: &mut Vec<&'a Definition>) {
			for child in node.children() {
				if child.is_setting() {
					out.push(child);
				} else {
					collect(child, out);
				}
			}
		}

		let mut out = Vec::new();
		collect(&self.root, &mut out);
		out
	}

	/// Number of settings (namespaces not counted)
	pub fn len(&self) -> usize {
		self.settings().len()
	}

	pub fn is_empty(&self) -> bool {
		self.settings().is_empty()
	}
}

fn split_path(path: &str) -> ClResult<Vec<&str>> {
	let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
	if path.is_empty() || segments.iter().any(|segment| segment.is_empty()) {
		return Err(Error::Config(format!("Invalid setting path '{}'", path)));
	}
	Ok(segments)
}

fn ensure_namespace<'a>(node: &'a mut Definition, segment: &str) -> ClResult<&'a mut Definition> {
	let path = if node.path.is_empty() {
		segment.to_string()
	} else {
		format!("{}{}{}", node.path, PATH_SEPARATOR, segment)
	};

	let DefinitionBody::Namespace(children) = &mut node.body else {
		return Err(Error::Config(format!("Cannot declare '{}' under a setting", path)));
	};

	let idx = match children.iter().position(|child| &*child.name == segment) {
		Some(idx) => idx,
		None => {
			children.push(Definition::namespace(segment, path.clone()));
			children.len() - 1
		}
	};

	let child = &mut children[idx];
	if child.is_setting() {
		return Err(Error::Config(format!("'{}' is a setting, not a namespace", path)));
	}
	Ok(child)
}


// vim: ts=4
