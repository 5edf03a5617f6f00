//! Cockpit: typed, schema-driven settings.
//!
//! An application declares a nested schema of settings per named store,
//! then reads and writes them globally or per owner through a pluggable
//! [`StoreAdapter`](cockpit_types::store_adapter::StoreAdapter).
//!
//! # Architecture
//!
//! - **Definitions** (`definition.rs`): the schema tree, typed defaults, options, attributes
//! - **Coercion** (`coercion.rs`): typed values to and from their stored text form
//! - **Cache** (`cache.rs`): per-store write-through cache, loaded once
//! - **Store** (`store.rs`): get/set/update against one owner (or global)
//! - **Scope** (`scope.rs`): tree-walking accessors over a store
//! - **Registry / Service** (`registry.rs`, `service.rs`): named trees and the process-wide entry point

#![forbid(unsafe_code)]

pub mod cache;
pub mod coercion;
pub mod config;
pub mod definition;
pub mod hooks;
pub mod prelude;
pub mod registry;
pub mod scope;
pub mod service;
pub mod store;
pub mod value;

pub use config::CockpitOpts;
pub use definition::{Definition, DefinitionTree, SettingDefinitionBuilder};
pub use hooks::{Configurable, Rejection, WriteContext, WriteOutcome};
pub use registry::{FrozenSettingsRegistry, SettingsRegistry};
pub use scope::{Node, Scope, SettingHandle};
pub use service::Cockpit;
pub use store::Store;
pub use value::{SettingType, SettingValue};

pub use cockpit_types::{error, store_adapter, types};

// vim: ts=4
