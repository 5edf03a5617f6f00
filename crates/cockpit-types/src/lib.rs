//! Shared types, the store adapter trait, and the error type for Cockpit.
//!
//! This crate holds everything a persistence backend needs to implement a
//! [`store_adapter::StoreAdapter`] without depending on the settings engine
//! itself.

#![forbid(unsafe_code)]

pub mod error;
pub mod prelude;
pub mod store_adapter;
pub mod types;

// vim: ts=4
