pub use cockpit_types::prelude::*;

// vim: ts=4
