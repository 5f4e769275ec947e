//! Consolidated test mocks for the Karrot client workspace
//!
//! This crate provides scripted implementations of the REST boundary so the
//! state modules can be exercised without a server, including responses held
//! back behind gates to reproduce overlapping requests.

pub mod api;
pub mod fixtures;
pub mod script;

pub use api::*;
pub use fixtures::*;
pub use script::*;
