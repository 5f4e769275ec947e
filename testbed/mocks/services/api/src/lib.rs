//! Mock Karrot REST API server
//!
//! Serves the messages, history and invitations endpoints from an in-memory
//! fixture so the HTTP client and the CLI can be exercised end to end. Lists are
//! cursor-paginated with the offset of the next page as cursor, handed out as a
//! path relative to the server root.

pub mod fixtures;
pub mod handlers;
pub mod server;

pub use fixtures::ApiFixture;
pub use server::{MockServer, SharedFixture};
