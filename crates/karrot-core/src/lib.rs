//! Client-side state for Karrot
//!
//! The modules here hold what a Karrot client has fetched from the REST API
//! and track the requests that are still running:
//!
//! - [`store::EntityStore`] keeps records normalized: a map by id plus the
//!   display order.
//! - [`status::RequestStatus`] follows one class of request through
//!   `Idle -> Waiting -> Success | Error`.
//! - [`pagination::PaginatedList`] combines both with a cursor to load a
//!   list page by page, dropping responses to superseded requests.
//! - [`Conversations`], [`History`] and [`Invitations`] are the domain modules
//!   built on top, grouped per session in [`Stores`].
//!
//! Every state change goes through a command enum applied by a [`Reducer`],
//! and every command is logged at debug level.

pub mod command;
pub mod config;
pub mod conversations;
pub mod errors;
pub mod history;
pub mod hooks;
pub mod invitations;
pub mod pagination;
pub mod status;
pub mod store;
pub mod stores;

pub use command::Reducer;
pub use config::{ConfigLoader, ShareConfig};
pub use conversations::{ConversationCommand, Conversations};
pub use errors::CoreError;
pub use history::History;
pub use hooks::{Alert, LoggingHooks, Route, SessionHooks};
pub use invitations::{InvitationCommand, Invitations};
pub use pagination::{FetchOutcome, PageSource, PaginatedList, SkipReason};
pub use status::{Phase, RequestStatus};
pub use store::EntityStore;
pub use stores::Stores;

/// Result type for operations outside of individual requests
pub type Result<T> = std::result::Result<T, CoreError>;
