//! Client SDK for the Karrot REST API
//!
//! The state modules never talk HTTP themselves. They depend on the request
//! traits defined here, one per API service (messages, history, invitations),
//! so a deployment can hand them the reqwest-backed [`HttpApiClient`] while tests
//! hand them scripted in-process implementations.
//!
//! Every request resolves to a record, a cursor-paginated [`Page`], or an
//! [`ApiError`]. Validation failures are recognized here, at the boundary, so
//! callers receive field-keyed messages ready for form display.

use async_trait::async_trait;
use karrot_types::{
    ApiResult, ConversationId, Cursor, GroupId, HistoryEntry, HistoryFilter, Invitation, Message,
    NewInvitation, NewMessage, Page,
};
use std::sync::Arc;

pub mod http_client;

pub use http_client::HttpApiClient;

/// Conversation messages service.
#[async_trait]
pub trait MessagesApi: Send + Sync {
    /// First page of messages of a conversation, newest first
    async fn list_messages(&self, conversation: ConversationId) -> ApiResult<Page<Message>>;

    /// Page following `cursor`
    async fn list_more_messages(&self, cursor: &Cursor) -> ApiResult<Page<Message>>;

    async fn create_message(&self, message: NewMessage) -> ApiResult<Message>;
}

/// Activity history service.
#[async_trait]
pub trait HistoryApi: Send + Sync {
    async fn list_history(&self, filter: &HistoryFilter) -> ApiResult<Page<HistoryEntry>>;

    async fn list_more_history(&self, cursor: &Cursor) -> ApiResult<Page<HistoryEntry>>;
}

/// Group invitations service.
#[async_trait]
pub trait InvitationsApi: Send + Sync {
    /// Invitations sent for a group; this listing is not paginated
    async fn list_invitations(&self, group: GroupId) -> ApiResult<Vec<Invitation>>;

    async fn create_invitation(&self, invitation: NewInvitation) -> ApiResult<Invitation>;

    async fn accept_invitation(&self, token: &str) -> ApiResult<()>;
}

/// The whole API surface the state modules need.
pub trait ShareApi: MessagesApi + HistoryApi + InvitationsApi {}

impl<T: MessagesApi + HistoryApi + InvitationsApi> ShareApi for T {}

/// Factory for creating API clients
pub struct ApiClientFactory;

impl ApiClientFactory {
    /// Create an HTTP client for a remote server
    pub fn create_http_client(base_url: impl Into<String>) -> Arc<dyn ShareApi> {
        Arc::new(HttpApiClient::new(base_url))
    }
}
