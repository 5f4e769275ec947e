//! Scripted implementation of the whole REST boundary

use async_trait::async_trait;
use karrot_client::{HistoryApi, InvitationsApi, MessagesApi};
use karrot_types::{
    ApiResult, ConversationId, Cursor, GroupId, HistoryEntry, HistoryFilter, Invitation, Message,
    NewInvitation, NewMessage, Page,
};
use std::sync::Mutex;

use crate::script::Script;

/// A request as the mock received it.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListMessages(ConversationId),
    ListMoreMessages(Cursor),
    CreateMessage(NewMessage),
    ListHistory(HistoryFilter),
    ListMoreHistory(Cursor),
    ListInvitations(GroupId),
    CreateInvitation(NewInvitation),
    AcceptInvitation(String),
}

/// One response queue per endpoint, plus a log of every request.
#[derive(Default)]
pub struct MockShareApi {
    pub message_pages: Script<Page<Message>>,
    pub more_message_pages: Script<Page<Message>>,
    pub created_messages: Script<Message>,
    pub history_pages: Script<Page<HistoryEntry>>,
    pub more_history_pages: Script<Page<HistoryEntry>>,
    pub invitation_lists: Script<Vec<Invitation>>,
    pub created_invitations: Script<Invitation>,
    pub accepted_invitations: Script<()>,
    requests: Mutex<Vec<ApiCall>>,
}

impl MockShareApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<ApiCall> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn record(&self, call: ApiCall) {
        self.requests.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MessagesApi for MockShareApi {
    async fn list_messages(&self, conversation: ConversationId) -> ApiResult<Page<Message>> {
        self.record(ApiCall::ListMessages(conversation));
        self.message_pages.next().await
    }

    async fn list_more_messages(&self, cursor: &Cursor) -> ApiResult<Page<Message>> {
        self.record(ApiCall::ListMoreMessages(cursor.clone()));
        self.more_message_pages.next().await
    }

    async fn create_message(&self, message: NewMessage) -> ApiResult<Message> {
        self.record(ApiCall::CreateMessage(message));
        self.created_messages.next().await
    }
}

#[async_trait]
impl HistoryApi for MockShareApi {
    async fn list_history(&self, filter: &HistoryFilter) -> ApiResult<Page<HistoryEntry>> {
        self.record(ApiCall::ListHistory(*filter));
        self.history_pages.next().await
    }

    async fn list_more_history(&self, cursor: &Cursor) -> ApiResult<Page<HistoryEntry>> {
        self.record(ApiCall::ListMoreHistory(cursor.clone()));
        self.more_history_pages.next().await
    }
}

#[async_trait]
impl InvitationsApi for MockShareApi {
    async fn list_invitations(&self, group: GroupId) -> ApiResult<Vec<Invitation>> {
        self.record(ApiCall::ListInvitations(group));
        self.invitation_lists.next().await
    }

    async fn create_invitation(&self, invitation: NewInvitation) -> ApiResult<Invitation> {
        self.record(ApiCall::CreateInvitation(invitation));
        self.created_invitations.next().await
    }

    async fn accept_invitation(&self, token: &str) -> ApiResult<()> {
        self.record(ApiCall::AcceptInvitation(token.to_string()));
        self.accepted_invitations.next().await
    }
}
