//! Conversations and their messages.
//!
//! Every conversation gets its own [`PaginatedList`] of messages, so the
//! request statuses are tracked per conversation. Getters always read the list
//! of the active conversation: a response for a conversation that is no longer
//! active lands in that conversation's own list and never shows up as the
//! active one's status or data.

use async_trait::async_trait;
use karrot_client::{MessagesApi, ShareApi};
use karrot_types::{
    ApiError, ApiResult, Conversation, ConversationId, Cursor, FieldErrors, Message, NewMessage,
    Page,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::command::Reducer;
use crate::pagination::{FetchOutcome, ListCommand, PageSource, PaginatedList, SkipReason};
use crate::status::RequestStatus;
use crate::store::EntityStore;

struct MessagePages {
    api: Arc<dyn ShareApi>,
}

#[async_trait]
impl PageSource<Message, ConversationId> for MessagePages {
    async fn first_page(&self, conversation: &ConversationId) -> ApiResult<Page<Message>> {
        self.api.list_messages(*conversation).await
    }

    async fn next_page(&self, cursor: &Cursor) -> ApiResult<Page<Message>> {
        self.api.list_more_messages(cursor).await
    }
}

#[derive(Debug)]
pub enum ConversationCommand {
    SetActive { conversation: Conversation },
    ClearActive,
    RequestSend,
    ReceiveSend,
    ReceiveSendError { error: ApiError },
}

pub struct ConversationsState {
    conversations: EntityStore<Conversation>,
    messages: HashMap<ConversationId, PaginatedList<Message, ConversationId>>,
    active: Option<ConversationId>,
    send_status: RequestStatus,
    source: Arc<dyn PageSource<Message, ConversationId>>,
}

impl ConversationsState {
    fn new(source: Arc<dyn PageSource<Message, ConversationId>>) -> Self {
        Self {
            conversations: EntityStore::new(),
            messages: HashMap::new(),
            active: None,
            send_status: RequestStatus::new(),
            source,
        }
    }

    pub fn active_id(&self) -> Option<ConversationId> {
        self.active
    }

    pub fn conversations(&self) -> &EntityStore<Conversation> {
        &self.conversations
    }

    pub fn send_status(&self) -> &RequestStatus {
        &self.send_status
    }

    /// Message list of `conversation`, if it was ever activated.
    pub fn messages(
        &self,
        conversation: ConversationId,
    ) -> Option<&PaginatedList<Message, ConversationId>> {
        self.messages.get(&conversation)
    }

    fn active_list(&self) -> Option<PaginatedList<Message, ConversationId>> {
        self.active.and_then(|id| self.messages.get(&id).cloned())
    }
}

impl Reducer for ConversationsState {
    type Command = ConversationCommand;
    type Outcome = ();

    fn name(&self) -> &'static str {
        "conversations"
    }

    fn apply(&mut self, command: ConversationCommand) {
        match command {
            ConversationCommand::SetActive { conversation } => {
                let id = conversation.id;
                self.conversations.push(conversation);
                let source = Arc::clone(&self.source);
                self.messages
                    .entry(id)
                    .or_insert_with(|| PaginatedList::new("messages", source));
                self.active = Some(id);
            }
            ConversationCommand::ClearActive => self.active = None,
            ConversationCommand::RequestSend => self.send_status.begin(),
            ConversationCommand::ReceiveSend => self.send_status.succeed(),
            ConversationCommand::ReceiveSendError { error } => self.send_status.fail(error),
        }
    }
}

#[derive(Clone)]
pub struct Conversations {
    state: Arc<Mutex<ConversationsState>>,
    api: Arc<dyn ShareApi>,
}

impl Conversations {
    pub fn new(api: Arc<dyn ShareApi>) -> Self {
        let source = Arc::new(MessagePages {
            api: Arc::clone(&api),
        });
        Self {
            state: Arc::new(Mutex::new(ConversationsState::new(source))),
            api,
        }
    }

    /// Makes `conversation` the active one and loads its newest messages.
    ///
    /// The record replaces whatever was stored for its id before.
    pub async fn set_active(&self, conversation: Conversation) -> FetchOutcome {
        let id = conversation.id;
        let list = {
            let mut state = self.state.lock().await;
            state.commit(ConversationCommand::SetActive { conversation });
            state.active_list()
        };
        match list {
            Some(list) => list.fetch_first_page(id).await,
            None => FetchOutcome::Skipped(SkipReason::NoSelection),
        }
    }

    /// Leaves the active conversation; loaded messages stay cached.
    pub async fn clear_active(&self) {
        self.state
            .lock()
            .await
            .commit(ConversationCommand::ClearActive);
    }

    /// Loads older messages of the active conversation.
    pub async fn fetch_more(&self) -> FetchOutcome {
        match self.active_list().await {
            Some(list) => list.fetch_next_page().await,
            None => FetchOutcome::Skipped(SkipReason::NoSelection),
        }
    }

    /// Posts `content` to the active conversation.
    ///
    /// The created message is put in front of its conversation's messages.
    /// Without an active conversation nothing is sent and a `conversation`
    /// field error is returned.
    pub async fn send_message(&self, content: &str) -> ApiResult<Message> {
        let conversation = {
            let mut state = self.state.lock().await;
            match state.active_id() {
                Some(id) => {
                    state.commit(ConversationCommand::RequestSend);
                    id
                }
                None => {
                    let error = ApiError::Validation(FieldErrors::single(
                        "conversation",
                        "No conversation selected.",
                    ));
                    state.commit(ConversationCommand::ReceiveSendError {
                        error: error.clone(),
                    });
                    return Err(error);
                }
            }
        };

        let request = NewMessage {
            content: content.to_string(),
            conversation,
        };
        match self.api.create_message(request).await {
            Ok(message) => {
                let list = {
                    let mut state = self.state.lock().await;
                    state.commit(ConversationCommand::ReceiveSend);
                    state.messages(message.conversation).cloned()
                };
                if let Some(list) = list {
                    list.commit(ListCommand::Prepend(message.clone())).await;
                }
                Ok(message)
            }
            Err(error) => {
                log::warn!(
                    "Sending message to conversation {} failed: {}",
                    conversation,
                    error
                );
                self.state
                    .lock()
                    .await
                    .commit(ConversationCommand::ReceiveSendError {
                        error: error.clone(),
                    });
                Err(error)
            }
        }
    }

    /// Applies a message pushed by the server.
    ///
    /// Returns `false` when its conversation was never loaded or the message is
    /// already known.
    pub async fn receive_message(&self, message: Message) -> bool {
        let list = self.state.lock().await.messages(message.conversation).cloned();
        let Some(list) = list else {
            log::debug!(
                "Ignoring message {} for unloaded conversation {}",
                message.id,
                message.conversation
            );
            return false;
        };
        if list.contains(&message.id).await {
            return false;
        }
        list.commit(ListCommand::Prepend(message)).await;
        true
    }

    async fn active_list(&self) -> Option<PaginatedList<Message, ConversationId>> {
        self.state.lock().await.active_list()
    }

    pub async fn active_id(&self) -> Option<ConversationId> {
        self.state.lock().await.active_id()
    }

    pub async fn conversation(&self, id: ConversationId) -> Option<Conversation> {
        self.state.lock().await.conversations().get(&id).cloned()
    }

    /// Messages of the active conversation, newest first.
    pub async fn active_messages(&self) -> Vec<Message> {
        match self.active_list().await {
            Some(list) => list.entities().await,
            None => Vec::new(),
        }
    }

    pub async fn receive_status(&self) -> RequestStatus {
        match self.active_list().await {
            Some(list) => list.status().await,
            None => RequestStatus::new(),
        }
    }

    pub async fn receive_more_status(&self) -> RequestStatus {
        match self.active_list().await {
            Some(list) => list.more_status().await,
            None => RequestStatus::new(),
        }
    }

    pub async fn send_status(&self) -> RequestStatus {
        self.state.lock().await.send_status().clone()
    }

    pub async fn can_load_more(&self) -> bool {
        match self.active_list().await {
            Some(list) => list.can_load_more().await,
            None => false,
        }
    }
}
