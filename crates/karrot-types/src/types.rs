//! Records exchanged with the Karrot REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::hash::Hash;

pub type ConversationId = u64;
pub type GroupId = u64;
pub type UserId = u64;
pub type StoreId = u64;

/// A uniquely identified domain record.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Debug + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}

/// An opaque record: an identifier plus whatever else the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

impl Entity for Record {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

/// A conversation the current user takes part in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default)]
    pub participants: Vec<UserId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Conversation {
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            participants: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Entity for Conversation {
    type Id = ConversationId;

    fn id(&self) -> ConversationId {
        self.id
    }
}

/// A single message posted to a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub author: UserId,
    pub content: String,
    pub conversation: ConversationId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Message {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

/// Payload for posting a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub content: String,
    pub conversation: ConversationId,
}

/// An entry of a group's activity history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    /// Kind of event, e.g. `STORE_CREATE` or `PICKUP_DONE`.
    pub typus: String,
    #[serde(default)]
    pub group: Option<GroupId>,
    #[serde(default)]
    pub store: Option<StoreId>,
    #[serde(default)]
    pub users: Vec<UserId>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for HistoryEntry {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

/// Scope of a history listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    Group(GroupId),
    User(UserId),
    Store(StoreId),
}

impl HistoryFilter {
    /// Query parameter understood by the history endpoint.
    pub fn query(&self) -> (&'static str, String) {
        match self {
            HistoryFilter::Group(id) => ("group", id.to_string()),
            HistoryFilter::User(id) => ("users", id.to_string()),
            HistoryFilter::Store(id) => ("store", id.to_string()),
        }
    }
}

/// An invitation sent to an e-mail address to join a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: u64,
    pub email: String,
    pub group: GroupId,
    #[serde(default)]
    pub invited_by: Option<UserId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Invitation {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

/// Payload for inviting an e-mail address into a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvitation {
    pub email: String,
    pub group: GroupId,
}
