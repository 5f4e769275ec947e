//! Record builders for tests

use karrot_types::{
    ConversationId, Cursor, GroupId, HistoryEntry, Invitation, Message, Page, Record,
};
use serde_json::Map;

pub fn record(id: u64) -> Record {
    Record::new(id)
}

pub fn records(ids: &[u64]) -> Vec<Record> {
    ids.iter().copied().map(Record::new).collect()
}

pub fn message(id: u64, conversation: ConversationId, content: &str) -> Message {
    Message {
        id,
        author: 1,
        content: content.to_string(),
        conversation,
        created_at: None,
        extra: Map::new(),
    }
}

pub fn history_entry(id: u64, typus: &str) -> HistoryEntry {
    HistoryEntry {
        id,
        typus: typus.to_string(),
        group: None,
        store: None,
        users: Vec::new(),
        date: None,
        payload: None,
        extra: Map::new(),
    }
}

pub fn invitation(id: u64, email: &str, group: GroupId) -> Invitation {
    Invitation {
        id,
        email: email.to_string(),
        group,
        invited_by: None,
        created_at: None,
        extra: Map::new(),
    }
}

/// Page with an optional continuation token
pub fn page<E>(results: Vec<E>, next: Option<&str>) -> Page<E> {
    Page::new(results, next.map(Cursor::from))
}
