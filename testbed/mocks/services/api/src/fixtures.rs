use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Everything the mock server knows, stored as raw JSON records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFixture {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub messages: Vec<Value>,
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(default)]
    pub invitations: Vec<Value>,
    /// Tokens that can be accepted
    #[serde(default)]
    pub invitation_tokens: Vec<String>,
}

fn default_page_size() -> usize {
    2
}

impl Default for ApiFixture {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            messages: Vec::new(),
            history: Vec::new(),
            invitations: Vec::new(),
            invitation_tokens: Vec::new(),
        }
    }
}

impl ApiFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml(yaml_content: &str) -> anyhow::Result<Self> {
        let fixture: Self = serde_yaml::from_str(yaml_content)?;
        if fixture.page_size == 0 {
            anyhow::bail!("Fixture page_size must be greater than 0");
        }
        Ok(fixture)
    }

    /// Messages of `conversation`, newest first
    pub fn messages_of(&self, conversation: u64) -> Vec<Value> {
        let mut messages: Vec<Value> = self
            .messages
            .iter()
            .filter(|m| m["conversation"].as_u64() == Some(conversation))
            .cloned()
            .collect();
        messages.sort_by_key(|m| std::cmp::Reverse(m["id"].as_u64().unwrap_or_default()));
        messages
    }

    /// History entries matching one `(key, id)` filter, newest first
    pub fn history_for(&self, key: &str, id: u64) -> Vec<Value> {
        let mut entries: Vec<Value> = self
            .history
            .iter()
            .filter(|entry| match key {
                "users" => entry["users"]
                    .as_array()
                    .map(|users| users.iter().any(|u| u.as_u64() == Some(id)))
                    .unwrap_or(false),
                _ => entry[key].as_u64() == Some(id),
            })
            .cloned()
            .collect();
        entries.sort_by_key(|e| std::cmp::Reverse(e["id"].as_u64().unwrap_or_default()));
        entries
    }

    pub fn invitations_of(&self, group: u64) -> Vec<Value> {
        self.invitations
            .iter()
            .filter(|i| i["group"].as_u64() == Some(group))
            .cloned()
            .collect()
    }

    pub fn next_id(records: &[Value]) -> u64 {
        records
            .iter()
            .filter_map(|r| r["id"].as_u64())
            .max()
            .unwrap_or_default()
            + 1
    }

    pub fn create_test_fixture() -> Self {
        let mut fixture = Self::new();

        for (id, conversation, author, content) in [
            (1, 7, 1, "Who picks up tomorrow?"),
            (2, 7, 2, "I can do it."),
            (3, 7, 1, "Thanks!"),
            (4, 7, 3, "I'll bring boxes."),
            (5, 7, 2, "Great."),
            (6, 8, 1, "Welcome to the group"),
        ] {
            fixture.messages.push(json!({
                "id": id,
                "author": author,
                "content": content,
                "conversation": conversation,
                "created_at": "2024-05-01T10:00:00Z",
            }));
        }

        for (id, typus, store, users) in [
            (1, "GROUP_JOIN", None, vec![1]),
            (2, "STORE_CREATE", Some(3), vec![1]),
            (3, "PICKUP_JOIN", Some(3), vec![2]),
            (4, "PICKUP_DONE", Some(3), vec![1, 2]),
        ] {
            fixture.history.push(json!({
                "id": id,
                "typus": typus,
                "group": 1,
                "store": store,
                "users": users,
                "date": "2024-05-01T10:00:00Z",
                "payload": {},
            }));
        }

        fixture.invitations.push(json!({
            "id": 1,
            "email": "alice@example.com",
            "group": 1,
            "invited_by": 1,
            "created_at": "2024-05-01T10:00:00Z",
        }));
        fixture.invitation_tokens.push("valid-token".to_string());

        fixture
    }
}
