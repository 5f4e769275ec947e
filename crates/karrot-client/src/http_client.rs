use async_trait::async_trait;
use karrot_types::{
    ApiError, ApiResult, ConversationId, Cursor, GroupId, HistoryEntry, HistoryFilter, Invitation,
    Message, NewInvitation, NewMessage, Page,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{HistoryApi, InvitationsApi, MessagesApi};

const MESSAGES_PATH: &str = "/api/messages/";
const HISTORY_PATH: &str = "/api/history/";
const INVITATIONS_PATH: &str = "/api/invitations/";

/// HTTP client for a remote Karrot API server
pub struct HttpApiClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
    auth_token: Option<String>,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(30),
            auth_token: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Builds the request for the page behind a continuation token.
    ///
    /// Absolute URLs are used verbatim, paths are joined to the base URL, and
    /// bare tokens are passed, encoded, as the `cursor` query parameter of
    /// `endpoint`.
    fn cursor_request(&self, endpoint: &str, cursor: &Cursor) -> reqwest::RequestBuilder {
        let token = cursor.as_str();
        if token.starts_with("http://") || token.starts_with("https://") {
            self.client.get(token)
        } else if token.starts_with('/') {
            self.client.get(self.url(token))
        } else {
            self.client
                .get(self.url(endpoint))
                .query(&[("cursor", token)])
        }
    }

    fn prepare(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder
            .header("Accept", "application/json")
            .timeout(self.timeout);

        match &self.auth_token {
            Some(token) => builder.header("Authorization", format!("Token {}", token)),
            None => builder,
        }
    }

    async fn execute(&self, builder: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = self
            .prepare(builder)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            let error = ApiError::from_response(status.as_u16(), &body);
            log::warn!("Request to {} failed: {}", url, error);
            return Err(error);
        }

        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        let response = self.execute(builder).await?;
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| {
            ApiError::status(status, format!("Failed to decode response body: {}", e))
        })
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    ApiError::Transport {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}

#[async_trait]
impl MessagesApi for HttpApiClient {
    async fn list_messages(&self, conversation: ConversationId) -> ApiResult<Page<Message>> {
        log::debug!("Listing messages of conversation {}", conversation);
        let request = self
            .client
            .get(self.url(MESSAGES_PATH))
            .query(&[("conversation", conversation.to_string())]);
        self.fetch_json(request).await
    }

    async fn list_more_messages(&self, cursor: &Cursor) -> ApiResult<Page<Message>> {
        let request = self.cursor_request(MESSAGES_PATH, cursor);
        self.fetch_json(request).await
    }

    async fn create_message(&self, message: NewMessage) -> ApiResult<Message> {
        let request = self.client.post(self.url(MESSAGES_PATH)).json(&message);
        self.fetch_json(request).await
    }
}

#[async_trait]
impl HistoryApi for HttpApiClient {
    async fn list_history(&self, filter: &HistoryFilter) -> ApiResult<Page<HistoryEntry>> {
        log::debug!("Listing history for {:?}", filter);
        let request = self
            .client
            .get(self.url(HISTORY_PATH))
            .query(&[filter.query()]);
        self.fetch_json(request).await
    }

    async fn list_more_history(&self, cursor: &Cursor) -> ApiResult<Page<HistoryEntry>> {
        let request = self.cursor_request(HISTORY_PATH, cursor);
        self.fetch_json(request).await
    }
}

#[async_trait]
impl InvitationsApi for HttpApiClient {
    async fn list_invitations(&self, group: GroupId) -> ApiResult<Vec<Invitation>> {
        let request = self
            .client
            .get(self.url(INVITATIONS_PATH))
            .query(&[("group", group.to_string())]);
        self.fetch_json(request).await
    }

    async fn create_invitation(&self, invitation: NewInvitation) -> ApiResult<Invitation> {
        let request = self
            .client
            .post(self.url(INVITATIONS_PATH))
            .json(&invitation);
        self.fetch_json(request).await
    }

    async fn accept_invitation(&self, token: &str) -> ApiResult<()> {
        let url = self.url(&format!("{}{}/accept/", INVITATIONS_PATH, token));
        self.execute(self.client.post(url)).await?;
        Ok(())
    }
}
