//! Activity history of a group, user or store.

use async_trait::async_trait;
use karrot_client::{HistoryApi, ShareApi};
use karrot_types::{ApiResult, Cursor, GroupId, HistoryEntry, HistoryFilter, Page, StoreId, UserId};
use std::sync::Arc;

use crate::pagination::{FetchOutcome, PageSource, PaginatedList};
use crate::status::RequestStatus;

struct HistoryPages {
    api: Arc<dyn ShareApi>,
}

#[async_trait]
impl PageSource<HistoryEntry, HistoryFilter> for HistoryPages {
    async fn first_page(&self, filter: &HistoryFilter) -> ApiResult<Page<HistoryEntry>> {
        self.api.list_history(filter).await
    }

    async fn next_page(&self, cursor: &Cursor) -> ApiResult<Page<HistoryEntry>> {
        self.api.list_more_history(cursor).await
    }
}

#[derive(Clone)]
pub struct History {
    list: PaginatedList<HistoryEntry, HistoryFilter>,
}

impl History {
    pub fn new(api: Arc<dyn ShareApi>) -> Self {
        Self {
            list: PaginatedList::new("history", Arc::new(HistoryPages { api })),
        }
    }

    pub async fn fetch_for_group(&self, group: GroupId) -> FetchOutcome {
        self.fetch_filtered(HistoryFilter::Group(group)).await
    }

    pub async fn fetch_for_user(&self, user: UserId) -> FetchOutcome {
        self.fetch_filtered(HistoryFilter::User(user)).await
    }

    pub async fn fetch_for_store(&self, store: StoreId) -> FetchOutcome {
        self.fetch_filtered(HistoryFilter::Store(store)).await
    }

    /// Drops whatever was shown before and loads the first page for `filter`.
    pub async fn fetch_filtered(&self, filter: HistoryFilter) -> FetchOutcome {
        self.list.clear().await;
        self.list.fetch_first_page(filter).await
    }

    pub async fn fetch_more(&self) -> FetchOutcome {
        self.list.fetch_next_page().await
    }

    /// Called when leaving a history view.
    pub async fn clear(&self) {
        self.list.clear().await;
    }

    pub async fn all(&self) -> Vec<HistoryEntry> {
        self.list.entities().await
    }

    pub async fn get(&self, id: u64) -> Option<HistoryEntry> {
        self.list.get(&id).await
    }

    pub async fn filter(&self) -> Option<HistoryFilter> {
        self.list.filter().await
    }

    pub async fn receive_status(&self) -> RequestStatus {
        self.list.status().await
    }

    pub async fn receive_more_status(&self) -> RequestStatus {
        self.list.more_status().await
    }

    pub async fn can_load_more(&self) -> bool {
        self.list.can_load_more().await
    }
}
