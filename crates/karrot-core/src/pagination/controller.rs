use async_trait::async_trait;
use karrot_types::{ApiError, ApiResult, Cursor, Entity, Page};
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{ListCommand, ListState, PageRequest, PageTarget, SkipReason, Transition};
use crate::command::Reducer;
use crate::status::RequestStatus;

/// Where pages of a list come from.
#[async_trait]
pub trait PageSource<E, F>: Send + Sync {
    async fn first_page(&self, filter: &F) -> ApiResult<Page<E>>;

    async fn next_page(&self, cursor: &Cursor) -> ApiResult<Page<E>>;
}

/// Result of a fetch action.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The response was merged into the list
    Applied,
    /// No request was issued
    Skipped(SkipReason),
    /// The response arrived after the request was superseded and was dropped
    Stale,
    /// The request failed; the error is also in the list's status
    Failed(ApiError),
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied)
    }
}

/// Shared handle to a paginated list and the source feeding it.
pub struct PaginatedList<E: Entity, F> {
    state: Arc<Mutex<ListState<E, F>>>,
    source: Arc<dyn PageSource<E, F>>,
}

impl<E: Entity, F> Clone for PaginatedList<E, F> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            source: Arc::clone(&self.source),
        }
    }
}

impl<E, F> PaginatedList<E, F>
where
    E: Entity,
    F: Clone + Debug + Send + Sync + 'static,
{
    pub fn new(name: &'static str, source: Arc<dyn PageSource<E, F>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ListState::new(name))),
            source,
        }
    }

    /// Requests the first page for `filter`, replacing entities and cursor on success.
    pub async fn fetch_first_page(&self, filter: F) -> FetchOutcome {
        let transition = self.commit(ListCommand::RequestFirst { filter }).await;
        self.run(transition).await
    }

    /// Requests the page after the stored cursor and appends it.
    ///
    /// Without a cursor, or while another request of this list is pending,
    /// nothing is requested and the state is left as it was.
    pub async fn fetch_next_page(&self) -> FetchOutcome {
        let transition = self.commit(ListCommand::RequestNext).await;
        self.run(transition).await
    }

    async fn run(&self, transition: Transition<F>) -> FetchOutcome {
        let PageRequest { ticket, target } = match transition {
            Transition::Issued(request) => request,
            Transition::Skipped(reason) => return FetchOutcome::Skipped(reason),
            Transition::Applied => return FetchOutcome::Applied,
            Transition::Stale => return FetchOutcome::Stale,
        };

        let result = match &target {
            PageTarget::First(filter) => self.source.first_page(filter).await,
            PageTarget::Next(cursor) => self.source.next_page(cursor).await,
        };

        match result {
            Ok(page) => match self.commit(ListCommand::Receive { ticket, page }).await {
                Transition::Stale => FetchOutcome::Stale,
                _ => FetchOutcome::Applied,
            },
            Err(error) => {
                let command = ListCommand::ReceiveError {
                    ticket,
                    error: error.clone(),
                };
                match self.commit(command).await {
                    Transition::Stale => FetchOutcome::Stale,
                    _ => FetchOutcome::Failed(error),
                }
            }
        }
    }

    pub async fn commit(&self, command: ListCommand<E, F>) -> Transition<F> {
        self.state.lock().await.commit(command)
    }

    /// Resets entities, cursor and statuses; pending responses become stale.
    pub async fn clear(&self) {
        self.commit(ListCommand::Clear).await;
    }

    /// Reads the state under the lock.
    pub async fn read<R>(&self, f: impl FnOnce(&ListState<E, F>) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    pub async fn entities(&self) -> Vec<E> {
        self.read(|state| state.store().to_vec()).await
    }

    pub async fn get(&self, id: &E::Id) -> Option<E> {
        self.read(|state| state.store().get(id).cloned()).await
    }

    pub async fn contains(&self, id: &E::Id) -> bool {
        self.read(|state| state.store().contains(id)).await
    }

    pub async fn ids(&self) -> Vec<E::Id> {
        self.read(|state| state.store().ids().to_vec()).await
    }

    pub async fn cursor(&self) -> Option<Cursor> {
        self.read(|state| state.cursor().cloned()).await
    }

    pub async fn filter(&self) -> Option<F> {
        self.read(|state| state.filter().cloned()).await
    }

    pub async fn status(&self) -> RequestStatus {
        self.read(|state| state.status().clone()).await
    }

    pub async fn more_status(&self) -> RequestStatus {
        self.read(|state| state.more_status().clone()).await
    }

    pub async fn can_load_more(&self) -> bool {
        self.read(|state| state.can_load_more()).await
    }
}
