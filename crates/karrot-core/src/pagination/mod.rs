//! Cursor-paginated list state.
//!
//! [`ListState`] is the synchronous half: a normalized store, the cursor for the
//! following page, and one status tracker each for first-page and next-page
//! requests. Every request it allows out is described by a [`PageTicket`]; a
//! response is only applied while its ticket is still the one in flight, so a
//! superseded request can resolve without overwriting newer state.
//!
//! [`PaginatedList`] is the asynchronous half that issues the requests through
//! a [`PageSource`].

pub mod controller;

pub use controller::{FetchOutcome, PageSource, PaginatedList};

use karrot_types::{ApiError, Cursor, Entity, Page};

use crate::command::Reducer;
use crate::status::RequestStatus;
use crate::store::EntityStore;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    First,
    Next,
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    seq: u64,
    kind: PageKind,
}

impl PageTicket {
    pub fn kind(&self) -> PageKind {
        self.kind
    }
}

/// What to ask the server for.
#[derive(Debug, Clone, PartialEq)]
pub enum PageTarget<F> {
    First(F),
    Next(Cursor),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest<F> {
    pub ticket: PageTicket,
    pub target: PageTarget<F>,
}

/// Why a request was not issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The server reported no further page
    NoCursor,
    /// Another request of this list has not resolved yet
    InFlight,
    /// Nothing is selected to fetch for
    NoSelection,
}

#[derive(Debug)]
pub enum ListCommand<E, F> {
    RequestFirst { filter: F },
    RequestNext,
    Receive { ticket: PageTicket, page: Page<E> },
    ReceiveError { ticket: PageTicket, error: ApiError },
    Prepend(E),
    Append(E),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition<F> {
    Issued(PageRequest<F>),
    Skipped(SkipReason),
    Applied,
    Stale,
}

#[derive(Debug, Clone)]
pub struct ListState<E: Entity, F> {
    name: &'static str,
    store: EntityStore<E>,
    cursor: Option<Cursor>,
    filter: Option<F>,
    status: RequestStatus,
    more_status: RequestStatus,
    in_flight: Option<PageTicket>,
    seq: u64,
}

impl<E: Entity, F: Clone> ListState<E, F> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            store: EntityStore::new(),
            cursor: None,
            filter: None,
            status: RequestStatus::new(),
            more_status: RequestStatus::new(),
            in_flight: None,
            seq: 0,
        }
    }

    pub fn store(&self) -> &EntityStore<E> {
        &self.store
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Filter of the last first-page request
    pub fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }

    /// Status of first-page requests
    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// Status of next-page requests
    pub fn more_status(&self) -> &RequestStatus {
        &self.more_status
    }

    pub fn can_load_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    fn issue(&mut self, kind: PageKind) -> PageTicket {
        self.seq += 1;
        let ticket = PageTicket {
            seq: self.seq,
            kind,
        };
        self.in_flight = Some(ticket);
        ticket
    }

    /// Takes the in-flight slot if `ticket` still owns it.
    fn settle(&mut self, ticket: PageTicket) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            log::debug!(
                "[{}] dropping response for superseded request #{}",
                self.name,
                ticket.seq
            );
            false
        }
    }
}

impl<E: Entity, F: Clone + std::fmt::Debug> Reducer for ListState<E, F> {
    type Command = ListCommand<E, F>;
    type Outcome = Transition<F>;

    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&mut self, command: ListCommand<E, F>) -> Transition<F> {
        match command {
            ListCommand::RequestFirst { filter } => {
                if self.more_status.is_waiting() {
                    self.more_status.reset();
                }
                let ticket = self.issue(PageKind::First);
                self.filter = Some(filter.clone());
                self.status.begin();
                Transition::Issued(PageRequest {
                    ticket,
                    target: PageTarget::First(filter),
                })
            }
            ListCommand::RequestNext => {
                let Some(cursor) = self.cursor.clone() else {
                    return Transition::Skipped(SkipReason::NoCursor);
                };
                if self.in_flight.is_some() {
                    return Transition::Skipped(SkipReason::InFlight);
                }
                let ticket = self.issue(PageKind::Next);
                self.more_status.begin();
                Transition::Issued(PageRequest {
                    ticket,
                    target: PageTarget::Next(cursor),
                })
            }
            ListCommand::Receive { ticket, page } => {
                if !self.settle(ticket) {
                    return Transition::Stale;
                }
                match ticket.kind {
                    PageKind::First => {
                        self.store.replace(page.results);
                        self.status.succeed();
                    }
                    PageKind::Next => {
                        self.store.extend(page.results);
                        self.more_status.succeed();
                    }
                }
                self.cursor = Cursor::normalize(page.next);
                Transition::Applied
            }
            ListCommand::ReceiveError { ticket, error } => {
                if !self.settle(ticket) {
                    return Transition::Stale;
                }
                log::warn!("[{}] request failed: {}", self.name, error);
                match ticket.kind {
                    PageKind::First => self.status.fail(error),
                    PageKind::Next => self.more_status.fail(error),
                }
                Transition::Applied
            }
            ListCommand::Prepend(entity) => {
                self.store.prepend(entity);
                Transition::Applied
            }
            ListCommand::Append(entity) => {
                self.store.push(entity);
                Transition::Applied
            }
            ListCommand::Clear => {
                // seq survives so responses to requests issued before the clear stay stale
                *self = Self {
                    seq: self.seq,
                    ..Self::new(self.name)
                };
                Transition::Applied
            }
        }
    }
}
