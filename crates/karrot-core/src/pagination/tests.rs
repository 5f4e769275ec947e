use super::*;
use async_trait::async_trait;
use karrot_test_mocks::{page, records, Gate, Script};
use karrot_types::{ApiResult, Record};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct GroupFilter {
    group_id: u64,
}

fn group(group_id: u64) -> GroupFilter {
    GroupFilter { group_id }
}

#[derive(Default)]
struct ScriptedSource {
    first: Script<Page<Record>>,
    next: Script<Page<Record>>,
}

#[async_trait]
impl PageSource<Record, GroupFilter> for ScriptedSource {
    async fn first_page(&self, _filter: &GroupFilter) -> ApiResult<Page<Record>> {
        self.first.next().await
    }

    async fn next_page(&self, _cursor: &Cursor) -> ApiResult<Page<Record>> {
        self.next.next().await
    }
}

fn list() -> (Arc<ScriptedSource>, PaginatedList<Record, GroupFilter>) {
    let source = Arc::new(ScriptedSource::default());
    let list = PaginatedList::new("test", source.clone());
    (source, list)
}

async fn ids(list: &PaginatedList<Record, GroupFilter>) -> Vec<u64> {
    list.ids().await
}

#[tokio::test]
async fn test_first_page_replaces_entities_and_cursor() {
    let (source, list) = list();
    source.first.push_ok(page(records(&[1, 2]), Some("tok-A")));

    let outcome = list.fetch_first_page(group(1)).await;

    assert_eq!(outcome, FetchOutcome::Applied);
    assert_eq!(ids(&list).await, vec![1, 2]);
    assert_eq!(list.cursor().await, Some(Cursor::new("tok-A")));
    assert_eq!(list.filter().await, Some(group(1)));
    assert_eq!(list.get(&2).await, Some(Record::new(2)));

    let status = list.status().await;
    assert!(!status.is_waiting());
    assert_eq!(status.success(), Some(true));
}

#[tokio::test]
async fn test_next_page_appends_and_updates_cursor() {
    let (source, list) = list();
    source.first.push_ok(page(records(&[1, 2]), Some("tok-A")));
    source.next.push_ok(page(records(&[3]), None));

    list.fetch_first_page(group(1)).await;
    let outcome = list.fetch_next_page().await;

    assert_eq!(outcome, FetchOutcome::Applied);
    assert_eq!(ids(&list).await, vec![1, 2, 3]);
    assert_eq!(list.cursor().await, None);
    assert!(!list.can_load_more().await);
    assert_eq!(list.more_status().await.success(), Some(true));
}

#[tokio::test]
async fn test_next_page_without_cursor_is_a_no_op() {
    let (source, list) = list();
    source.first.push_ok(page(records(&[1]), None));
    list.fetch_first_page(group(1)).await;

    let before = list.read(|state| format!("{:?}", state)).await;
    let outcome = list.fetch_next_page().await;
    let after = list.read(|state| format!("{:?}", state)).await;

    assert_eq!(outcome, FetchOutcome::Skipped(SkipReason::NoCursor));
    assert_eq!(source.next.calls(), 0);
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_next_page_on_fresh_list_issues_nothing() {
    let (source, list) = list();

    assert_eq!(
        list.fetch_next_page().await,
        FetchOutcome::Skipped(SkipReason::NoCursor)
    );
    assert_eq!(source.next.calls(), 0);
    assert_eq!(list.more_status().await, RequestStatus::new());
}

#[tokio::test]
async fn test_first_page_is_idempotent() {
    let (source, list) = list();
    source.first.push_ok(page(records(&[1, 2]), Some("tok-A")));
    source.first.push_ok(page(records(&[1, 2]), Some("tok-A")));

    list.fetch_first_page(group(1)).await;
    let once = list.entities().await;
    list.fetch_first_page(group(1)).await;
    let twice = list.entities().await;

    assert_eq!(ids(&list).await, vec![1, 2]);
    assert_eq!(list.cursor().await, Some(Cursor::new("tok-A")));
    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_first_page_failure_keeps_entities() {
    let (source, list) = list();
    source.first.push_ok(page(records(&[1, 2]), Some("tok-A")));
    source
        .first
        .push_err(ApiError::transport("connection refused"));

    list.fetch_first_page(group(1)).await;
    let outcome = list.fetch_first_page(group(2)).await;

    assert_eq!(
        outcome,
        FetchOutcome::Failed(ApiError::transport("connection refused"))
    );
    let status = list.status().await;
    assert!(!status.is_waiting());
    assert_eq!(status.success(), Some(false));
    assert_eq!(
        status.error(),
        Some(&ApiError::transport("connection refused"))
    );
    assert_eq!(ids(&list).await, vec![1, 2]);
    assert_eq!(list.cursor().await, Some(Cursor::new("tok-A")));
}

#[tokio::test]
async fn test_next_page_failure_keeps_entities_and_cursor() {
    let (source, list) = list();
    source.first.push_ok(page(records(&[1, 2]), Some("tok-A")));
    source.next.push_err(ApiError::status(500, "oops"));

    list.fetch_first_page(group(1)).await;
    let outcome = list.fetch_next_page().await;

    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert_eq!(ids(&list).await, vec![1, 2]);
    assert_eq!(list.cursor().await, Some(Cursor::new("tok-A")));
    assert_eq!(list.more_status().await.success(), Some(false));
    assert_eq!(list.status().await.success(), Some(true));
}

#[tokio::test]
async fn test_overlapping_next_page_is_ignored() {
    let (source, list) = list();
    let gate = Gate::new();
    source.first.push_ok(page(records(&[1, 2]), Some("tok-A")));
    source
        .next
        .push_gated(Ok(page(records(&[3]), Some("tok-B"))), &gate);
    list.fetch_first_page(group(1)).await;

    let pending = tokio::spawn({
        let list = list.clone();
        async move { list.fetch_next_page().await }
    });
    source.next.wait_for_calls(1).await;
    assert!(list.more_status().await.is_waiting());

    let second = list.fetch_next_page().await;
    assert_eq!(second, FetchOutcome::Skipped(SkipReason::InFlight));

    gate.open();
    assert_eq!(pending.await.unwrap(), FetchOutcome::Applied);
    assert_eq!(ids(&list).await, vec![1, 2, 3]);
    assert_eq!(source.next.calls(), 1);
}

#[tokio::test]
async fn test_superseded_first_page_is_dropped() {
    let (source, list) = list();
    let gate = Gate::new();
    source
        .first
        .push_gated(Ok(page(records(&[10, 11]), Some("old"))), &gate);
    source.first.push_ok(page(records(&[20]), Some("new")));

    let pending = tokio::spawn({
        let list = list.clone();
        async move { list.fetch_first_page(group(1)).await }
    });
    source.first.wait_for_calls(1).await;

    assert_eq!(list.fetch_first_page(group(2)).await, FetchOutcome::Applied);
    gate.open();

    assert_eq!(pending.await.unwrap(), FetchOutcome::Stale);
    assert_eq!(ids(&list).await, vec![20]);
    assert_eq!(list.cursor().await, Some(Cursor::new("new")));
    assert_eq!(list.filter().await, Some(group(2)));
}

#[tokio::test]
async fn test_first_page_supersedes_pending_next_page() {
    let (source, list) = list();
    let gate = Gate::new();
    source.first.push_ok(page(records(&[1]), Some("tok-A")));
    source
        .next
        .push_gated(Ok(page(records(&[2]), None)), &gate);
    source.first.push_ok(page(records(&[5]), None));
    list.fetch_first_page(group(1)).await;

    let pending = tokio::spawn({
        let list = list.clone();
        async move { list.fetch_next_page().await }
    });
    source.next.wait_for_calls(1).await;

    list.fetch_first_page(group(1)).await;
    assert!(!list.more_status().await.is_waiting());
    gate.open();

    assert_eq!(pending.await.unwrap(), FetchOutcome::Stale);
    assert_eq!(ids(&list).await, vec![5]);
}

#[tokio::test]
async fn test_clear_discards_pending_response() {
    let (source, list) = list();
    let gate = Gate::new();
    source
        .first
        .push_gated(Ok(page(records(&[1]), Some("tok-A"))), &gate);

    let pending = tokio::spawn({
        let list = list.clone();
        async move { list.fetch_first_page(group(1)).await }
    });
    source.first.wait_for_calls(1).await;

    list.clear().await;
    gate.open();

    assert_eq!(pending.await.unwrap(), FetchOutcome::Stale);
    assert!(ids(&list).await.is_empty());
    assert_eq!(list.status().await, RequestStatus::new());
    assert_eq!(list.filter().await, None);
}

#[tokio::test]
async fn test_empty_cursor_means_no_more_pages() {
    let (source, list) = list();
    source.first.push_ok(page(records(&[1]), Some("")));

    list.fetch_first_page(group(1)).await;

    assert!(!list.can_load_more().await);
    assert_eq!(
        list.fetch_next_page().await,
        FetchOutcome::Skipped(SkipReason::NoCursor)
    );
}

#[test]
fn test_receive_with_foreign_ticket_is_stale() {
    let mut state: ListState<Record, GroupFilter> = ListState::new("sync");
    let first = match state.commit(ListCommand::RequestFirst { filter: group(1) }) {
        Transition::Issued(request) => request.ticket,
        other => panic!("Expected issued request, got {:?}", other),
    };
    let second = match state.commit(ListCommand::RequestFirst { filter: group(1) }) {
        Transition::Issued(request) => request.ticket,
        other => panic!("Expected issued request, got {:?}", other),
    };

    let late = state.commit(ListCommand::Receive {
        ticket: first,
        page: page(records(&[1]), None),
    });
    assert_eq!(late, Transition::Stale);
    assert!(state.status().is_waiting());

    let current = state.commit(ListCommand::Receive {
        ticket: second,
        page: page(records(&[2]), None),
    });
    assert_eq!(current, Transition::Applied);
    assert_eq!(state.store().ids(), &[2]);
    assert!(!state.is_busy());
}

#[test]
fn test_single_record_commands() {
    let mut state: ListState<Record, GroupFilter> = ListState::new("sync");
    state.commit(ListCommand::Append(Record::new(1)));
    state.commit(ListCommand::Append(Record::new(2)));
    state.commit(ListCommand::Prepend(Record::new(0)));

    assert_eq!(state.store().ids(), &[0, 1, 2]);
}
