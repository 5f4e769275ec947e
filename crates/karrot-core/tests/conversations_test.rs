use karrot_core::{Conversations, FetchOutcome, Phase, SkipReason};
use karrot_test_mocks::{message, page, ApiCall, Gate, MockShareApi};
use karrot_types::{ApiError, Conversation, Cursor, FieldErrors, Message, NewMessage};
use serde_json::json;
use std::sync::Arc;

fn setup() -> (Arc<MockShareApi>, Conversations) {
    let api = Arc::new(MockShareApi::new());
    let conversations = Conversations::new(api.clone());
    (api, conversations)
}

fn ids(messages: &[Message]) -> Vec<u64> {
    messages.iter().map(|m| m.id).collect()
}

#[tokio::test]
async fn test_set_active_loads_first_page() {
    let (api, conversations) = setup();
    api.message_pages.push_ok(page(
        vec![message(3, 7, "c"), message(2, 7, "b")],
        Some("/api/messages/?conversation=7&cursor=abc"),
    ));

    let outcome = conversations.set_active(Conversation::new(7)).await;

    assert_eq!(outcome, FetchOutcome::Applied);
    assert_eq!(conversations.active_id().await, Some(7));
    assert!(conversations.conversation(7).await.is_some());
    assert_eq!(ids(&conversations.active_messages().await), vec![3, 2]);
    assert!(conversations.can_load_more().await);
    assert_eq!(conversations.receive_status().await.phase(), Phase::Success);
    assert_eq!(api.requests(), vec![ApiCall::ListMessages(7)]);
}

#[tokio::test]
async fn test_fetch_more_appends_older_messages() {
    let (api, conversations) = setup();
    api.message_pages
        .push_ok(page(vec![message(3, 7, "c")], Some("tok-A")));
    api.more_message_pages
        .push_ok(page(vec![message(2, 7, "b"), message(1, 7, "a")], None));

    conversations.set_active(Conversation::new(7)).await;
    let outcome = conversations.fetch_more().await;

    assert_eq!(outcome, FetchOutcome::Applied);
    assert_eq!(ids(&conversations.active_messages().await), vec![3, 2, 1]);
    assert!(!conversations.can_load_more().await);
    assert_eq!(
        api.requests()[1],
        ApiCall::ListMoreMessages(Cursor::new("tok-A"))
    );

    assert_eq!(
        conversations.fetch_more().await,
        FetchOutcome::Skipped(SkipReason::NoCursor)
    );
    assert_eq!(api.request_count(), 2);
}

#[tokio::test]
async fn test_fetch_more_without_active_conversation() {
    let (api, conversations) = setup();

    assert_eq!(
        conversations.fetch_more().await,
        FetchOutcome::Skipped(SkipReason::NoSelection)
    );
    assert!(conversations.active_messages().await.is_empty());
    assert_eq!(conversations.receive_status().await.phase(), Phase::Idle);
    assert_eq!(api.request_count(), 0);
}

#[tokio::test]
async fn test_late_response_for_previous_conversation_does_not_leak() {
    let (api, conversations) = setup();
    let gate = Gate::new();
    api.message_pages
        .push_gated(Ok(page(vec![message(10, 1, "old")], None)), &gate);
    api.message_pages
        .push_ok(page(vec![message(20, 2, "new")], None));

    let pending = tokio::spawn({
        let conversations = conversations.clone();
        async move { conversations.set_active(Conversation::new(1)).await }
    });
    api.message_pages.wait_for_calls(1).await;
    assert!(conversations.receive_status().await.is_waiting());

    conversations.set_active(Conversation::new(2)).await;
    assert_eq!(conversations.receive_status().await.phase(), Phase::Success);

    gate.open();
    pending.await.unwrap();

    assert_eq!(conversations.active_id().await, Some(2));
    assert_eq!(ids(&conversations.active_messages().await), vec![20]);
    assert_eq!(conversations.receive_status().await.phase(), Phase::Success);
}

#[tokio::test]
async fn test_late_failure_for_previous_conversation_keeps_active_status() {
    let (api, conversations) = setup();
    let gate = Gate::new();
    api.message_pages
        .push_gated(Err(ApiError::status(500, "boom")), &gate);
    api.message_pages
        .push_ok(page(vec![message(20, 2, "new")], None));

    let pending = tokio::spawn({
        let conversations = conversations.clone();
        async move { conversations.set_active(Conversation::new(1)).await }
    });
    api.message_pages.wait_for_calls(1).await;
    conversations.set_active(Conversation::new(2)).await;
    gate.open();

    assert!(matches!(pending.await.unwrap(), FetchOutcome::Failed(_)));
    let status = conversations.receive_status().await;
    assert_eq!(status.error(), None);
    assert_eq!(status.success(), Some(true));
}

#[tokio::test]
async fn test_send_message_prepends_to_active_conversation() {
    let (api, conversations) = setup();
    api.message_pages
        .push_ok(page(vec![message(1, 7, "hi")], None));
    api.created_messages.push_ok(message(2, 7, "hello"));

    conversations.set_active(Conversation::new(7)).await;
    let sent = conversations.send_message("hello").await.unwrap();

    assert_eq!(sent.id, 2);
    assert_eq!(ids(&conversations.active_messages().await), vec![2, 1]);
    assert_eq!(conversations.send_status().await.success(), Some(true));
    assert_eq!(
        api.requests()[1],
        ApiCall::CreateMessage(NewMessage {
            content: "hello".to_string(),
            conversation: 7,
        })
    );
}

#[tokio::test]
async fn test_send_message_validation_error() {
    let (api, conversations) = setup();
    api.message_pages.push_ok(page(Vec::new(), None));
    api.created_messages.push_err(ApiError::Validation(FieldErrors::single(
        "content",
        "This field may not be blank.",
    )));

    conversations.set_active(Conversation::new(7)).await;
    let result = conversations.send_message("").await;

    assert!(result.unwrap_err().is_validation());
    let status = conversations.send_status().await;
    assert_eq!(status.phase(), Phase::Error);
    assert_eq!(
        status.first_field_error("content"),
        Some("This field may not be blank.")
    );
    assert!(conversations.active_messages().await.is_empty());
}

#[tokio::test]
async fn test_send_message_without_active_conversation_issues_nothing() {
    let (api, conversations) = setup();

    let error = conversations.send_message("hello").await.unwrap_err();

    assert_eq!(error.first_field_error("conversation"), Some("No conversation selected."));
    assert_eq!(api.request_count(), 0);
    assert_eq!(conversations.send_status().await.success(), Some(false));
}

#[tokio::test]
async fn test_receive_message_only_for_loaded_conversations() {
    let (api, conversations) = setup();
    api.message_pages
        .push_ok(page(vec![message(1, 7, "hi")], None));
    conversations.set_active(Conversation::new(7)).await;

    assert!(conversations.receive_message(message(2, 7, "pushed")).await);
    assert!(!conversations.receive_message(message(2, 7, "pushed")).await);
    assert!(!conversations.receive_message(message(3, 8, "elsewhere")).await);

    assert_eq!(ids(&conversations.active_messages().await), vec![2, 1]);
}

#[tokio::test]
async fn test_clear_active_keeps_loaded_messages() {
    let (api, conversations) = setup();
    api.message_pages
        .push_ok(page(vec![message(1, 7, "hi")], None));
    conversations.set_active(Conversation::new(7)).await;

    conversations.clear_active().await;
    assert_eq!(conversations.active_id().await, None);
    assert!(conversations.active_messages().await.is_empty());

    assert!(conversations.receive_message(message(2, 7, "pushed")).await);
}

#[tokio::test]
async fn test_set_active_keeps_the_conversation_record() {
    let (api, conversations) = setup();
    api.message_pages.push_ok(page(Vec::new(), None));
    api.message_pages.push_ok(page(Vec::new(), None));

    let mut record = Conversation::new(7);
    record.participants = vec![1, 2];
    record.extra.insert("type".to_string(), json!("group"));
    conversations.set_active(record.clone()).await;

    assert_eq!(conversations.conversation(7).await, Some(record.clone()));

    record.participants.push(3);
    conversations.set_active(record).await;

    let stored = conversations.conversation(7).await.unwrap();
    assert_eq!(stored.participants, vec![1, 2, 3]);
    assert_eq!(stored.extra["type"], json!("group"));
}
