use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::fixtures::ApiFixture;
use crate::server::SharedFixture;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "karrot-mock-api"
    }))
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn field_error(field: &str, message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ field: [message] })),
    )
        .into_response()
}

fn parse_id(query: &HashMap<String, String>, key: &str) -> Option<u64> {
    query.get(key).and_then(|v| v.parse().ok())
}

/// Cuts one page out of `items`; the cursor is the offset of the next page.
fn paginate(
    items: Vec<Value>,
    query: &HashMap<String, String>,
    path: &str,
    filter: &str,
    page_size: usize,
) -> Response {
    let offset: usize = query
        .get("cursor")
        .and_then(|c| c.parse().ok())
        .unwrap_or_default();
    let end = (offset + page_size).min(items.len());
    let results: Vec<Value> = items
        .get(offset..end)
        .map(<[Value]>::to_vec)
        .unwrap_or_default();
    let next = (end < items.len()).then(|| format!("{}?{}&cursor={}", path, filter, end));

    Json(json!({
        "next": next,
        "previous": Value::Null,
        "results": results,
    }))
    .into_response()
}

pub async fn list_messages(
    Query(query): Query<HashMap<String, String>>,
    State(fixture): State<SharedFixture>,
) -> Response {
    let Some(conversation) = parse_id(&query, "conversation") else {
        return field_error("conversation", "This field is required.");
    };

    let fixture = fixture.read().await;
    paginate(
        fixture.messages_of(conversation),
        &query,
        "/api/messages/",
        &format!("conversation={}", conversation),
        fixture.page_size,
    )
}

#[derive(Debug, Deserialize)]
pub struct CreateMessage {
    #[serde(default)]
    content: String,
    conversation: u64,
}

pub async fn create_message(
    State(fixture): State<SharedFixture>,
    Json(body): Json<CreateMessage>,
) -> Response {
    if body.content.trim().is_empty() {
        return field_error("content", "This field may not be blank.");
    }

    let mut fixture = fixture.write().await;
    let message = json!({
        "id": ApiFixture::next_id(&fixture.messages),
        "author": 1,
        "content": body.content,
        "conversation": body.conversation,
        "created_at": Value::Null,
    });
    fixture.messages.push(message.clone());
    tracing::info!("Created message in conversation {}", body.conversation);

    (StatusCode::CREATED, Json(message)).into_response()
}

pub async fn list_history(
    Query(query): Query<HashMap<String, String>>,
    State(fixture): State<SharedFixture>,
) -> Response {
    let Some((key, id)) = ["group", "users", "store"]
        .into_iter()
        .find_map(|key| parse_id(&query, key).map(|id| (key, id)))
    else {
        return detail(
            StatusCode::BAD_REQUEST,
            "A group, users or store filter is required.",
        );
    };

    let fixture = fixture.read().await;
    paginate(
        fixture.history_for(key, id),
        &query,
        "/api/history/",
        &format!("{}={}", key, id),
        fixture.page_size,
    )
}

pub async fn list_invitations(
    Query(query): Query<HashMap<String, String>>,
    State(fixture): State<SharedFixture>,
) -> Response {
    let fixture = fixture.read().await;
    let invitations = match parse_id(&query, "group") {
        Some(group) => fixture.invitations_of(group),
        None => fixture.invitations.clone(),
    };
    Json(invitations).into_response()
}

#[derive(Debug, Deserialize)]
pub struct CreateInvitation {
    #[serde(default)]
    email: String,
    group: u64,
}

pub async fn create_invitation(
    State(fixture): State<SharedFixture>,
    Json(body): Json<CreateInvitation>,
) -> Response {
    if !body.email.contains('@') {
        return field_error("email", "Enter a valid email address.");
    }

    let mut fixture = fixture.write().await;
    let taken = fixture
        .invitations_of(body.group)
        .iter()
        .any(|i| i["email"].as_str() == Some(body.email.as_str()));
    if taken {
        return field_error(
            "email",
            "An invitation has already been sent to this e-mail address.",
        );
    }

    let invitation = json!({
        "id": ApiFixture::next_id(&fixture.invitations),
        "email": body.email,
        "group": body.group,
        "invited_by": 1,
        "created_at": Value::Null,
    });
    fixture.invitations.push(invitation.clone());
    tracing::info!("Invited {} into group {}", body.email, body.group);

    (StatusCode::CREATED, Json(invitation)).into_response()
}

pub async fn accept_invitation(
    Path(token): Path<String>,
    State(fixture): State<SharedFixture>,
) -> Response {
    let mut fixture = fixture.write().await;
    match fixture.invitation_tokens.iter().position(|t| *t == token) {
        Some(index) => {
            fixture.invitation_tokens.remove(index);
            tracing::info!("Accepted invitation {}", token);
            Json(json!({})).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "Not found."),
    }
}
