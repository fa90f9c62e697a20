//! Thread message handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{ActingRole, ActorContext, MessageDirection};
use listing_service_lib::service::ThreadMessage;

use crate::extractors::ValidatedJson;
use crate::middleware::require_session;
use crate::state::AppState;

/// Message post request. Length is checked after the thread permission check.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    /// 1 to 5000 characters after trimming
    #[schema(example = "Could you start on the 12th?")]
    pub content: String,
}

/// A message as rendered for the caller
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    /// `{listing_id}:{vendor_id}`
    pub thread_id: String,
    pub listing_id: Uuid,
    pub vendor_id: Uuid,
    pub sender_id: Uuid,
    pub sender_role: ActingRole,
    pub content: String,
    /// Relative to the caller's effective role
    pub direction: MessageDirection,
    pub created_at: DateTime<Utc>,
}

impl From<ThreadMessage> for MessageResponse {
    fn from(tm: ThreadMessage) -> Self {
        let m = tm.message;
        Self {
            id: m.id,
            thread_id: m.thread.key(),
            listing_id: m.thread.listing_id,
            vendor_id: m.thread.vendor_id,
            sender_id: m.sender_id,
            sender_role: m.sender_role,
            content: m.content,
            direction: tm.direction,
            created_at: m.created_at,
        }
    }
}

/// Create message routes (nested under /listings)
pub fn message_routes() -> Router<AppState> {
    Router::new().route(
        "/:id/threads/:vendor_id/messages",
        get(list_messages).post(send_message),
    )
}

/// Read a thread
#[utoipa::path(
    get,
    path = "/listings/{id}/threads/{vendor_id}/messages",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Listing ID"),
        ("vendor_id" = Uuid, Path, description = "Vendor side of the thread")
    ),
    responses(
        (status = 200, description = "Messages, oldest first", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Listing or thread not found")
    )
)]
pub async fn list_messages(
    Extension(actor): Extension<ActorContext>,
    State(state): State<AppState>,
    Path((id, vendor_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Vec<MessageResponse>>> {
    require_session(&actor)?;

    let messages = state
        .services
        .conversations
        .list_messages(&actor, id, vendor_id)
        .await?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Post into a thread
#[utoipa::path(
    post,
    path = "/listings/{id}/threads/{vendor_id}/messages",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Listing ID"),
        ("vendor_id" = Uuid, Path, description = "Vendor side of the thread")
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a participant or has no acting role"),
        (status = 404, description = "Listing or thread not found")
    )
)]
pub async fn send_message(
    Extension(actor): Extension<ActorContext>,
    State(state): State<AppState>,
    Path((id, vendor_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    require_session(&actor)?;

    let message = state
        .services
        .conversations
        .send_message(&actor, id, vendor_id, payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}
