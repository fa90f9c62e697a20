//! Listing handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{ActorContext, Listing, ListingPermissions, ListingStatus, NewListing};
use listing_service_lib::service::ListingView;

use crate::extractors::ValidatedJson;
use crate::handlers::proposal_handler::ProposalResponse;
use crate::middleware::require_session;
use crate::state::AppState;

/// Listing creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[schema(example = "Replace kitchen worktops")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "Oak, about 4 metres in total")]
    pub description: String,
    /// Publish immediately; otherwise the listing is saved as a draft
    #[serde(default)]
    pub publish: bool,
}

/// Listing status change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateListingStatusRequest {
    pub status: ListingStatus,
}

/// Listing as seen by the caller
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ListingStatus,
    pub proposals_count: u32,
    pub views_count: u32,
    /// Only the proposals the caller may see
    pub proposals: Vec<ProposalResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<ListingPermissions>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id,
            owner_id: listing.owner_id,
            title: listing.title,
            description: listing.description,
            status: listing.status,
            proposals_count: listing.proposals_count,
            views_count: listing.views_count,
            proposals: listing.proposals.into_iter().map(ProposalResponse::from).collect(),
            permissions: None,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}

impl From<ListingView> for ListingResponse {
    fn from(view: ListingView) -> Self {
        let mut response = ListingResponse::from(view.listing);
        response.permissions = Some(view.permissions);
        response
    }
}

/// Create listing routes
pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_listing))
        .route("/:id", get(get_listing))
        .route("/:id/status", put(update_listing_status))
}

/// Create a listing as the acting customer
#[utoipa::path(
    post,
    path = "/listings",
    tag = "Listings",
    security(("bearer_auth" = [])),
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ListingResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only customers may create listings")
    )
)]
pub async fn create_listing(
    Extension(actor): Extension<ActorContext>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateListingRequest>,
) -> AppResult<(StatusCode, Json<ListingResponse>)> {
    require_session(&actor)?;

    let input = NewListing {
        title: payload.title,
        description: payload.description,
        publish: payload.publish,
    };
    let listing = state.services.listings.create_listing(&actor, input).await?;

    Ok((StatusCode::CREATED, Json(ListingResponse::from(listing))))
}

/// Get a listing with the caller's permissions
#[utoipa::path(
    get,
    path = "/listings/{id}",
    tag = "Listings",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Listing", body = ListingResponse),
        (status = 403, description = "Draft listing not visible to caller"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_listing(
    Extension(actor): Extension<ActorContext>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ListingResponse>> {
    let view = state.services.listings.get_listing(&actor, id).await?;
    Ok(Json(ListingResponse::from(view)))
}

/// Change listing status (owner only)
#[utoipa::path(
    put,
    path = "/listings/{id}/status",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    request_body = UpdateListingStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ListingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the owner acting as customer"),
        (status = 404, description = "Listing not found"),
        (status = 409, description = "Status change not allowed from the current status")
    )
)]
pub async fn update_listing_status(
    Extension(actor): Extension<ActorContext>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateListingStatusRequest>,
) -> AppResult<Json<ListingResponse>> {
    require_session(&actor)?;

    let listing = state
        .services
        .listings
        .change_status(&actor, id, payload.status)
        .await?;

    Ok(Json(ListingResponse::from(listing)))
}
