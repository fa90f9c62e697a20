//! Proposal handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{ActorContext, Proposal, ProposalDraft, ProposalStatus};

use crate::extractors::ValidatedJson;
use crate::middleware::require_session;
use crate::state::AppState;

/// Proposal submission request.
///
/// Carries no length rules: content is checked inside the lifecycle, after
/// the permission check, so an actor who may not bid always gets 403.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitProposalRequest {
    #[schema(example = "Bench & Co")]
    pub vendor_name: String,
    /// 50 to 10000 characters after trimming
    pub proposal_text: String,
    /// Up to 100 characters; blank is treated as absent
    #[schema(example = "4,200")]
    pub proposed_price: Option<String>,
    /// Up to 100 characters; blank is treated as absent
    #[schema(example = "3 weeks")]
    pub proposed_timeline: Option<String>,
}

impl From<SubmitProposalRequest> for ProposalDraft {
    fn from(req: SubmitProposalRequest) -> Self {
        ProposalDraft {
            vendor_name: req.vendor_name,
            text: req.proposal_text,
            proposed_price: req.proposed_price,
            proposed_timeline: req.proposed_timeline,
        }
    }
}

/// Accept or reject request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProposalStatusRequest {
    pub status: ProposalStatus,
}

/// Proposal response
#[derive(Debug, Serialize, ToSchema)]
pub struct ProposalResponse {
    pub listing_id: Uuid,
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub proposal_text: String,
    pub proposed_price: Option<String>,
    pub proposed_timeline: Option<String>,
    pub status: ProposalStatus,
    pub submitted_at: DateTime<Utc>,
}

impl From<Proposal> for ProposalResponse {
    fn from(p: Proposal) -> Self {
        Self {
            listing_id: p.listing_id,
            vendor_id: p.vendor_id,
            vendor_name: p.vendor_name,
            proposal_text: p.proposal_text,
            proposed_price: p.proposed_price,
            proposed_timeline: p.proposed_timeline,
            status: p.status,
            submitted_at: p.submitted_at,
        }
    }
}

/// Create proposal routes (nested under /listings)
pub fn proposal_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/proposals", get(list_proposals).post(submit_proposal))
        .route("/:id/proposals/:vendor_id/status", put(update_proposal_status))
}

/// Proposals the caller may see on a listing
#[utoipa::path(
    get,
    path = "/listings/{id}/proposals",
    tag = "Proposals",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (
            status = 200,
            description = "Owner sees all, vendors see their own",
            body = Vec<ProposalResponse>
        ),
        (status = 403, description = "Draft listing not visible to caller"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn list_proposals(
    Extension(actor): Extension<ActorContext>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ProposalResponse>>> {
    let proposals = state.services.proposals.list_proposals(&actor, id).await?;
    Ok(Json(proposals.into_iter().map(ProposalResponse::from).collect()))
}

/// Submit the caller's proposal
#[utoipa::path(
    post,
    path = "/listings/{id}/proposals",
    tag = "Proposals",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    request_body = SubmitProposalRequest,
    responses(
        (status = 201, description = "Proposal submitted", body = ProposalResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller may not bid on this listing"),
        (status = 404, description = "Listing not found"),
        (status = 409, description = "Caller already has a proposal on this listing")
    )
)]
pub async fn submit_proposal(
    Extension(actor): Extension<ActorContext>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SubmitProposalRequest>,
) -> AppResult<(StatusCode, Json<ProposalResponse>)> {
    require_session(&actor)?;

    let proposal = state
        .services
        .proposals
        .submit_proposal(&actor, id, ProposalDraft::from(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(ProposalResponse::from(proposal))))
}

/// Accept or reject a pending proposal (listing owner only)
#[utoipa::path(
    put,
    path = "/listings/{id}/proposals/{vendor_id}/status",
    tag = "Proposals",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Listing ID"),
        ("vendor_id" = Uuid, Path, description = "Vendor whose proposal to decide")
    ),
    request_body = UpdateProposalStatusRequest,
    responses(
        (status = 200, description = "Proposal decided", body = ProposalResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the owner acting as customer"),
        (status = 404, description = "Listing or proposal not found"),
        (status = 409, description = "Proposal already decided")
    )
)]
pub async fn update_proposal_status(
    Extension(actor): Extension<ActorContext>,
    State(state): State<AppState>,
    Path((id, vendor_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<UpdateProposalStatusRequest>,
) -> AppResult<Json<ProposalResponse>> {
    require_session(&actor)?;

    let proposal = state
        .services
        .proposals
        .change_proposal_status(&actor, id, vendor_id, payload.status)
        .await?;

    Ok(Json(ProposalResponse::from(proposal)))
}
