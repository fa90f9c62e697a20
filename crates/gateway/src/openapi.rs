//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::health_handler::{DependencyHealth, HealthResponse};
use crate::handlers::listing_handler::{
    CreateListingRequest, ListingResponse, UpdateListingStatusRequest,
};
use crate::handlers::message_handler::{MessageResponse, SendMessageRequest};
use crate::handlers::proposal_handler::{
    ProposalResponse, SubmitProposalRequest, UpdateProposalStatusRequest,
};
use domain::{ActingRole, ListingPermissions, ListingStatus, MessageDirection, ProposalStatus};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::listing_handler::create_listing,
        crate::handlers::listing_handler::get_listing,
        crate::handlers::listing_handler::update_listing_status,
        crate::handlers::proposal_handler::list_proposals,
        crate::handlers::proposal_handler::submit_proposal,
        crate::handlers::proposal_handler::update_proposal_status,
        crate::handlers::message_handler::list_messages,
        crate::handlers::message_handler::send_message,
    ),
    components(
        schemas(
            HealthResponse,
            DependencyHealth,
            CreateListingRequest,
            UpdateListingStatusRequest,
            ListingResponse,
            ListingPermissions,
            ListingStatus,
            SubmitProposalRequest,
            UpdateProposalStatusRequest,
            ProposalResponse,
            ProposalStatus,
            SendMessageRequest,
            MessageResponse,
            MessageDirection,
            ActingRole,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and dependency checks"),
        (name = "Listings", description = "Customer listings"),
        (name = "Proposals", description = "Vendor proposals and owner decisions"),
        (name = "Messages", description = "Owner and vendor conversation threads"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
