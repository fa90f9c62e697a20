//! HTTP-level tests: session resolution, routing, and error mapping.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use common::JwtConfig;
use domain::{AdminPolicy, Listing, ListingStatus, Proposal, ProposalStatus};
use gateway_lib::middleware::{Claims, ACTING_AS_HEADER};
use gateway_lib::routes::create_router;
use gateway_lib::state::{AppState, HealthProbe};
use listing_service_lib::repository::{MockListingRepository, MockMessageRepository};
use listing_service_lib::service::{
    ConversationManager, ListingManager, MockNotificationDispatcher, ProposalManager, Services,
};

const SECRET: &str = "test-secret-key-minimum-32-chars!!";
const ADMIN_EMAIL: &str = "root@marketplace.test";

struct StaticProbe(Result<(), String>);

#[async_trait]
impl HealthProbe for StaticProbe {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> Result<(), String> {
        self.0.clone()
    }
}

fn app_with(listings: MockListingRepository, probe: StaticProbe) -> Router {
    let listings = Arc::new(listings);
    let mut notifier = MockNotificationDispatcher::new();
    notifier.expect_dispatch().return_const(());
    let notifier = Arc::new(notifier);

    let services = Services::new(
        Arc::new(ListingManager::new(listings.clone())),
        Arc::new(ProposalManager::new(listings.clone(), notifier.clone())),
        Arc::new(ConversationManager::new(
            listings,
            Arc::new(MockMessageRepository::new()),
            notifier,
        )),
    );
    let state = AppState::new(
        services,
        AdminPolicy::new([ADMIN_EMAIL], true),
        JwtConfig {
            secret: SECRET.to_string(),
        },
        Arc::new(probe),
    );
    create_router(state)
}

fn app(listings: MockListingRepository) -> Router {
    app_with(listings, StaticProbe(Ok(())))
}

fn token(id: Uuid, email: &str, role: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: id,
        email: email.to_string(),
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn listing(owner: Uuid, status: ListingStatus) -> Listing {
    Listing::new(
        Uuid::new_v4(),
        owner,
        "Loft conversion".to_string(),
        "Planning already approved".to_string(),
        status,
    )
}

fn repo_with(listing: Listing) -> MockListingRepository {
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(listing.clone())));
    repo.expect_increment_views().returning(|_| Ok(()));
    repo
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn proposal_body() -> Value {
    json!({
        "vendor_name": "Attic Experts",
        "proposal_text": "Full dormer conversion including stairs, insulation and en-suite.",
        "proposed_price": "42,000",
        "proposed_timeline": ""
    })
}

#[tokio::test]
async fn test_health_ok() {
    let response = app(MockListingRepository::new())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_health_degraded_when_database_down() {
    let app = app_with(
        MockListingRepository::new(),
        StaticProbe(Err("connection refused".to_string())),
    );
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["dependency"]["error"], "connection refused");
}

#[tokio::test]
async fn test_anonymous_can_read_active_listing() {
    let l = listing(Uuid::new_v4(), ListingStatus::Active);
    let uri = format!("/listings/{}", l.id);

    let response = app(repo_with(l))
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "active");
    assert_eq!(body["permissions"]["can_submit_proposal"], false);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let l = listing(Uuid::new_v4(), ListingStatus::Active);
    let uri = format!("/listings/{}", l.id);

    let response = app(repo_with(l))
        .oneshot(
            Request::get(uri)
                .header(AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_submit_requires_session() {
    let l = listing(Uuid::new_v4(), ListingStatus::Active);
    let uri = format!("/listings/{}/proposals", l.id);

    let response = app(repo_with(l))
        .oneshot(
            Request::post(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(proposal_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_vendor_submits_proposal() {
    let l = listing(Uuid::new_v4(), ListingStatus::Active);
    let uri = format!("/listings/{}/proposals", l.id);
    let vendor_id = Uuid::new_v4();

    let mut repo = repo_with(l);
    repo.expect_insert_proposal().times(1).returning(|_| Ok(()));

    let response = app(repo)
        .oneshot(
            Request::post(uri)
                .header(
                    AUTHORIZATION,
                    format!("Bearer {}", token(vendor_id, "v@seller.test", "vendor")),
                )
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(proposal_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["vendor_id"], vendor_id.to_string());
    assert_eq!(body["status"], "pending");
    assert!(body["proposed_timeline"].is_null());
}

#[tokio::test]
async fn test_owner_submitting_is_forbidden() {
    let owner = Uuid::new_v4();
    let l = listing(owner, ListingStatus::Active);
    let uri = format!("/listings/{}/proposals", l.id);

    let response = app(repo_with(l))
        .oneshot(
            Request::post(uri)
                .header(
                    AUTHORIZATION,
                    format!("Bearer {}", token(owner, "c@buyer.test", "customer")),
                )
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(proposal_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"]["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_duplicate_proposal_is_conflict() {
    let vendor_id = Uuid::new_v4();
    let mut l = listing(Uuid::new_v4(), ListingStatus::Active);
    l.proposals.push(Proposal {
        listing_id: l.id,
        vendor_id,
        vendor_name: "Attic Experts".to_string(),
        proposal_text: "a".repeat(60),
        proposed_price: None,
        proposed_timeline: None,
        status: ProposalStatus::Pending,
        submitted_at: Utc::now(),
    });
    l.proposals_count = 1;
    let uri = format!("/listings/{}/proposals", l.id);

    let response = app(repo_with(l))
        .oneshot(
            Request::post(uri)
                .header(
                    AUTHORIZATION,
                    format!("Bearer {}", token(vendor_id, "v@seller.test", "vendor")),
                )
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(proposal_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "DUPLICATE_PROPOSAL");
}

#[tokio::test]
async fn test_short_proposal_is_bad_request() {
    let l = listing(Uuid::new_v4(), ListingStatus::Active);
    let uri = format!("/listings/{}/proposals", l.id);

    let response = app(repo_with(l))
        .oneshot(
            Request::post(uri)
                .header(
                    AUTHORIZATION,
                    format!("Bearer {}", token(Uuid::new_v4(), "v@seller.test", "vendor")),
                )
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "vendor_name": "X", "proposal_text": "too short" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_owner_with_short_text_is_still_forbidden() {
    let owner = Uuid::new_v4();
    let l = listing(owner, ListingStatus::Active);
    let uri = format!("/listings/{}/proposals", l.id);

    let response = app(repo_with(l))
        .oneshot(
            Request::post(uri)
                .header(
                    AUTHORIZATION,
                    format!("Bearer {}", token(owner, "c@buyer.test", "customer")),
                )
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "vendor_name": "", "proposal_text": "too short" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"]["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_short_text_on_completed_listing_is_forbidden() {
    let l = listing(Uuid::new_v4(), ListingStatus::Completed);
    let uri = format!("/listings/{}/proposals", l.id);

    let response = app(repo_with(l))
        .oneshot(
            Request::post(uri)
                .header(
                    AUTHORIZATION,
                    format!("Bearer {}", token(Uuid::new_v4(), "v@seller.test", "vendor")),
                )
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "vendor_name": "X", "proposal_text": "too short" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"]["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_admin_acting_as_customer_cannot_bid() {
    let l = listing(Uuid::new_v4(), ListingStatus::Active);
    let uri = format!("/listings/{}/proposals", l.id);

    let response = app(repo_with(l))
        .oneshot(
            Request::post(uri)
                .header(
                    AUTHORIZATION,
                    format!("Bearer {}", token(Uuid::new_v4(), ADMIN_EMAIL, "vendor")),
                )
                .header(ACTING_AS_HEADER, "customer")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(proposal_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_override_ignored_for_regular_user() {
    let l = listing(Uuid::new_v4(), ListingStatus::Active);
    let uri = format!("/listings/{}/proposals", l.id);

    let mut repo = repo_with(l);
    repo.expect_insert_proposal().times(1).returning(|_| Ok(()));

    // header asks for customer, but only super-admins may override
    let response = app(repo)
        .oneshot(
            Request::post(uri)
                .header(
                    AUTHORIZATION,
                    format!("Bearer {}", token(Uuid::new_v4(), "v@seller.test", "vendor")),
                )
                .header(ACTING_AS_HEADER, "customer")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(proposal_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_draft_hidden_from_anonymous() {
    let l = listing(Uuid::new_v4(), ListingStatus::Draft);
    let uri = format!("/listings/{}", l.id);

    let response = app(repo_with(l))
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_listing_is_not_found() {
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let response = app(repo)
        .oneshot(
            Request::get(format!("/listings/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_customer_creates_listing() {
    let owner = Uuid::new_v4();
    let mut repo = MockListingRepository::new();
    repo.expect_create().times(1).returning(|l| Ok(l));

    let response = app(repo)
        .oneshot(
            Request::post("/listings")
                .header(
                    AUTHORIZATION,
                    format!("Bearer {}", token(owner, "c@buyer.test", "customer")),
                )
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "title": "Re-tile bathroom", "description": "6m2", "publish": true })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["owner_id"], owner.to_string());
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn test_terminal_proposal_transition_is_conflict() {
    let owner = Uuid::new_v4();
    let vendor_id = Uuid::new_v4();
    let mut l = listing(owner, ListingStatus::Active);
    l.proposals.push(Proposal {
        listing_id: l.id,
        vendor_id,
        vendor_name: "Attic Experts".to_string(),
        proposal_text: "a".repeat(60),
        proposed_price: None,
        proposed_timeline: None,
        status: ProposalStatus::Accepted,
        submitted_at: Utc::now(),
    });
    let uri = format!("/listings/{}/proposals/{}/status", l.id, vendor_id);

    let response = app(repo_with(l))
        .oneshot(
            Request::put(uri)
                .header(
                    AUTHORIZATION,
                    format!("Bearer {}", token(owner, "c@buyer.test", "customer")),
                )
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "status": "rejected" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "INVALID_TRANSITION");
}
