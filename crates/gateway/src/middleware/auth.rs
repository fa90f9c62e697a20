//! Session middleware.
//!
//! Turns the bearer token and the acting-as header into an [`ActorContext`]
//! for every request. A request without a token proceeds as anonymous; a
//! request with a bad token is rejected outright.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{ActingRole, ActorContext, Role};

use crate::state::AppState;

/// Header a super-admin uses to pick which side of the marketplace to act on
pub const ACTING_AS_HEADER: &str = "x-acting-as";

/// Claims issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    /// Stored role; missing or unknown values resolve to `unset`
    #[serde(default)]
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Resolve the actor for this request and stash it in the extensions.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let actor = match extract_token(request.headers())? {
        None => ActorContext::anonymous(),
        Some(token) => {
            let data = decode::<Claims>(
                token,
                &DecodingKey::from_secret(state.jwt.secret_bytes()),
                &Validation::default(),
            )?;
            let claims = data.claims;
            state.admin.resolve(
                Some(claims.sub),
                &claims.email,
                Role::from(claims.role),
                acting_as(request.headers()),
            )
        }
    };

    tracing::debug!(
        identity = ?actor.identity,
        effective_role = %actor.effective_role,
        super_admin = actor.is_super_admin,
        "actor resolved"
    );
    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}

/// Mutating endpoints need a signed-in actor before any permission check runs.
pub fn require_session(actor: &ActorContext) -> AppResult<()> {
    if actor.is_authenticated() {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Bearer token, if any. A malformed Authorization header is an error.
fn extract_token(headers: &HeaderMap) -> AppResult<Option<&str>> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AppError::Unauthorized)?;
    value
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or(AppError::Unauthorized)
}

/// Unknown override values are ignored rather than rejected.
fn acting_as(headers: &HeaderMap) -> Option<ActingRole> {
    headers
        .get(ACTING_AS_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(ActingRole::parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_missing_header_is_anonymous() {
        assert_eq!(extract_token(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn test_non_bearer_header_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(extract_token(&headers), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_bearer_token_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_token(&headers).unwrap(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_acting_as_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(acting_as(&headers), None);
        headers.insert(ACTING_AS_HEADER, HeaderValue::from_static("Vendor"));
        assert_eq!(acting_as(&headers), Some(ActingRole::Vendor));
        headers.insert(ACTING_AS_HEADER, HeaderValue::from_static("superadmin"));
        assert_eq!(acting_as(&headers), None);
    }
}
