//! Middleware for session resolution.

mod auth;

pub use auth::{require_session, session_middleware, Claims, ACTING_AS_HEADER};
