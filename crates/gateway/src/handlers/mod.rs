//! HTTP request handlers.

pub mod health_handler;
pub mod listing_handler;
pub mod message_handler;
pub mod proposal_handler;

pub use health_handler::health_routes;
pub use listing_handler::listing_routes;
pub use message_handler::message_routes;
pub use proposal_handler::proposal_routes;
