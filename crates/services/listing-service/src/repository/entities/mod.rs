//! SeaORM entities for the marketplace tables.

pub mod listing;
pub mod message;
pub mod proposal;
