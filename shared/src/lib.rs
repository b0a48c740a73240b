//! Shared types for the expense desk
//!
//! Common types used by the approval engine and any outer surface
//! (UI, API, printing): the unified error system and the domain models.

pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};
