//! Data models
//!
//! Shared between the approval engine and its callers.
//! Names of staff are the identity key everywhere (exact match, never substring).

pub mod attachment;
pub mod request;
pub mod staff;

// Re-exports
pub use attachment::*;
pub use request::*;
pub use staff::*;
