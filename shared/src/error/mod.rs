//! Unified error system for the expense desk
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Request workflow errors
//! - 8xxx: Staff errors
//! - 9xxx: System / storage errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::invalid_field(ErrorCode::RequiredField, "vendor is required", "vendor")
//!     .with_detail("id", "20260101-01");
//! assert_eq!(err.code.code(), 7);
//! assert!(!err.is_retryable());
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::AppError;
