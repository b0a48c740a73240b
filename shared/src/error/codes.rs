//! Unified error codes for the expense desk
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Request (workflow) errors
//! - 8xxx: Staff errors
//! - 9xxx: System / storage errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so that any outer surface
/// (UI, API, printed report) can render them without knowing the Rust types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (name/credential)
    InvalidCredentials = 1002,
    /// Account is disabled (terminated staff)
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific signing role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Request ====================
    /// Request not found
    RequestNotFound = 4001,
    /// Request is not in an editable state
    RequestNotEditable = 4002,
    /// Request can never be deleted in its current state
    RequestNotDeletable = 4003,
    /// Transition not allowed from the current state
    InvalidTransition = 4004,
    /// Request id collided with an existing row
    DuplicateRequestId = 4005,
    /// Rejection reason is required
    RejectionReasonRequired = 4006,
    /// Deletion reason is required
    DeletionReasonRequired = 4007,
    /// Payment date is required when marking paid
    PaymentDateRequired = 4008,
    /// Amount must be positive
    InvalidAmount = 4009,

    // ==================== 8xxx: Staff ====================
    /// Staff account not found
    StaffNotFound = 8001,
    /// Staff name already exists
    StaffNameExists = 8002,
    /// Staff member cannot be selected as project owner
    InvalidProjectOwner = 8004,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,

    // ==================== 94xx: Storage ====================
    /// Backing medium cannot be read or written
    StoreUnavailable = 9401,
    /// Backing medium is exclusively held by another process
    StoreLocked = 9402,
    /// Stored data could not be decoded
    StorageCorrupted = 9403,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether the caller may retry the same operation later without changing input
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::StoreLocked | ErrorCode::StoreUnavailable)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid name or credential",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Signing role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Request
            ErrorCode::RequestNotFound => "Request not found",
            ErrorCode::RequestNotEditable => "Request is not editable in its current state",
            ErrorCode::RequestNotDeletable => "Request cannot be deleted in its current state",
            ErrorCode::InvalidTransition => "Transition is not allowed from the current state",
            ErrorCode::DuplicateRequestId => "Request id already exists",
            ErrorCode::RejectionReasonRequired => "A rejection reason is required",
            ErrorCode::DeletionReasonRequired => "A deletion reason is required",
            ErrorCode::PaymentDateRequired => "A payment date is required",
            ErrorCode::InvalidAmount => "Amount must be greater than zero",

            // Staff
            ErrorCode::StaffNotFound => "Staff account not found",
            ErrorCode::StaffNameExists => "Staff name already exists",
            ErrorCode::InvalidProjectOwner => "Staff member cannot be project owner",

            // System
            ErrorCode::InternalError => "Internal error",

            // Storage
            ErrorCode::StoreUnavailable => "Data store is unavailable",
            ErrorCode::StoreLocked => "Data store is locked by another program",
            ErrorCode::StorageCorrupted => "Data store content is corrupted",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Request
            4001 => Ok(ErrorCode::RequestNotFound),
            4002 => Ok(ErrorCode::RequestNotEditable),
            4003 => Ok(ErrorCode::RequestNotDeletable),
            4004 => Ok(ErrorCode::InvalidTransition),
            4005 => Ok(ErrorCode::DuplicateRequestId),
            4006 => Ok(ErrorCode::RejectionReasonRequired),
            4007 => Ok(ErrorCode::DeletionReasonRequired),
            4008 => Ok(ErrorCode::PaymentDateRequired),
            4009 => Ok(ErrorCode::InvalidAmount),

            // Staff
            8001 => Ok(ErrorCode::StaffNotFound),
            8002 => Ok(ErrorCode::StaffNameExists),
            8004 => Ok(ErrorCode::InvalidProjectOwner),

            // System
            9001 => Ok(ErrorCode::InternalError),

            // Storage
            9401 => Ok(ErrorCode::StoreUnavailable),
            9402 => Ok(ErrorCode::StoreLocked),
            9403 => Ok(ErrorCode::StorageCorrupted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
