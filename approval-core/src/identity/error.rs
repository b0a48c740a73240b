use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::store::StoreError;
use crate::utils::InvalidField;

/// Identity store errors
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidField),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Administrator required: {0}")]
    AdminRequired(String),

    #[error("Staff not found: {0}")]
    NotFound(String),

    #[error("Staff already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account disabled: {0}")]
    AccountDisabled(String),

    #[error("Credential hashing failed: {0}")]
    Hashing(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidInput(e) => {
                let code = match e {
                    InvalidField::Empty(_) => ErrorCode::RequiredField,
                    InvalidField::TooLong { .. } => ErrorCode::ValueOutOfRange,
                };
                AppError::invalid_field(code, e.to_string(), e.field())
            }
            IdentityError::Forbidden(msg) => AppError::forbidden(msg),
            IdentityError::AdminRequired(name) => {
                AppError::new(ErrorCode::AdminRequired).with_detail("name", name)
            }
            IdentityError::NotFound(name) => {
                AppError::new(ErrorCode::StaffNotFound).with_detail("name", name)
            }
            IdentityError::AlreadyExists(name) => {
                AppError::new(ErrorCode::StaffNameExists).with_detail("name", name)
            }
            IdentityError::InvalidCredentials => AppError::invalid_credentials(),
            IdentityError::AccountDisabled(name) => {
                AppError::new(ErrorCode::AccountDisabled).with_detail("name", name)
            }
            IdentityError::Hashing(msg) => AppError::internal(msg),
            IdentityError::Store(e) => e.into(),
        }
    }
}
