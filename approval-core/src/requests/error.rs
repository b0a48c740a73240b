use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::auth::{Denial, Transition};
use crate::identity::IdentityError;
use crate::store::StoreError;
use crate::utils::InvalidField;

/// Caller supplied something unusable; nothing was changed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error(transparent)]
    Field(#[from] InvalidField),

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("rejection reason is required")]
    RejectionReasonRequired,

    #[error("deletion reason is required")]
    DeletionReasonRequired,

    #[error("payment date is required when marking a request paid")]
    PaymentDateRequired,

    #[error("{0} cannot be selected as project owner")]
    IneligibleProjectOwner(String),
}

/// Workflow engine errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Forbidden: {0}")]
    Forbidden(Denial),

    #[error("Request not found: {0}")]
    NotFound(String),

    #[error("Duplicate request id: {0}")]
    DuplicateId(String),

    #[error("Store locked: {0}")]
    StoreLocked(#[source] StoreError),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl WorkflowError {
    /// Store-level failure; the caller may retry the whole operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreLocked(_) | Self::StoreUnavailable(_))
    }
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        if err.is_locked() {
            Self::StoreLocked(err)
        } else {
            Self::StoreUnavailable(err)
        }
    }
}

impl From<InvalidField> for WorkflowError {
    fn from(err: InvalidField) -> Self {
        Self::InvalidInput(err.into())
    }
}

impl From<IdentityError> for WorkflowError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Store(e) => e.into(),
            IdentityError::AccountDisabled(_) => Self::Forbidden(Denial::Inactive),
            other => {
                tracing::warn!(error = %other, "Actor could not be resolved");
                Self::Forbidden(Denial::UnknownActor)
            }
        }
    }
}

fn input_error_code(err: &InputError) -> ErrorCode {
    match err {
        InputError::Field(InvalidField::Empty(_)) => ErrorCode::RequiredField,
        InputError::Field(InvalidField::TooLong { .. }) => ErrorCode::ValueOutOfRange,
        InputError::NonPositiveAmount => ErrorCode::InvalidAmount,
        InputError::RejectionReasonRequired => ErrorCode::RejectionReasonRequired,
        InputError::DeletionReasonRequired => ErrorCode::DeletionReasonRequired,
        InputError::PaymentDateRequired => ErrorCode::PaymentDateRequired,
        InputError::IneligibleProjectOwner(_) => ErrorCode::InvalidProjectOwner,
    }
}

fn denial_code(denial: &Denial) -> ErrorCode {
    match denial {
        Denial::WrongStatus {
            transition: Transition::Edit,
            ..
        } => ErrorCode::RequestNotEditable,
        Denial::WrongStatus {
            transition: Transition::SoftDelete,
            ..
        } => ErrorCode::RequestNotDeletable,
        Denial::WrongStatus { .. } => ErrorCode::InvalidTransition,
        Denial::NotRequester | Denial::NotProjectOwner | Denial::NotFinanceLead => {
            ErrorCode::RoleRequired
        }
        Denial::NotAdmin => ErrorCode::AdminRequired,
        Denial::Inactive => ErrorCode::AccountDisabled,
        Denial::UnknownActor => ErrorCode::NotAuthenticated,
        Denial::NotVisible => ErrorCode::PermissionDenied,
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidInput(e) => match &e {
                InputError::Field(field) => {
                    AppError::invalid_field(input_error_code(&e), e.to_string(), field.field())
                }
                _ => AppError::with_message(input_error_code(&e), e.to_string()),
            },
            WorkflowError::Forbidden(denial) => {
                AppError::with_message(denial_code(&denial), denial.to_string())
            }
            WorkflowError::NotFound(id) => {
                AppError::new(ErrorCode::RequestNotFound).with_detail("id", id)
            }
            WorkflowError::DuplicateId(id) => {
                AppError::new(ErrorCode::DuplicateRequestId).with_detail("id", id)
            }
            WorkflowError::StoreLocked(e) | WorkflowError::StoreUnavailable(e) => e.into(),
        }
    }
}
