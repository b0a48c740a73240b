//! Transition action implementations
//!
//! Each action implements [`RequestAction`] and handles one transition.
//! The manager loads the row, runs the policy check for
//! [`RequestAction::transition`], then calls [`RequestAction::apply`] on the
//! fresh row inside the write lock.

use chrono::{NaiveDate, NaiveDateTime};
use shared::models::{Request, RequestFields};

use crate::auth::{Actor, Transition};
use crate::identity::IdentityStore;
use crate::requests::error::{InputError, WorkflowResult};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};

mod approve;
mod create;
mod edit;
mod payment;
mod reject;
mod soft_delete;
mod submit;

pub use approve::ApproveAction;
pub use create::CreateRequestAction;
pub use edit::EditRequestAction;
pub use payment::SetPaymentStatusAction;
pub use reject::RejectAction;
pub use soft_delete::SoftDeleteAction;
pub use submit::SubmitRequestAction;

/// Approval gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Project owner
    One,
    /// Finance lead
    Two,
}

/// Per-call context handed to every action
pub struct ActionContext<'a> {
    pub actor: &'a Actor,
    pub now: NaiveDateTime,
    pub today: NaiveDate,
    pub identity: &'a IdentityStore,
}

impl ActionContext<'_> {
    /// Project owner must be an Active, allowed staff member right now
    pub fn ensure_eligible_owner(&self, name: &str) -> WorkflowResult<()> {
        if self.identity.is_eligible_project_owner(name)? {
            Ok(())
        } else {
            Err(InputError::IneligibleProjectOwner(name.to_string()).into())
        }
    }
}

/// One transition on one existing request
pub trait RequestAction {
    fn request_id(&self) -> &str;

    fn transition(&self) -> Transition;

    /// Mutate the row. Only called after the policy allowed the transition.
    fn apply(&self, record: &mut Request, ctx: &ActionContext<'_>) -> WorkflowResult<()>;
}

/// WorkflowAction enum - dispatches to concrete action implementations
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    Edit(EditRequestAction),
    Submit(SubmitRequestAction),
    Approve(ApproveAction),
    Reject(RejectAction),
    SoftDelete(SoftDeleteAction),
    SetPaymentStatus(SetPaymentStatusAction),
}

impl RequestAction for WorkflowAction {
    fn request_id(&self) -> &str {
        match self {
            WorkflowAction::Edit(action) => action.request_id(),
            WorkflowAction::Submit(action) => action.request_id(),
            WorkflowAction::Approve(action) => action.request_id(),
            WorkflowAction::Reject(action) => action.request_id(),
            WorkflowAction::SoftDelete(action) => action.request_id(),
            WorkflowAction::SetPaymentStatus(action) => action.request_id(),
        }
    }

    fn transition(&self) -> Transition {
        match self {
            WorkflowAction::Edit(action) => action.transition(),
            WorkflowAction::Submit(action) => action.transition(),
            WorkflowAction::Approve(action) => action.transition(),
            WorkflowAction::Reject(action) => action.transition(),
            WorkflowAction::SoftDelete(action) => action.transition(),
            WorkflowAction::SetPaymentStatus(action) => action.transition(),
        }
    }

    fn apply(&self, record: &mut Request, ctx: &ActionContext<'_>) -> WorkflowResult<()> {
        match self {
            WorkflowAction::Edit(action) => action.apply(record, ctx),
            WorkflowAction::Submit(action) => action.apply(record, ctx),
            WorkflowAction::Approve(action) => action.apply(record, ctx),
            WorkflowAction::Reject(action) => action.apply(record, ctx),
            WorkflowAction::SoftDelete(action) => action.apply(record, ctx),
            WorkflowAction::SetPaymentStatus(action) => action.apply(record, ctx),
        }
    }
}

macro_rules! impl_from_action {
    ($($variant:ident($action:ty)),* $(,)?) => {
        $(
            impl From<$action> for WorkflowAction {
                fn from(action: $action) -> Self {
                    WorkflowAction::$variant(action)
                }
            }
        )*
    };
}

impl_from_action!(
    Edit(EditRequestAction),
    Submit(SubmitRequestAction),
    Approve(ApproveAction),
    Reject(RejectAction),
    SoftDelete(SoftDeleteAction),
    SetPaymentStatus(SetPaymentStatusAction),
);

/// Mandatory fields non-empty, lengths within limits, amount > 0.
///
/// Wire transfers also need a remittance account.
pub fn validate_fields(fields: &RequestFields) -> Result<(), InputError> {
    validate_required_text(&fields.project_owner, "project owner", MAX_NAME_LEN)?;
    validate_required_text(&fields.project_name, "project name", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&fields.project_code, "project code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&fields.description, "description", MAX_NOTE_LEN)?;
    validate_required_text(&fields.currency, "currency", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&fields.vendor, "vendor", MAX_NAME_LEN)?;
    let account = &fields.remittance_account;
    if fields.payment_method.is_transfer() {
        validate_required_text(account, "remittance account", MAX_SHORT_TEXT_LEN)?;
    } else {
        validate_optional_text(account, "remittance account", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&fields.requester_contact, "requester contact", MAX_SHORT_TEXT_LEN)?;
    if fields.amount == 0 {
        return Err(InputError::NonPositiveAmount);
    }
    Ok(())
}

/// Trimmed, non-empty reason within the note limit
pub(crate) fn required_reason(reason: &str, missing: InputError) -> Result<String, InputError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(missing);
    }
    validate_optional_text(reason, "reason", MAX_NOTE_LEN)?;
    Ok(reason.to_string())
}

/// Trim the free-text fields before they are stored
pub(crate) fn normalized(fields: &RequestFields) -> RequestFields {
    RequestFields {
        project_owner: fields.project_owner.trim().to_string(),
        project_name: fields.project_name.trim().to_string(),
        project_code: fields.project_code.trim().to_string(),
        description: fields.description.trim().to_string(),
        currency: fields.currency.trim().to_string(),
        vendor: fields.vendor.trim().to_string(),
        remittance_account: fields.remittance_account.trim().to_string(),
        requester_contact: fields.requester_contact.trim().to_string(),
        ..fields.clone()
    }
}
