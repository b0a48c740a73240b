//! Soft delete: terminal state, the row stays for audit

use shared::models::{Deletion, Request, RequestStatus};

use super::{ActionContext, RequestAction, required_reason};
use crate::auth::Transition;
use crate::requests::error::{InputError, WorkflowResult};

/// SoftDelete action
#[derive(Debug, Clone)]
pub struct SoftDeleteAction {
    pub request_id: String,
    pub reason: String,
}

impl SoftDeleteAction {
    pub fn new(request_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            reason: reason.into(),
        }
    }
}

impl RequestAction for SoftDeleteAction {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn transition(&self) -> Transition {
        Transition::SoftDelete
    }

    fn apply(&self, record: &mut Request, ctx: &ActionContext<'_>) -> WorkflowResult<()> {
        let reason = required_reason(&self.reason, InputError::DeletionReasonRequired)?;
        record.deletion = Some(Deletion {
            actor: ctx.actor.name.clone(),
            at: ctx.now,
            reason,
        });
        record.status = RequestStatus::Deleted;
        Ok(())
    }
}
