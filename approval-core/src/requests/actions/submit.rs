//! Submit a draft or rejected request for stage-1 review

use shared::models::{Request, RequestStatus};

use super::{ActionContext, RequestAction, validate_fields};
use crate::auth::Transition;
use crate::requests::error::WorkflowResult;

/// SubmitRequest action
#[derive(Debug, Clone)]
pub struct SubmitRequestAction {
    pub request_id: String,
}

impl SubmitRequestAction {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

impl RequestAction for SubmitRequestAction {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn transition(&self) -> Transition {
        Transition::Submit
    }

    fn apply(&self, record: &mut Request, ctx: &ActionContext<'_>) -> WorkflowResult<()> {
        // rows imported from the old sheet may never have been validated
        validate_fields(&record.fields)?;
        ctx.ensure_eligible_owner(&record.fields.project_owner)?;

        // a resubmission restarts the whole approval cycle
        record.stage1 = None;
        record.stage2 = None;
        record.rejection_reason = None;

        record.status = RequestStatus::AwaitingStage1;
        record.submitted_at = Some(ctx.now);
        Ok(())
    }
}
