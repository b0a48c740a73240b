//! Create a draft request
//!
//! Not a [`RequestAction`](super::RequestAction): there is no row yet. The
//! manager validates, then allocates the id inside the write lock.

use shared::models::{Request, RequestFields};

use super::{ActionContext, normalized, validate_fields};
use crate::auth::Denial;
use crate::requests::error::{WorkflowError, WorkflowResult};

/// CreateRequest action
#[derive(Debug, Clone)]
pub struct CreateRequestAction {
    pub fields: RequestFields,
}

impl CreateRequestAction {
    pub fn new(fields: RequestFields) -> Self {
        Self {
            fields: normalized(&fields),
        }
    }

    /// Requester active, fields complete, project owner eligible
    pub fn validate(&self, ctx: &ActionContext<'_>) -> WorkflowResult<()> {
        if !ctx.actor.is_active() {
            return Err(WorkflowError::Forbidden(Denial::Inactive));
        }
        validate_fields(&self.fields)?;
        ctx.ensure_eligible_owner(&self.fields.project_owner)
    }

    /// Draft row with the allocated id
    pub fn build(&self, id: String, ctx: &ActionContext<'_>) -> Request {
        Request::new(id, ctx.today, ctx.actor.name.clone(), self.fields.clone())
    }
}
