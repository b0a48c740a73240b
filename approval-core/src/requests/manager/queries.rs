//! Read-only views over the requests table

use shared::models::{Request, RequestStatus};

use super::RequestsManager;
use crate::auth::{Denial, Session, Transition, can_transition, can_view};
use crate::requests::error::{WorkflowError, WorkflowResult};

impl RequestsManager {
    /// One record, if the caller may see it
    pub fn get(&self, session: &Session, request_id: &str) -> WorkflowResult<Request> {
        let actor = self.identity.resolve(session)?;
        let record = self
            .table
            .load_all()?
            .into_iter()
            .find(|r| r.id == request_id)
            .ok_or_else(|| WorkflowError::NotFound(request_id.to_string()))?;

        if !can_view(&actor, &record) {
            return Err(WorkflowError::Forbidden(Denial::NotVisible));
        }
        Ok(record)
    }

    /// Records the caller may see, newest id first.
    ///
    /// Soft-deleted rows are only listed for administrators who ask for them.
    pub fn list_visible(
        &self,
        session: &Session,
        include_deleted: bool,
    ) -> WorkflowResult<Vec<Request>> {
        let actor = self.identity.resolve(session)?;
        let include_deleted = include_deleted && actor.is_admin;

        let mut rows: Vec<Request> = self
            .table
            .load_all()?
            .into_iter()
            .filter(|r| include_deleted || r.status != RequestStatus::Deleted)
            .filter(|r| can_view(&actor, r))
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    /// Records waiting for the caller's signature (初审 or 复审)
    pub fn pending_for(&self, session: &Session) -> WorkflowResult<Vec<Request>> {
        let actor = self.identity.resolve(session)?;
        let mut rows: Vec<Request> = self
            .table
            .load_all()?
            .into_iter()
            .filter(|r| {
                can_transition(&actor, r, Transition::ApproveStage1)
                    || can_transition(&actor, r, Transition::ApproveStage2)
            })
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }
}
