//! RequestsManager - transition processing over the requests table
//!
//! # Transition Flow
//!
//! ```text
//! execute(session, action)
//!     ├─ 1. Resolve actor (staff table + config)
//!     ├─ 2. Acquire writer mutex + table lock
//!     ├─ 3. Load fresh table, find row by id
//!     ├─ 4. Policy check on the fresh row
//!     ├─ 5. Apply action
//!     ├─ 6. Persist (temp file + rename)
//!     └─ 7. Release, return updated row
//! ```
//!
//! Any failure before step 6 completes leaves the stored table untouched.

mod queries;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use shared::models::{Request, RequestFields};

use super::actions::{
    ActionContext, ApproveAction, CreateRequestAction, EditRequestAction, RejectAction,
    RequestAction, SetPaymentStatusAction, SoftDeleteAction, Stage, SubmitRequestAction,
    WorkflowAction,
};
use super::error::{WorkflowError, WorkflowResult};
use super::sequence::{claim_id, next_id};
use crate::auth::{Actor, Session, check};
use crate::core::Config;
use crate::identity::IdentityStore;
use crate::store::Table;
use crate::utils::Clock;

/// Workflow engine over one requests table
pub struct RequestsManager {
    config: Arc<Config>,
    table: Table<Request>,
    identity: Arc<IdentityStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RequestsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestsManager")
            .field("table", &self.table.path())
            .field("identity", &"<IdentityStore>")
            .field("clock", &"<dyn Clock>")
            .finish()
    }
}

impl RequestsManager {
    pub fn new(
        config: Arc<Config>,
        table: Table<Request>,
        identity: Arc<IdentityStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            table,
            identity,
            clock,
        }
    }

    /// Underlying table (whole-table load / persist)
    pub fn table(&self) -> &Table<Request> {
        &self.table
    }

    fn context<'a>(&'a self, actor: &'a Actor, now: NaiveDateTime) -> ActionContext<'a> {
        ActionContext {
            actor,
            now,
            today: now.date(),
            identity: &self.identity,
        }
    }

    // ========== Create ==========

    /// Create a Draft owned by the session's staff member.
    ///
    /// The candidate id comes from an unlocked snapshot. Under the write lock
    /// it is checked against the fresh table and regenerated if another
    /// create took it in between.
    pub fn create(&self, session: &Session, fields: RequestFields) -> WorkflowResult<Request> {
        let actor = self.identity.resolve(session)?;
        let ctx = self.context(&actor, self.clock.now());
        let action = CreateRequestAction::new(fields);
        action.validate(&ctx)?;

        let candidate = next_id(&self.table.load_all()?, ctx.today);
        let draft = self.table.update(|rows| {
            let Some(id) = claim_id(rows, &candidate, ctx.today) else {
                return Err(WorkflowError::DuplicateId(candidate.clone()));
            };
            if id != candidate {
                tracing::warn!(
                    candidate = %candidate,
                    request_id = %id,
                    "Id taken on create, regenerated"
                );
            }
            let draft = action.build(id, &ctx);
            rows.push(draft.clone());
            Ok(draft)
        })?;

        tracing::info!(
            request_id = %draft.id,
            requester = %draft.requester,
            project_owner = %draft.fields.project_owner,
            amount = draft.fields.amount,
            "Request created"
        );
        Ok(draft)
    }

    // ========== Transitions ==========

    /// Run one transition against the stored row
    pub fn execute(
        &self,
        session: &Session,
        action: impl Into<WorkflowAction>,
    ) -> WorkflowResult<Request> {
        let action: WorkflowAction = action.into();
        let transition = action.transition();
        let request_id = action.request_id().to_string();

        let actor = self.identity.resolve(session)?;
        let ctx = self.context(&actor, self.clock.now());

        let (from, updated) = self.table.update(|rows| {
            let record = rows
                .iter_mut()
                .find(|r| r.id == request_id)
                .ok_or_else(|| WorkflowError::NotFound(request_id.clone()))?;

            if let Err(denial) = check(&actor, record, transition) {
                tracing::warn!(
                    request_id = %request_id,
                    actor = %actor.name,
                    %transition,
                    status = %record.status,
                    %denial,
                    "Transition denied"
                );
                return Err(WorkflowError::Forbidden(denial));
            }

            let from = record.status;
            action.apply(record, &ctx)?;
            Ok((from, record.clone()))
        })?;

        tracing::info!(
            request_id = %request_id,
            actor = %actor.name,
            %transition,
            from = %from,
            to = %updated.status,
            "Request transitioned"
        );
        Ok(updated)
    }

    pub fn edit(
        &self,
        session: &Session,
        request_id: &str,
        fields: RequestFields,
    ) -> WorkflowResult<Request> {
        self.execute(session, EditRequestAction::new(request_id, fields))
    }

    pub fn submit(&self, session: &Session, request_id: &str) -> WorkflowResult<Request> {
        self.execute(session, SubmitRequestAction::new(request_id))
    }

    /// 初审核准 (project owner)
    pub fn approve_stage1(&self, session: &Session, request_id: &str) -> WorkflowResult<Request> {
        self.execute(session, ApproveAction::new(request_id, Stage::One))
    }

    pub fn reject_at_stage1(
        &self,
        session: &Session,
        request_id: &str,
        reason: &str,
    ) -> WorkflowResult<Request> {
        self.execute(session, RejectAction::new(request_id, Stage::One, reason))
    }

    /// 复审核准 (finance lead)
    pub fn approve_stage2(&self, session: &Session, request_id: &str) -> WorkflowResult<Request> {
        self.execute(session, ApproveAction::new(request_id, Stage::Two))
    }

    pub fn reject_at_stage2(
        &self,
        session: &Session,
        request_id: &str,
        reason: &str,
    ) -> WorkflowResult<Request> {
        self.execute(session, RejectAction::new(request_id, Stage::Two, reason))
    }

    /// Soft delete; the row stays in the table
    pub fn soft_delete(
        &self,
        session: &Session,
        request_id: &str,
        reason: &str,
    ) -> WorkflowResult<Request> {
        self.execute(session, SoftDeleteAction::new(request_id, reason))
    }

    /// Admin only, Approved records only
    pub fn set_payment_status(
        &self,
        session: &Session,
        request_id: &str,
        paid: bool,
        date: Option<NaiveDate>,
    ) -> WorkflowResult<Request> {
        self.execute(session, SetPaymentStatusAction::new(request_id, paid, date))
    }

    /// Amount actually remitted, after the configured transfer fee
    pub fn net_payable(&self, record: &Request) -> u64 {
        record.net_payable(self.config.transfer_fee)
    }
}

#[cfg(test)]
mod tests;
