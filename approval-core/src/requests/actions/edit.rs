//! Edit a draft or rejected request
//!
//! Overwrites the requester's fields only. Status and signatures stay as
//! they are; a rejected request stays Rejected until submitted again.

use shared::models::{Request, RequestFields};

use super::{ActionContext, RequestAction, normalized, validate_fields};
use crate::auth::Transition;
use crate::requests::error::WorkflowResult;

/// EditRequest action
#[derive(Debug, Clone)]
pub struct EditRequestAction {
    pub request_id: String,
    pub fields: RequestFields,
}

impl EditRequestAction {
    pub fn new(request_id: impl Into<String>, fields: RequestFields) -> Self {
        Self {
            request_id: request_id.into(),
            fields: normalized(&fields),
        }
    }
}

impl RequestAction for EditRequestAction {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn transition(&self) -> Transition {
        Transition::Edit
    }

    fn apply(&self, record: &mut Request, ctx: &ActionContext<'_>) -> WorkflowResult<()> {
        validate_fields(&self.fields)?;

        if self.fields.project_owner != record.fields.project_owner {
            ctx.ensure_eligible_owner(&self.fields.project_owner)?;
            // a stage-1 signature always belongs to the current project owner
            record.stage1 = None;
        }

        record.fields = self.fields.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::actions::test_support::{actor, at, context, identity, record};
    use shared::models::{RequestStatus, Signature};
    use tempfile::TempDir;

    #[test]
    fn test_edit_rejected_stays_rejected() {
        let dir = TempDir::new().unwrap();
        let identity = identity(&dir);
        let eve = actor("Eve");
        let now = at(2, 8);
        let ctx = context(&eve, &identity, now);

        let mut r = record();
        r.status = RequestStatus::Rejected;
        r.rejection_reason = Some("missing receipt".into());
        r.stage2 = Some(Signature {
            approver: "Fin".into(),
            at: now,
        });

        let mut fields = r.fields.clone();
        fields.description = "Booth rental + receipt".into();
        EditRequestAction::new(r.id.clone(), fields).apply(&mut r, &ctx).unwrap();

        assert_eq!(r.status, RequestStatus::Rejected);
        assert_eq!(r.fields.description, "Booth rental + receipt");
        assert_eq!(r.rejection_reason.as_deref(), Some("missing receipt"));
        assert!(r.stage2.is_some());
    }

    #[test]
    fn test_owner_change_drops_stage1_signature() {
        let dir = TempDir::new().unwrap();
        let identity = identity(&dir);
        let eve = actor("Eve");
        let now = at(2, 8);
        let ctx = context(&eve, &identity, now);

        let mut r = record();
        r.status = RequestStatus::Rejected;
        r.stage1 = Some(Signature {
            approver: "Bob".into(),
            at: now,
        });

        let mut fields = r.fields.clone();
        fields.project_owner = "Fin".into();
        EditRequestAction::new(r.id.clone(), fields).apply(&mut r, &ctx).unwrap();

        assert_eq!(r.fields.project_owner, "Fin");
        assert!(r.stage1.is_none());
    }
}
