//! Reject at stage 1 or stage 2
//!
//! The rejecting signer is recorded on the stage they rejected at.

use shared::models::{Request, RequestStatus, Signature};

use super::{ActionContext, RequestAction, Stage, required_reason};
use crate::auth::Transition;
use crate::requests::error::{InputError, WorkflowResult};

/// Reject action
#[derive(Debug, Clone)]
pub struct RejectAction {
    pub request_id: String,
    pub stage: Stage,
    pub reason: String,
}

impl RejectAction {
    pub fn new(request_id: impl Into<String>, stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            stage,
            reason: reason.into(),
        }
    }
}

impl RequestAction for RejectAction {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn transition(&self) -> Transition {
        match self.stage {
            Stage::One => Transition::RejectStage1,
            Stage::Two => Transition::RejectStage2,
        }
    }

    fn apply(&self, record: &mut Request, ctx: &ActionContext<'_>) -> WorkflowResult<()> {
        let reason = required_reason(&self.reason, InputError::RejectionReasonRequired)?;
        let signature = Some(Signature {
            approver: ctx.actor.name.clone(),
            at: ctx.now,
        });
        match self.stage {
            Stage::One => record.stage1 = signature,
            Stage::Two => record.stage2 = signature,
        }
        record.rejection_reason = Some(reason);
        record.status = RequestStatus::Rejected;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::actions::test_support::{actor, at, context, identity, record};
    use crate::requests::error::WorkflowError;
    use tempfile::TempDir;

    #[test]
    fn test_reject_at_stage2_keeps_stage1() {
        let dir = TempDir::new().unwrap();
        let identity = identity(&dir);
        let fin = actor("Fin");

        let mut r = record();
        r.status = RequestStatus::AwaitingStage2;
        r.stage1 = Some(Signature {
            approver: "Bob".into(),
            at: at(2, 9),
        });

        RejectAction::new(&r.id, Stage::Two, "missing receipt")
            .apply(&mut r, &context(&fin, &identity, at(3, 11)))
            .unwrap();

        assert_eq!(r.status, RequestStatus::Rejected);
        assert_eq!(r.rejection_reason.as_deref(), Some("missing receipt"));
        assert_eq!(
            r.stage2,
            Some(Signature {
                approver: "Fin".into(),
                at: at(3, 11)
            })
        );
        assert!(r.stage1.is_some());
    }

    #[test]
    fn test_reject_at_stage1_records_owner() {
        let dir = TempDir::new().unwrap();
        let identity = identity(&dir);
        let bob = actor("Bob");

        let mut r = record();
        r.status = RequestStatus::AwaitingStage1;
        RejectAction::new(&r.id, Stage::One, "wrong project")
            .apply(&mut r, &context(&bob, &identity, at(2, 9)))
            .unwrap();

        assert_eq!(r.status, RequestStatus::Rejected);
        assert_eq!(r.stage1.map(|s| s.approver), Some("Bob".to_string()));
    }

    #[test]
    fn test_blank_reason_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let identity = identity(&dir);
        let bob = actor("Bob");

        let mut r = record();
        r.status = RequestStatus::AwaitingStage1;
        let before = r.clone();
        let err = RejectAction::new(&r.id, Stage::One, "   ")
            .apply(&mut r, &context(&bob, &identity, at(2, 9)))
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::InvalidInput(InputError::RejectionReasonRequired)
        ));
        assert_eq!(r, before);
    }
}
