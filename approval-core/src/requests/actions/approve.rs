//! Approve at stage 1 (project owner) or stage 2 (finance lead)

use shared::models::{Request, RequestStatus, Signature};

use super::{ActionContext, RequestAction, Stage};
use crate::auth::Transition;
use crate::requests::error::WorkflowResult;

/// Approve action
#[derive(Debug, Clone)]
pub struct ApproveAction {
    pub request_id: String,
    pub stage: Stage,
}

impl ApproveAction {
    pub fn new(request_id: impl Into<String>, stage: Stage) -> Self {
        Self {
            request_id: request_id.into(),
            stage,
        }
    }
}

impl RequestAction for ApproveAction {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn transition(&self) -> Transition {
        match self.stage {
            Stage::One => Transition::ApproveStage1,
            Stage::Two => Transition::ApproveStage2,
        }
    }

    fn apply(&self, record: &mut Request, ctx: &ActionContext<'_>) -> WorkflowResult<()> {
        let signature = Some(Signature {
            approver: ctx.actor.name.clone(),
            at: ctx.now,
        });
        match self.stage {
            Stage::One => {
                record.stage1 = signature;
                record.status = RequestStatus::AwaitingStage2;
            }
            Stage::Two => {
                record.stage2 = signature;
                record.status = RequestStatus::Approved;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::actions::test_support::{actor, at, context, identity, record};
    use tempfile::TempDir;

    #[test]
    fn test_two_stage_approval() {
        let dir = TempDir::new().unwrap();
        let identity = identity(&dir);
        let mut r = record();
        r.status = RequestStatus::AwaitingStage1;

        let bob = actor("Bob");
        ApproveAction::new(&r.id, Stage::One)
            .apply(&mut r, &context(&bob, &identity, at(2, 9)))
            .unwrap();
        assert_eq!(r.status, RequestStatus::AwaitingStage2);
        assert_eq!(r.stage1.as_ref().map(|s| s.approver.as_str()), Some("Bob"));
        assert_eq!(r.stage1.as_ref().map(|s| s.at), Some(at(2, 9)));

        let fin = actor("Fin");
        ApproveAction::new(&r.id, Stage::Two)
            .apply(&mut r, &context(&fin, &identity, at(3, 9)))
            .unwrap();
        assert_eq!(r.status, RequestStatus::Approved);
        assert_eq!(r.stage2.as_ref().map(|s| s.approver.as_str()), Some("Fin"));
        // stage 1 signature untouched
        assert_eq!(r.stage1.as_ref().map(|s| s.at), Some(at(2, 9)));
    }

    #[test]
    fn test_transition_per_stage() {
        assert_eq!(ApproveAction::new("x", Stage::One).transition(), Transition::ApproveStage1);
        assert_eq!(ApproveAction::new("x", Stage::Two).transition(), Transition::ApproveStage2);
    }
}
