//! Authorization Policy
//!
//! Pure decision functions over (actor, record, transition). No I/O.
//!
//! ## 规则
//! - 管理员可以查看所有单据，但不因管理员身份取得签核权；
//!   只有单据上指名的专案执行人 (初审) 与财务主管 (复审) 可以签核
//! - 编辑 / 送出 / 删除：仅申请人本人，且单据为草稿或已驳回
//! - 付款状态：仅管理员，且单据已核准
//! - 离职人员不能执行任何转换
//!
//! Authority is bound to the names written on the record, compared exactly.

use shared::models::{Request, RequestStatus};

use super::session::Actor;

/// A requested state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Edit,
    Submit,
    ApproveStage1,
    RejectStage1,
    ApproveStage2,
    RejectStage2,
    SoftDelete,
    SetPaymentStatus,
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Submit => "submit",
            Self::ApproveStage1 => "approve_stage1",
            Self::RejectStage1 => "reject_stage1",
            Self::ApproveStage2 => "approve_stage2",
            Self::RejectStage2 => "reject_stage2",
            Self::SoftDelete => "soft_delete",
            Self::SetPaymentStatus => "set_payment_status",
        }
    }

    /// Statuses this transition may start from
    pub fn allowed_from(&self) -> &'static [RequestStatus] {
        match self {
            Self::Edit | Self::Submit | Self::SoftDelete => {
                &[RequestStatus::Draft, RequestStatus::Rejected]
            }
            Self::ApproveStage1 | Self::RejectStage1 => &[RequestStatus::AwaitingStage1],
            Self::ApproveStage2 | Self::RejectStage2 => &[RequestStatus::AwaitingStage2],
            Self::SetPaymentStatus => &[RequestStatus::Approved],
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a transition was denied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// Record is in a state the transition cannot start from
    WrongStatus {
        transition: Transition,
        status: RequestStatus,
    },
    NotRequester,
    NotProjectOwner,
    NotFinanceLead,
    NotAdmin,
    /// Actor's account is terminated
    Inactive,
    /// Session name no longer maps to a staff account
    UnknownActor,
    /// Actor may not read this record
    NotVisible,
}

impl std::fmt::Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongStatus { transition, status } => {
                write!(f, "cannot {transition} a request in status {status}")
            }
            Self::NotRequester => f.write_str("only the requester may do this"),
            Self::NotProjectOwner => {
                f.write_str("only the designated project owner may sign stage 1")
            }
            Self::NotFinanceLead => f.write_str("only the finance lead may sign stage 2"),
            Self::NotAdmin => f.write_str("administrator required"),
            Self::Inactive => f.write_str("account is not active"),
            Self::UnknownActor => f.write_str("session does not match any staff account"),
            Self::NotVisible => f.write_str("not allowed to view this request"),
        }
    }
}

/// Decide a transition, explaining a denial.
///
/// Checked in order: record status, named role on the record, actor active.
pub fn check(actor: &Actor, record: &Request, transition: Transition) -> Result<(), Denial> {
    if !transition.allowed_from().contains(&record.status) {
        return Err(Denial::WrongStatus {
            transition,
            status: record.status,
        });
    }

    let holds_role = match transition {
        Transition::Edit | Transition::Submit | Transition::SoftDelete => {
            record.is_requester(&actor.name).then_some(()).ok_or(Denial::NotRequester)
        }
        Transition::ApproveStage1 | Transition::RejectStage1 => record
            .is_project_owner(&actor.name)
            .then_some(())
            .ok_or(Denial::NotProjectOwner),
        Transition::ApproveStage2 | Transition::RejectStage2 => {
            actor.is_finance_lead.then_some(()).ok_or(Denial::NotFinanceLead)
        }
        Transition::SetPaymentStatus => actor.is_admin.then_some(()).ok_or(Denial::NotAdmin),
    };
    holds_role?;

    if !actor.is_active() {
        return Err(Denial::Inactive);
    }
    Ok(())
}

/// `canTransition(actor, record, transition)`
pub fn can_transition(actor: &Actor, record: &Request, transition: Transition) -> bool {
    check(actor, record, transition).is_ok()
}

/// Read access: admin, requester, designated project owner, finance lead
pub fn can_view(actor: &Actor, record: &Request) -> bool {
    actor.is_active()
        && (actor.is_admin
            || actor.is_finance_lead
            || record.is_requester(&actor.name)
            || record.is_project_owner(&actor.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::{EmploymentStatus, RequestFields};

    const ALL_STATUSES: [RequestStatus; 6] = [
        RequestStatus::Draft,
        RequestStatus::AwaitingStage1,
        RequestStatus::AwaitingStage2,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Deleted,
    ];

    fn actor(name: &str) -> Actor {
        Actor {
            name: name.to_string(),
            status: EmploymentStatus::Active,
            is_admin: false,
            is_finance_lead: false,
        }
    }

    fn admin(name: &str) -> Actor {
        Actor {
            is_admin: true,
            ..actor(name)
        }
    }

    fn finance(name: &str) -> Actor {
        Actor {
            is_finance_lead: true,
            ..actor(name)
        }
    }

    fn record(status: RequestStatus) -> Request {
        let mut r = Request::new(
            "20260101-01",
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            "Eve",
            RequestFields {
                project_owner: "Bob".into(),
                amount: 5000,
                ..Default::default()
            },
        );
        r.status = status;
        r
    }

    #[test]
    fn test_stage1_iff_owner_awaiting_and_active() {
        let people = [
            actor("Bob"),
            actor("Eve"),
            actor("Bo"),
            admin("Amy"),
            finance("Fin"),
            Actor {
                status: EmploymentStatus::Terminated,
                ..actor("Bob")
            },
        ];
        for status in ALL_STATUSES {
            let r = record(status);
            for a in &people {
                let expected = a.name == r.fields.project_owner
                    && status == RequestStatus::AwaitingStage1
                    && a.is_active();
                assert_eq!(
                    can_transition(a, &r, Transition::ApproveStage1),
                    expected,
                    "{} on {status}",
                    a.name
                );
                assert_eq!(can_transition(a, &r, Transition::RejectStage1), expected);
            }
        }
    }

    #[test]
    fn test_substring_names_never_match() {
        let mut r = record(RequestStatus::AwaitingStage1);
        r.fields.project_owner = "Bob Lin".into();
        assert!(!can_transition(&actor("Bob"), &r, Transition::ApproveStage1));
        assert!(can_transition(&actor("Bob Lin"), &r, Transition::ApproveStage1));
    }

    #[test]
    fn test_admin_cannot_sign() {
        let amy = admin("Amy");
        assert_eq!(
            check(&amy, &record(RequestStatus::AwaitingStage1), Transition::ApproveStage1),
            Err(Denial::NotProjectOwner)
        );
        assert_eq!(
            check(&amy, &record(RequestStatus::AwaitingStage2), Transition::ApproveStage2),
            Err(Denial::NotFinanceLead)
        );
        // but an admin who is also the named owner signs as owner
        assert!(can_transition(
            &admin("Bob"),
            &record(RequestStatus::AwaitingStage1),
            Transition::ApproveStage1
        ));
    }

    #[test]
    fn test_finance_lead_stage2_only() {
        let fin = finance("Fin");
        let stage1 = record(RequestStatus::AwaitingStage1);
        let stage2 = record(RequestStatus::AwaitingStage2);
        assert!(can_transition(&fin, &stage2, Transition::ApproveStage2));
        assert!(can_transition(&fin, &stage2, Transition::RejectStage2));
        assert!(!can_transition(&fin, &stage1, Transition::ApproveStage2));
        assert!(!can_transition(&fin, &stage1, Transition::ApproveStage1));
    }

    #[test]
    fn test_requester_transitions() {
        for status in ALL_STATUSES {
            let r = record(status);
            let editable = matches!(status, RequestStatus::Draft | RequestStatus::Rejected);
            for t in [Transition::Edit, Transition::Submit, Transition::SoftDelete] {
                assert_eq!(can_transition(&actor("Eve"), &r, t), editable, "{t} on {status}");
                assert!(!can_transition(&actor("Bob"), &r, t));
                assert!(!can_transition(&admin("Amy"), &r, t));
            }
        }
    }

    #[test]
    fn test_in_flight_never_deletable_even_by_admin() {
        for status in [
            RequestStatus::AwaitingStage1,
            RequestStatus::AwaitingStage2,
            RequestStatus::Approved,
        ] {
            for a in [actor("Eve"), admin("Eve"), admin("Amy"), finance("Fin")] {
                assert!(matches!(
                    check(&a, &record(status), Transition::SoftDelete),
                    Err(Denial::WrongStatus { .. })
                ));
            }
        }
    }

    #[test]
    fn test_terminated_requester_cannot_submit() {
        let eve = Actor {
            status: EmploymentStatus::Terminated,
            ..actor("Eve")
        };
        assert_eq!(
            check(&eve, &record(RequestStatus::Draft), Transition::Submit),
            Err(Denial::Inactive)
        );
    }

    #[test]
    fn test_payment_admin_on_approved_only() {
        let approved = record(RequestStatus::Approved);
        let pay = Transition::SetPaymentStatus;
        assert!(can_transition(&admin("Amy"), &approved, pay));
        assert!(!can_transition(&admin("Amy"), &record(RequestStatus::AwaitingStage2), pay));
        assert!(!can_transition(&finance("Fin"), &approved, pay));
    }

    #[test]
    fn test_visibility() {
        let r = record(RequestStatus::AwaitingStage1);
        assert!(can_view(&actor("Eve"), &r));
        assert!(can_view(&actor("Bob"), &r));
        assert!(can_view(&admin("Amy"), &r));
        assert!(can_view(&finance("Fin"), &r));
        assert!(!can_view(&actor("Mallory"), &r));
    }
}
