use super::*;
use crate::auth::{Denial, Transition};
use crate::core::DeskState;
use crate::requests::error::InputError;
use crate::utils::FixedClock;
use shared::error::{AppError, ErrorCode};
use shared::models::{EmploymentStatus, PaymentMethod, PaymentStatus, RequestStatus};
use tempfile::TempDir;


/// 2026-01-`day` at `hour`:00
fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
}

/// Desk over a temp dir: Amy (admin), Fin (finance lead), Eve, Bob, Ken
struct Desk {
    _dir: TempDir,
    clock: Arc<FixedClock>,
    state: DeskState,
}

impl Desk {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = Config::with_work_dir(dir.path().to_string_lossy());
        config.admins = vec!["Amy".into()];
        config.finance_lead = Some("Fin".into());

        let clock = Arc::new(FixedClock::new(at(1, 9)));
        let state = DeskState::open_with_clock(config, clock.clone()).unwrap();
        state.identity.seed_from_config().unwrap();

        let desk = Self {
            _dir: dir,
            clock,
            state,
        };
        let amy = desk.login("Amy");
        for name in ["Eve", "Bob", "Ken"] {
            desk.state.identity.create_staff(&amy, name).unwrap();
        }
        desk
    }

    fn login(&self, name: &str) -> Session {
        self.state.identity.authenticate(name, "0000").unwrap()
    }

    fn manager(&self) -> &RequestsManager {
        &self.state.requests
    }

    fn terminate(&self, name: &str) {
        let amy = self.login("Amy");
        self.state
            .identity
            .set_status(&amy, name, EmploymentStatus::Terminated)
            .unwrap();
    }

    /// Stored copy of one row, bypassing visibility
    fn stored(&self, id: &str) -> Request {
        self.manager()
            .table()
            .load_all()
            .unwrap()
            .into_iter()
            .find(|r| r.id == id)
            .unwrap()
    }

    /// Eve's draft with Bob as project owner
    fn draft(&self) -> Request {
        self.manager().create(&self.login("Eve"), fields()).unwrap()
    }

    /// Eve's request, submitted
    fn submitted(&self) -> Request {
        let draft = self.draft();
        self.manager().submit(&self.login("Eve"), &draft.id).unwrap()
    }

    /// Through both stages
    fn approved(&self) -> Request {
        let r = self.submitted();
        self.manager().approve_stage1(&self.login("Bob"), &r.id).unwrap();
        self.manager().approve_stage2(&self.login("Fin"), &r.id).unwrap()
    }
}

fn fields() -> RequestFields {
    RequestFields {
        project_owner: "Bob".into(),
        project_name: "Trade fair".into(),
        project_code: "TF-26".into(),
        description: "Booth rental".into(),
        amount: 5000,
        currency: "TWD".into(),
        payment_method: PaymentMethod::Transfer,
        vendor: "Expo Hall".into(),
        remittance_account: "812-0001".into(),
        ..Default::default()
    }
}

fn assert_denied(result: WorkflowResult<Request>, expected: Denial) {
    match result {
        Err(WorkflowError::Forbidden(denial)) => assert_eq!(denial, expected),
        other => panic!("expected Forbidden({expected:?}), got {other:?}"),
    }
}
