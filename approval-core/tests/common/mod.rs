//! 集成测试共用的桌面装配

#![allow(dead_code)]

use std::sync::Arc;

use approval_core::utils::FixedClock;
use approval_core::{Config, DeskState, Session};
use chrono::{NaiveDate, NaiveDateTime};
use shared::models::{PaymentMethod, RequestFields};
use tempfile::TempDir;

/// 2026-01-`day` at `hour`:00
pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
}

pub fn config(dir: &TempDir) -> Config {
    let mut config = Config::with_work_dir(dir.path().to_string_lossy());
    config.admins = vec!["Amy".into()];
    config.finance_lead = Some("Fin".into());
    config
}

pub struct Desk {
    pub clock: Arc<FixedClock>,
    pub state: DeskState,
}

impl Desk {
    /// Open over an existing directory without seeding
    pub fn open(config: Config) -> Self {
        let clock = Arc::new(FixedClock::new(at(1, 9)));
        let state = DeskState::open_with_clock(config, clock.clone()).unwrap();
        Self { clock, state }
    }

    /// Amy (admin), Fin (finance lead), Eve, Bob
    pub fn seeded(dir: &TempDir) -> Self {
        let desk = Self::open(config(dir));
        desk.state.identity.seed_from_config().unwrap();
        let amy = desk.login("Amy");
        for name in ["Eve", "Bob"] {
            desk.state.identity.create_staff(&amy, name).unwrap();
        }
        desk
    }

    pub fn login(&self, name: &str) -> Session {
        self.state.identity.authenticate(name, "0000").unwrap()
    }
}

pub fn fields(owner: &str) -> RequestFields {
    RequestFields {
        project_owner: owner.into(),
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
