//! DeskState - 装配好的引擎
//!
//! Opens both tables of one work directory and wires the Identity Store into
//! the Workflow Engine. Cheap to clone; every part is behind an `Arc`.

use std::fs;
use std::sync::Arc;

use parking_lot::Mutex;

use super::Config;
use crate::identity::IdentityStore;
use crate::requests::RequestsManager;
use crate::store::{StoreError, Table, TableOptions};
use crate::utils::{Clock, SystemClock};

#[derive(Clone)]
pub struct DeskState {
    pub config: Arc<Config>,
    pub identity: Arc<IdentityStore>,
    pub requests: Arc<RequestsManager>,
}

impl std::fmt::Debug for DeskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskState")
            .field("work_dir", &self.config.work_dir)
            .field("identity", &"<IdentityStore>")
            .field("requests", &self.requests)
            .finish()
    }
}

impl DeskState {
    /// Open with the wall clock of the configured business timezone
    pub fn open(config: Config) -> Result<Self, StoreError> {
        let clock = Arc::new(SystemClock::new(config.business_timezone));
        Self::open_with_clock(config, clock)
    }

    pub fn open_with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.work_dir)?;

        let config = Arc::new(config);
        let options = TableOptions::from_config(&config);

        // one writer mutex per table: a request transition reads the staff
        // table while holding the requests lock
        let staff = Table::open(config.staff_path(), options.clone(), Arc::new(Mutex::new(())));
        let requests = Table::open(config.requests_path(), options, Arc::new(Mutex::new(())));

        let identity = Arc::new(IdentityStore::new(config.clone(), staff, clock.clone()));
        let requests = Arc::new(RequestsManager::new(
            config.clone(),
            requests,
            identity.clone(),
            clock,
        ));

        tracing::info!(
            work_dir = %config.work_dir,
            timezone = %config.business_timezone,
            finance_lead = config.finance_lead.as_deref().unwrap_or("-"),
            admins = config.admins.len(),
            "Approval desk opened"
        );

        Ok(Self {
            config,
            identity,
            requests,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_work_dir() {
        let dir = TempDir::new().unwrap();
        let work_dir = dir.path().join("nested").join("desk");
        let state = DeskState::open(Config::with_work_dir(work_dir.to_string_lossy())).unwrap();

        assert!(work_dir.is_dir());
        assert_eq!(state.requests.table().path(), work_dir.join("requests.json"));
        assert!(state.identity.all_staff().unwrap().is_empty());
    }
}
