//! Identity Store - staff accounts (人員清單)
//!
//! Accounts are created by an administrator and never removed; leaving the
//! company flips the status to Terminated. A blank credential means the
//! configured default credential is accepted until the owner sets one.

mod error;

pub use error::IdentityError;

use std::sync::Arc;

use shared::models::{Attachment, EmploymentStatus, StaffAccount};

use crate::auth::credential::{CredentialCheck, hash_credential, verify_credential};
use crate::auth::{Actor, Session};
use crate::core::Config;
use crate::store::Table;
use crate::utils::Clock;
use crate::utils::validation::{
    MAX_CREDENTIAL_LEN, MAX_NAME_LEN, validate_required_text,
};

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Staff accounts + authentication
pub struct IdentityStore {
    config: Arc<Config>,
    table: Table<StaffAccount>,
    clock: Arc<dyn Clock>,
}

impl IdentityStore {
    pub fn new(config: Arc<Config>, table: Table<StaffAccount>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            table,
            clock,
        }
    }

    /// Make sure every configured admin and the finance lead has an account.
    ///
    /// Existing rows are left untouched. Returns how many were added.
    pub fn seed_from_config(&self) -> IdentityResult<usize> {
        let wanted: Vec<String> = self
            .config
            .admins
            .iter()
            .chain(self.config.finance_lead.iter())
            .cloned()
            .collect();

        let added = self.table.update(|rows| -> IdentityResult<usize> {
            let mut added = 0;
            for name in wanted {
                if !rows.iter().any(|s| s.name == name) {
                    rows.push(StaffAccount::new(name));
                    added += 1;
                }
            }
            Ok(added)
        })?;

        if added > 0 {
            tracing::info!(added, "Seeded staff accounts from config");
        }
        Ok(added)
    }

    // ==================== Authentication ====================

    /// Log in. Only Active staff may authenticate.
    pub fn authenticate(&self, name: &str, credential: &str) -> IdentityResult<Session> {
        let name = name.trim();
        let Some(account) = self.find(name)? else {
            crate::security_log!("WARN", "login_failed", name = name, reason = "unknown_name");
            return Err(IdentityError::InvalidCredentials);
        };

        // account status is only reported once the credential matches
        let check = verify_credential(
            &account.credential,
            credential,
            &self.config.default_credential,
        );
        if check == CredentialCheck::Invalid {
            crate::security_log!("WARN", "login_failed", name = name, reason = "bad_credential");
            return Err(IdentityError::InvalidCredentials);
        }

        if !account.is_active() {
            crate::security_log!("WARN", "login_failed", name = name, reason = "terminated");
            return Err(IdentityError::AccountDisabled(account.name));
        }

        if check == CredentialCheck::ValidLegacy {
            self.upgrade_legacy_credential(&account.name, credential);
        }

        crate::security_log!("INFO", "login_success", name = name);
        Ok(Session::new(account.name, self.clock.now()))
    }

    /// Re-store a plaintext credential as argon2. Failure only costs the upgrade.
    fn upgrade_legacy_credential(&self, name: &str, credential: &str) {
        let hash = match hash_credential(credential) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(name, error = %e, "Legacy credential upgrade skipped");
                return;
            }
        };
        let result = self.table.update(|rows| -> IdentityResult<()> {
            if let Some(account) = rows.iter_mut().find(|s| s.name == name)
                && account.credential == credential
            {
                account.credential = hash;
            }
            Ok(())
        });
        match result {
            Ok(()) => tracing::info!(name, "Legacy plaintext credential upgraded to argon2"),
            Err(e) => tracing::warn!(name, error = %e, "Legacy credential upgrade not persisted"),
        }
    }

    /// Resolve role facts for this call
    pub fn resolve(&self, session: &Session) -> IdentityResult<Actor> {
        let account = self
            .find(session.name())?
            .ok_or_else(|| IdentityError::NotFound(session.name().to_string()))?;
        Ok(self.actor_for(&account))
    }

    pub(crate) fn actor_for(&self, account: &StaffAccount) -> Actor {
        Actor {
            is_admin: self.config.is_admin(&account.name),
            is_finance_lead: self.config.is_finance_lead(&account.name),
            name: account.name.clone(),
            status: account.status,
        }
    }

    fn require_admin(&self, session: &Session) -> IdentityResult<Actor> {
        let actor = self.resolve(session)?;
        if !actor.is_admin || !actor.is_active() {
            crate::security_log!("WARN", "admin_required", name = actor.name.as_str());
            return Err(IdentityError::AdminRequired(actor.name));
        }
        Ok(actor)
    }

    // ==================== Administration ====================

    /// Create an Active account with no credential (admin only)
    pub fn create_staff(&self, session: &Session, name: &str) -> IdentityResult<StaffAccount> {
        let admin = self.require_admin(session)?;
        let name = name.trim();
        validate_required_text(name, "name", MAX_NAME_LEN)?;

        let account = self.table.update(|rows| {
            if rows.iter().any(|s| s.name == name) {
                return Err(IdentityError::AlreadyExists(name.to_string()));
            }
            let account = StaffAccount::new(name);
            rows.push(account.clone());
            Ok(account)
        })?;

        tracing::info!(name, by = %admin.name, "Staff account created");
        Ok(account)
    }

    /// Flip employment status (admin only). Accounts are never removed.
    pub fn set_status(
        &self,
        session: &Session,
        name: &str,
        status: EmploymentStatus,
    ) -> IdentityResult<()> {
        let admin = self.require_admin(session)?;
        self.modify(name, |account| {
            account.status = status;
            Ok(())
        })?;
        crate::security_log!(
            "INFO",
            "status_changed",
            name = name,
            status = status.as_str(),
            by = admin.name.as_str()
        );
        Ok(())
    }

    /// Clear a credential so the default applies again (admin only)
    pub fn reset_credential(&self, session: &Session, name: &str) -> IdentityResult<()> {
        let admin = self.require_admin(session)?;
        self.modify(name, |account| {
            account.credential.clear();
            Ok(())
        })?;
        crate::security_log!("INFO", "credential_reset", name = name, by = admin.name.as_str());
        Ok(())
    }

    // ==================== Self-service ====================

    /// Change one's own credential after re-checking the current one
    pub fn change_credential(
        &self,
        session: &Session,
        current: &str,
        new: &str,
    ) -> IdentityResult<()> {
        validate_required_text(new, "new credential", MAX_CREDENTIAL_LEN)?;
        let actor = self.resolve(session)?;
        if !actor.is_active() {
            return Err(IdentityError::AccountDisabled(actor.name));
        }

        let hash = hash_credential(new).map_err(|e| IdentityError::Hashing(e.to_string()))?;
        let default_credential = self.config.default_credential.clone();
        self.modify(&actor.name, |account| {
            if !verify_credential(&account.credential, current, &default_credential).is_valid() {
                return Err(IdentityError::InvalidCredentials);
            }
            account.credential = hash;
            Ok(())
        })
        .inspect_err(|e| {
            if matches!(e, IdentityError::InvalidCredentials) {
                crate::security_log!(
                    "WARN",
                    "credential_change_failed",
                    name = actor.name.as_str()
                );
            }
        })?;

        crate::security_log!("INFO", "credential_changed", name = actor.name.as_str());
        Ok(())
    }

    /// Set or clear an avatar (self, or admin for anyone)
    pub fn set_avatar(
        &self,
        session: &Session,
        name: &str,
        avatar: Option<Attachment>,
    ) -> IdentityResult<()> {
        let actor = self.resolve(session)?;
        let allowed = actor.is_active() && (actor.name == name || actor.is_admin);
        if !allowed {
            return Err(IdentityError::Forbidden(format!(
                "{} may not change the avatar of {name}",
                actor.name
            )));
        }
        self.modify(name, |account| {
            account.avatar = avatar;
            Ok(())
        })?;
        tracing::info!(name, by = %actor.name, "Avatar updated");
        Ok(())
    }

    // ==================== Queries ====================

    /// Exact-name lookup
    pub fn find(&self, name: &str) -> IdentityResult<Option<StaffAccount>> {
        Ok(self.table.load_all()?.into_iter().find(|s| s.name == name))
    }

    pub fn all_staff(&self) -> IdentityResult<Vec<StaffAccount>> {
        Ok(self.table.load_all()?)
    }

    pub fn active_staff(&self) -> IdentityResult<Vec<StaffAccount>> {
        Ok(self
            .table
            .load_all()?
            .into_iter()
            .filter(StaffAccount::is_active)
            .collect())
    }

    /// Active staff who may be named project owner on a new request
    pub fn eligible_project_owners(&self) -> IdentityResult<Vec<StaffAccount>> {
        Ok(self
            .active_staff()?
            .into_iter()
            .filter(|s| self.owner_allowed_by_config(&s.name))
            .collect())
    }

    /// Exact check of one name against the current staff table
    pub fn is_eligible_project_owner(&self, name: &str) -> IdentityResult<bool> {
        Ok(self
            .find(name)?
            .is_some_and(|s| s.is_active() && self.owner_allowed_by_config(&s.name)))
    }

    fn owner_allowed_by_config(&self, name: &str) -> bool {
        self.config.project_owners.is_empty()
            || self.config.project_owners.iter().any(|owner| owner == name)
    }

    fn modify(
        &self,
        name: &str,
        apply: impl FnOnce(&mut StaffAccount) -> IdentityResult<()>,
    ) -> IdentityResult<()> {
        self.table.update(|rows| {
            let account = rows
                .iter_mut()
                .find(|s| s.name == name)
                .ok_or_else(|| IdentityError::NotFound(name.to_string()))?;
            apply(account)
        })
    }
}
