//! Staff Model (人員清單)

use super::Attachment;
use serde::{Deserialize, Serialize};

/// Employment status
///
/// Staff accounts are never deleted; leaving the company flips the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EmploymentStatus {
    /// 在職
    #[default]
    Active,
    /// 離職
    Terminated,
}

impl EmploymentStatus {
    /// Canonical storage token
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Terminated => "Terminated",
        }
    }

    /// Parse a stored value, accepting legacy sheet labels.
    ///
    /// An empty cell means Active (the old sheet filled gaps with 在職).
    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "Active" | "active" | "在職" => Some(Self::Active),
            "Terminated" | "terminated" | "離職" => Some(Self::Terminated),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Staff account (one row of the staff table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAccount {
    /// Unique, immutable display name (e.g. "Wish 宋威績")
    pub name: String,
    pub status: EmploymentStatus,
    /// argon2 PHC string; empty means "default credential applies"
    #[serde(skip_serializing, default)]
    pub credential: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avatar: Option<Attachment>,
}

impl StaffAccount {
    /// New active account with no credential set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: EmploymentStatus::Active,
            credential: String::new(),
            avatar: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn has_credential(&self) -> bool {
        !self.credential.is_empty()
    }
}
