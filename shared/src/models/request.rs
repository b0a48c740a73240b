//! Expense / Purchase Request Model (請款單)

use super::Attachment;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Request type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RequestType {
    /// 請款
    #[default]
    Reimbursement,
    /// 採購
    Purchase,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reimbursement => "Reimbursement",
            Self::Purchase => "Purchase",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim() {
            "Reimbursement" | "請款" | "請款單" => Some(Self::Reimbursement),
            "Purchase" | "採購" | "採購單" => Some(Self::Purchase),
            _ => None,
        }
    }
}

/// Request lifecycle status
///
/// ```text
/// Draft ──submit──> AwaitingStage1 ──approve──> AwaitingStage2 ──approve──> Approved
///   │                    │                            │
///   │                    └──reject──> Rejected <──reject
///   │                                   │  (edit / submit again)
///   └──soft delete──> Deleted <─────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RequestStatus {
    /// 草稿 (also "Saved")
    #[default]
    Draft,
    /// 待初審: waiting for the project owner
    AwaitingStage1,
    /// 待複審: waiting for the finance lead
    AwaitingStage2,
    /// 已核准
    Approved,
    /// 已駁回
    Rejected,
    /// 已刪除 (soft delete, row retained)
    Deleted,
}

impl RequestStatus {
    /// Canonical storage token
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::AwaitingStage1 => "AwaitingStage1",
            Self::AwaitingStage2 => "AwaitingStage2",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Deleted => "Deleted",
        }
    }

    /// Parse a stored status, accepting legacy sheet labels
    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim() {
            "Draft" | "Saved" | "已儲存" | "草稿" => Some(Self::Draft),
            "AwaitingStage1" | "待初審" => Some(Self::AwaitingStage1),
            "AwaitingStage2" | "待複審" => Some(Self::AwaitingStage2),
            "Approved" | "已核准" => Some(Self::Approved),
            "Rejected" | "已駁回" => Some(Self::Rejected),
            "Deleted" | "已刪除" => Some(Self::Deleted),
            _ => None,
        }
    }

    /// Requester may still rewrite fields, submit or soft-delete
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Deleted)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// 現金
    Cash,
    /// 匯款
    #[default]
    Transfer,
    /// 匯款(扣手續費): the bank fee is deducted from the payout
    TransferFeeDeducted,
    /// 支票
    Cheque,
    /// 其他
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Transfer => "Transfer",
            Self::TransferFeeDeducted => "TransferFeeDeducted",
            Self::Cheque => "Cheque",
            Self::Other => "Other",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim() {
            "Cash" | "現金" => Some(Self::Cash),
            "Transfer" | "匯款" => Some(Self::Transfer),
            "TransferFeeDeducted" | "匯款(扣手續費)" | "匯款（扣手續費）" => {
                Some(Self::TransferFeeDeducted)
            }
            "Cheque" | "支票" => Some(Self::Cheque),
            "Other" | "其他" => Some(Self::Other),
            _ => None,
        }
    }

    /// Wire transfers need a remittance account
    pub fn is_transfer(&self) -> bool {
        matches!(self, Self::Transfer | Self::TransferFeeDeducted)
    }

    pub fn bears_fee(&self) -> bool {
        matches!(self, Self::TransferFeeDeducted)
    }
}

/// Payment tracking
///
/// The date lives inside `Paid`, so a paid record always has one and an
/// unpaid record never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", content = "date")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid(NaiveDate),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid(_) => "Paid",
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Unpaid => None,
            Self::Paid(date) => Some(*date),
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid(_))
    }
}

/// Approver signature (who + when) for one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub approver: String,
    pub at: NaiveDateTime,
}

/// Soft-delete audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    pub actor: String,
    pub at: NaiveDateTime,
    pub reason: String,
}

/// Fields the requester fills in (create / edit payload)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestFields {
    pub request_type: RequestType,
    /// Stage-1 approver for this request
    pub project_owner: String,
    pub project_name: String,
    pub project_code: String,
    pub description: String,
    /// Minor currency units
    pub amount: u64,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub vendor: String,
    pub remittance_account: String,
    /// Contact for the requester (email / extension)
    #[serde(default)]
    pub requester_contact: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bank_proof: Option<Attachment>,
    #[serde(default)]
    pub supporting_documents: Vec<Attachment>,
}

/// Request record (one row of the requests table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// `YYYYMMDD-NN`, assigned once
    pub id: String,
    /// Creation date (business timezone)
    pub date: NaiveDate,
    pub requester: String,
    #[serde(flatten)]
    pub fields: RequestFields,
    pub status: RequestStatus,
    pub submitted_at: Option<NaiveDateTime>,
    pub stage1: Option<Signature>,
    pub stage2: Option<Signature>,
    pub rejection_reason: Option<String>,
    pub deletion: Option<Deletion>,
    pub payment: PaymentStatus,
}

impl Request {
    /// New draft
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        requester: impl Into<String>,
        fields: RequestFields,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            requester: requester.into(),
            fields,
            status: RequestStatus::Draft,
            submitted_at: None,
            stage1: None,
            stage2: None,
            rejection_reason: None,
            deletion: None,
            payment: PaymentStatus::Unpaid,
        }
    }

    pub fn is_requester(&self, name: &str) -> bool {
        self.requester == name
    }

    pub fn is_project_owner(&self, name: &str) -> bool {
        self.fields.project_owner == name
    }

    /// Amount actually paid out, after the transfer fee if the method bears one
    pub fn net_payable(&self, transfer_fee: u64) -> u64 {
        if self.fields.payment_method.bears_fee() {
            self.fields.amount.saturating_sub(transfer_fee)
        } else {
            self.fields.amount
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(method: PaymentMethod, amount: u64) -> Request {
        let fields = RequestFields {
            amount,
            payment_method: method,
            ..Default::default()
        };
        Request::new(
            "20260101-01",
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            "Eve",
            fields,
        )
    }

    #[test]
    fn test_status_legacy_labels() {
        assert_eq!(RequestStatus::parse_label("Saved"), Some(RequestStatus::Draft));
        assert_eq!(RequestStatus::parse_label("已儲存"), Some(RequestStatus::Draft));
        assert_eq!(
            RequestStatus::parse_label("待初審"),
            Some(RequestStatus::AwaitingStage1)
        );
        assert_eq!(
            RequestStatus::parse_label("待複審"),
            Some(RequestStatus::AwaitingStage2)
        );
        assert_eq!(RequestStatus::parse_label("已駁回"), Some(RequestStatus::Rejected));
        assert_eq!(RequestStatus::parse_label("pending"), None);
    }

    #[test]
    fn test_status_round_trips_canonical_token() {
        for status in [
            RequestStatus::Draft,
            RequestStatus::AwaitingStage1,
            RequestStatus::AwaitingStage2,
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Deleted,
        ] {
            assert_eq!(RequestStatus::parse_label(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_editable_states() {
        assert!(RequestStatus::Draft.is_editable());
        assert!(RequestStatus::Rejected.is_editable());
        assert!(!RequestStatus::AwaitingStage1.is_editable());
        assert!(!RequestStatus::AwaitingStage2.is_editable());
        assert!(!RequestStatus::Approved.is_editable());
        assert!(!RequestStatus::Deleted.is_editable());
    }

    #[test]
    fn test_net_payable() {
        assert_eq!(sample(PaymentMethod::Transfer, 5000).net_payable(30), 5000);
        assert_eq!(
            sample(PaymentMethod::TransferFeeDeducted, 5000).net_payable(30),
            4970
        );
        // fee larger than amount never underflows
        assert_eq!(sample(PaymentMethod::TransferFeeDeducted, 10).net_payable(30), 0);
    }

    #[test]
    fn test_payment_status_date() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert_eq!(PaymentStatus::Paid(date).date(), Some(date));
        assert_eq!(PaymentStatus::Unpaid.date(), None);
        assert!(!PaymentStatus::Unpaid.is_paid());
    }

    #[test]
    fn test_request_json_flattens_fields() {
        let json = serde_json::to_value(sample(PaymentMethod::Cash, 100)).unwrap();
        assert_eq!(json["amount"], 100);
        assert_eq!(json["payment_method"], "Cash");
        assert_eq!(json["status"], "Draft");
    }
}
