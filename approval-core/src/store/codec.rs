//! Row codecs: domain model <-> flat string row
//!
//! Column names are stable and shared with the legacy sheet export.
//! Unknown columns are ignored on read; missing columns read as empty.

use std::collections::BTreeMap;

use serde_json::Value;
use shared::models::{
    Attachment, Deletion, EmploymentStatus, PaymentMethod, PaymentStatus, Request,
    RequestFields, RequestStatus, RequestType, Signature, StaffAccount,
};

use crate::utils::time::{format_date, format_timestamp, parse_date, parse_timestamp};

/// One flat row as persisted
pub type Row = BTreeMap<String, String>;

/// Separator between supporting blobs; never produced by base64
pub const BLOB_SEPARATOR: char = '|';

/// Read access to a raw row (missing column = empty)
pub struct RowReader<'a> {
    values: &'a serde_json::Map<String, Value>,
}

impl<'a> RowReader<'a> {
    pub fn new(values: &'a serde_json::Map<String, Value>) -> Self {
        Self { values }
    }

    /// Column as trimmed text; numbers and booleans from hand-edited files
    /// are accepted as their literal text
    pub fn text(&self, column: &str) -> String {
        match self.values.get(column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(other) => other.to_string(),
        }
    }

    fn optional_text(&self, column: &str) -> Option<String> {
        Some(self.text(column)).filter(|v| !v.is_empty())
    }

    fn required_text(&self, column: &str) -> Result<String, String> {
        self.optional_text(column)
            .ok_or_else(|| format!("column '{column}' is empty"))
    }

    fn timestamp(&self, column: &str) -> Result<Option<chrono::NaiveDateTime>, String> {
        match self.optional_text(column) {
            None => Ok(None),
            Some(v) => parse_timestamp(&v)
                .map(Some)
                .ok_or_else(|| format!("column '{column}': invalid timestamp '{v}'")),
        }
    }

    fn blob(&self, column: &str) -> Result<Option<Attachment>, String> {
        match self.optional_text(column) {
            None => Ok(None),
            Some(v) => Attachment::from_base64(&v)
                .map(Some)
                .map_err(|e| format!("column '{column}': {e}")),
        }
    }

    fn blobs(&self, column: &str) -> Result<Vec<Attachment>, String> {
        self.text(column)
            .split(BLOB_SEPARATOR)
            .filter(|part| !part.trim().is_empty())
            .map(|part| {
                Attachment::from_base64(part).map_err(|e| format!("column '{column}': {e}"))
            })
            .collect()
    }
}

/// A model that can be stored as one flat row of a [`Table`](super::Table)
pub trait RowCodec: Sized {
    /// Table name (logs, error messages)
    const TABLE: &'static str;

    /// Primary key value
    fn key(&self) -> &str;

    fn to_row(&self) -> Row;

    /// Decode a row; `Err` carries a human-readable reason
    fn from_row(row: &RowReader<'_>) -> Result<Self, String>;
}

// ── Requests table ──────────────────────────────────────────────────

mod col {
    pub const ID: &str = "id";
    pub const DATE: &str = "date";
    pub const TYPE: &str = "type";
    pub const REQUESTER: &str = "requester";
    pub const PROJECT_OWNER: &str = "projectOwner";
    pub const PROJECT_NAME: &str = "projectName";
    pub const PROJECT_CODE: &str = "projectCode";
    pub const DESCRIPTION: &str = "description";
    pub const AMOUNT: &str = "amount";
    pub const CURRENCY: &str = "currency";
    pub const PAYMENT_METHOD: &str = "paymentMethod";
    pub const VENDOR: &str = "vendor";
    pub const REMITTANCE_ACCOUNT: &str = "remittanceAccount";
    pub const BANK_PROOF_BLOB: &str = "bankProofBlob";
    pub const STATUS: &str = "status";
    pub const SUPPORTING_BLOBS: &str = "supportingBlobs";
    pub const SUBMITTED_AT: &str = "submittedAt";
    pub const REQUESTER_CONTACT: &str = "requesterContact";
    pub const STAGE1_APPROVER: &str = "stage1Approver";
    pub const STAGE1_AT: &str = "stage1At";
    pub const STAGE2_APPROVER: &str = "stage2Approver";
    pub const STAGE2_AT: &str = "stage2At";
    pub const DELETION_ACTOR: &str = "deletionActor";
    pub const DELETION_AT: &str = "deletionAt";
    pub const DELETION_REASON: &str = "deletionReason";
    pub const REJECTION_REASON: &str = "rejectionReason";
    pub const PAYMENT_STATUS: &str = "paymentStatus";
    pub const PAYMENT_DATE: &str = "paymentDate";

    pub const NAME: &str = "name";
    pub const EMPLOYMENT_STATUS: &str = "employmentStatus";
    pub const CREDENTIAL: &str = "credential";
    pub const AVATAR_BLOB: &str = "avatarBlob";
}

/// Amounts are whole minor units; tolerate "5,000" and "5000.0" from the sheet
fn parse_amount(value: &str) -> Result<u64, String> {
    let cleaned: String = value.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Ok(0);
    }
    let integral = match cleaned.split_once('.') {
        Some((int, frac)) if frac.chars().all(|c| c == '0') => int,
        Some(_) => return Err(format!("amount '{value}' has a fractional part")),
        None => cleaned.as_str(),
    };
    integral
        .parse()
        .map_err(|_| format!("amount '{value}' is not a non-negative integer"))
}

fn signature(
    row: &RowReader<'_>,
    approver_col: &str,
    at_col: &str,
) -> Result<Option<Signature>, String> {
    let Some(approver) = row.optional_text(approver_col) else {
        return Ok(None);
    };
    let at = row
        .timestamp(at_col)?
        .ok_or_else(|| format!("column '{at_col}' is empty but '{approver_col}' is set"))?;
    Ok(Some(Signature { approver, at }))
}

fn put(row: &mut Row, column: &str, value: impl Into<String>) {
    row.insert(column.to_string(), value.into());
}

fn put_signature(row: &mut Row, approver_col: &str, at_col: &str, sig: &Option<Signature>) {
    match sig {
        Some(sig) => {
            put(row, approver_col, sig.approver.as_str());
            put(row, at_col, format_timestamp(&sig.at));
        }
        None => {
            put(row, approver_col, "");
            put(row, at_col, "");
        }
    }
}

impl RowCodec for Request {
    const TABLE: &'static str = "requests";

    fn key(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> Row {
        let f = &self.fields;
        let mut row = Row::new();
        put(&mut row, col::ID, self.id.as_str());
        put(&mut row, col::DATE, format_date(&self.date));
        put(&mut row, col::TYPE, f.request_type.as_str());
        put(&mut row, col::REQUESTER, self.requester.as_str());
        put(&mut row, col::PROJECT_OWNER, f.project_owner.as_str());
        put(&mut row, col::PROJECT_NAME, f.project_name.as_str());
        put(&mut row, col::PROJECT_CODE, f.project_code.as_str());
        put(&mut row, col::DESCRIPTION, f.description.as_str());
        put(&mut row, col::AMOUNT, f.amount.to_string());
        put(&mut row, col::CURRENCY, f.currency.as_str());
        put(&mut row, col::PAYMENT_METHOD, f.payment_method.as_str());
        put(&mut row, col::VENDOR, f.vendor.as_str());
        put(&mut row, col::REMITTANCE_ACCOUNT, f.remittance_account.as_str());
        put(
            &mut row,
            col::BANK_PROOF_BLOB,
            f.bank_proof.as_ref().map(Attachment::to_base64).unwrap_or_default(),
        );
        put(&mut row, col::STATUS, self.status.as_str());
        put(
            &mut row,
            col::SUPPORTING_BLOBS,
            f.supporting_documents
                .iter()
                .map(Attachment::to_base64)
                .collect::<Vec<_>>()
                .join(&BLOB_SEPARATOR.to_string()),
        );
        put(
            &mut row,
            col::SUBMITTED_AT,
            self.submitted_at.as_ref().map(format_timestamp).unwrap_or_default(),
        );
        put(&mut row, col::REQUESTER_CONTACT, f.requester_contact.as_str());
        put_signature(&mut row, col::STAGE1_APPROVER, col::STAGE1_AT, &self.stage1);
        put_signature(&mut row, col::STAGE2_APPROVER, col::STAGE2_AT, &self.stage2);
        match &self.deletion {
            Some(d) => {
                put(&mut row, col::DELETION_ACTOR, d.actor.as_str());
                put(&mut row, col::DELETION_AT, format_timestamp(&d.at));
                put(&mut row, col::DELETION_REASON, d.reason.as_str());
            }
            None => {
                put(&mut row, col::DELETION_ACTOR, "");
                put(&mut row, col::DELETION_AT, "");
                put(&mut row, col::DELETION_REASON, "");
            }
        }
        put(
            &mut row,
            col::REJECTION_REASON,
            self.rejection_reason.clone().unwrap_or_default(),
        );
        put(&mut row, col::PAYMENT_STATUS, self.payment.as_str());
        put(
            &mut row,
            col::PAYMENT_DATE,
            self.payment.date().as_ref().map(format_date).unwrap_or_default(),
        );
        row
    }

    fn from_row(row: &RowReader<'_>) -> Result<Self, String> {
        let id = row.required_text(col::ID)?;

        // old rows sometimes lack the date column; the id carries it
        let date_text = row.text(col::DATE);
        let date = parse_date(&date_text)
            .or_else(|| id.get(..8).and_then(parse_date))
            .ok_or_else(|| format!("request {id}: invalid date '{date_text}'"))?;

        let type_text = row.text(col::TYPE);
        let request_type = if type_text.is_empty() {
            RequestType::default()
        } else {
            RequestType::parse_label(&type_text)
                .ok_or_else(|| format!("request {id}: unknown type '{type_text}'"))?
        };

        let method_text = row.text(col::PAYMENT_METHOD);
        let payment_method = if method_text.is_empty() {
            PaymentMethod::default()
        } else {
            PaymentMethod::parse_label(&method_text)
                .ok_or_else(|| format!("request {id}: unknown payment method '{method_text}'"))?
        };

        let status_text = row.text(col::STATUS);
        let status = RequestStatus::parse_label(&status_text)
            .ok_or_else(|| format!("request {id}: unknown status '{status_text}'"))?;

        let payment = match row.text(col::PAYMENT_STATUS).as_str() {
            "" | "Unpaid" | "未付款" => PaymentStatus::Unpaid,
            "Paid" | "已付款" => {
                let date_text = row.text(col::PAYMENT_DATE);
                let date = parse_date(&date_text).ok_or_else(|| {
                    format!("request {id}: paid without a valid payment date '{date_text}'")
                })?;
                PaymentStatus::Paid(date)
            }
            other => return Err(format!("request {id}: unknown payment status '{other}'")),
        };

        let deletion = match row.optional_text(col::DELETION_ACTOR) {
            None => None,
            Some(actor) => Some(Deletion {
                actor,
                at: row
                    .timestamp(col::DELETION_AT)?
                    .ok_or_else(|| format!("request {id}: deletion without timestamp"))?,
                reason: row.text(col::DELETION_REASON),
            }),
        };

        let fields = RequestFields {
            request_type,
            project_owner: row.text(col::PROJECT_OWNER),
            project_name: row.text(col::PROJECT_NAME),
            project_code: row.text(col::PROJECT_CODE),
            description: row.text(col::DESCRIPTION),
            amount: parse_amount(&row.text(col::AMOUNT)).map_err(|e| format!("request {id}: {e}"))?,
            currency: row.text(col::CURRENCY),
            payment_method,
            vendor: row.text(col::VENDOR),
            remittance_account: row.text(col::REMITTANCE_ACCOUNT),
            requester_contact: row.text(col::REQUESTER_CONTACT),
            bank_proof: row.blob(col::BANK_PROOF_BLOB)?,
            supporting_documents: row.blobs(col::SUPPORTING_BLOBS)?,
        };

        Ok(Request {
            date,
            requester: row.text(col::REQUESTER),
            fields,
            status,
            submitted_at: row.timestamp(col::SUBMITTED_AT)?,
            stage1: signature(row, col::STAGE1_APPROVER, col::STAGE1_AT)?,
            stage2: signature(row, col::STAGE2_APPROVER, col::STAGE2_AT)?,
            rejection_reason: row.optional_text(col::REJECTION_REASON),
            deletion,
            payment,
            id,
        })
    }
}

// ── Staff table ─────────────────────────────────────────────────────

impl RowCodec for StaffAccount {
    const TABLE: &'static str = "staff";

    fn key(&self) -> &str {
        &self.name
    }

    fn to_row(&self) -> Row {
        let mut row = Row::new();
        put(&mut row, col::NAME, self.name.as_str());
        put(&mut row, col::EMPLOYMENT_STATUS, self.status.as_str());
        put(&mut row, col::CREDENTIAL, self.credential.as_str());
        put(
            &mut row,
            col::AVATAR_BLOB,
            self.avatar.as_ref().map(Attachment::to_base64).unwrap_or_default(),
        );
        row
    }

    fn from_row(row: &RowReader<'_>) -> Result<Self, String> {
        let name = row.required_text(col::NAME)?;
        let status_text = row.text(col::EMPLOYMENT_STATUS);
        let status = EmploymentStatus::parse_label(&status_text)
            .ok_or_else(|| format!("staff {name}: unknown employment status '{status_text}'"))?;

        Ok(StaffAccount {
            status,
            // credentials are compared byte-exact, keep whitespace
            credential: match row.values.get(col::CREDENTIAL) {
                Some(Value::String(s)) => s.clone(),
                _ => row.text(col::CREDENTIAL),
            },
            avatar: row.blob(col::AVATAR_BLOB)?,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn reader(value: &Value) -> RowReader<'_> {
        RowReader::new(value.as_object().unwrap())
    }

    fn decode_request(value: Value) -> Result<Request, String> {
        Request::from_row(&reader(&value))
    }

    fn full_request() -> Request {
        let at = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let mut request = Request::new(
            "20260101-01",
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            "Eve",
            RequestFields {
                request_type: RequestType::Purchase,
                project_owner: "Bob".into(),
                project_name: "Booth".into(),
                project_code: "P-7".into(),
                description: "Banner printing".into(),
                amount: 5000,
                currency: "TWD".into(),
                payment_method: PaymentMethod::TransferFeeDeducted,
                vendor: "PrintCo".into(),
                remittance_account: "012-345".into(),
                requester_contact: "eve@example.com".into(),
                bank_proof: Some(Attachment::new(b"proof".to_vec())),
                supporting_documents: vec![
                    Attachment::new(b"r1".to_vec()),
                    Attachment::new(b"r2".to_vec()),
                ],
            },
        );
        request.status = RequestStatus::Approved;
        request.submitted_at = Some(at);
        request.stage1 = Some(Signature {
            approver: "Bob".into(),
            at,
        });
        request.stage2 = Some(Signature {
            approver: "Fin".into(),
            at,
        });
        request.payment = PaymentStatus::Paid(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        request
    }

    #[test]
    fn test_request_row_uses_stable_columns() {
        let row = full_request().to_row();
        assert_eq!(row["id"], "20260101-01");
        assert_eq!(row["status"], "Approved");
        assert_eq!(row["paymentMethod"], "TransferFeeDeducted");
        assert_eq!(row["supportingBlobs"], "cjE=|cjI=");
        assert_eq!(row["stage1At"], "2026-01-01 10:00:00");
        assert_eq!(row["paymentDate"], "2026-01-05");
        assert_eq!(row["deletionActor"], "");
        assert_eq!(row.len(), 28);
    }

    #[test]
    fn test_request_row_decodes_back() {
        let original = full_request();
        let value = serde_json::to_value(original.to_row()).unwrap();
        assert_eq!(decode_request(value).unwrap(), original);
    }

    #[test]
    fn test_legacy_row_with_labels_and_missing_columns() {
        let request = decode_request(json!({
            "id": "20250302-07",
            "type": "採購",
            "requester": "Eve",
            "projectOwner": "Bob",
            "amount": 1200,
            "paymentMethod": "現金",
            "status": "已儲存",
            "legacyColumn": "ignored"
        }))
        .unwrap();

        assert_eq!(request.date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(request.fields.request_type, RequestType::Purchase);
        assert_eq!(request.fields.amount, 1200);
        assert_eq!(request.fields.payment_method, PaymentMethod::Cash);
        assert_eq!(request.status, RequestStatus::Draft);
        assert!(request.fields.vendor.is_empty());
        assert!(request.fields.supporting_documents.is_empty());
        assert_eq!(request.payment, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = decode_request(json!({
            "id": "20260101-01",
            "date": "2026-01-01",
            "status": "Escalated"
        }))
        .unwrap_err();
        assert!(err.contains("unknown status"));
    }

    #[test]
    fn test_paid_without_date_is_rejected() {
        let err = decode_request(json!({
            "id": "20260101-01",
            "date": "2026-01-01",
            "status": "Approved",
            "paymentStatus": "Paid"
        }))
        .unwrap_err();
        assert!(err.contains("payment date"));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("5,000"), Ok(5000));
        assert_eq!(parse_amount("5000.00"), Ok(5000));
        assert_eq!(parse_amount(""), Ok(0));
        assert!(parse_amount("12.5").is_err());
        assert!(parse_amount("-3").is_err());
    }

    #[test]
    fn test_staff_row() {
        let mut account = StaffAccount::new("Wish 宋威績");
        account.credential = " spaced ".into();
        account.avatar = Some(Attachment::new(vec![1, 2, 3]));

        let value = serde_json::to_value(account.to_row()).unwrap();
        let decoded = StaffAccount::from_row(&reader(&value)).unwrap();
        assert_eq!(decoded, account);

        let legacy = json!({ "name": "Ken", "employmentStatus": "離職" });
        let decoded = StaffAccount::from_row(&reader(&legacy)).unwrap();
        assert_eq!(decoded.status, EmploymentStatus::Terminated);
        assert!(decoded.credential.is_empty());
        assert!(decoded.avatar.is_none());
    }
}
