//! Payment tracking on approved requests (admin)

use chrono::NaiveDate;
use shared::models::{PaymentStatus, Request};

use super::{ActionContext, RequestAction};
use crate::auth::Transition;
use crate::requests::error::{InputError, WorkflowResult};

/// SetPaymentStatus action
///
/// `paid = true` needs a date; `paid = false` clears it.
#[derive(Debug, Clone)]
pub struct SetPaymentStatusAction {
    pub request_id: String,
    pub paid: bool,
    pub date: Option<NaiveDate>,
}

impl SetPaymentStatusAction {
    pub fn new(request_id: impl Into<String>, paid: bool, date: Option<NaiveDate>) -> Self {
        Self {
            request_id: request_id.into(),
            paid,
            date,
        }
    }

    fn target(&self) -> Result<PaymentStatus, InputError> {
        match (self.paid, self.date) {
            (true, Some(date)) => Ok(PaymentStatus::Paid(date)),
            (true, None) => Err(InputError::PaymentDateRequired),
            (false, _) => Ok(PaymentStatus::Unpaid),
        }
    }
}

impl RequestAction for SetPaymentStatusAction {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn transition(&self) -> Transition {
        Transition::SetPaymentStatus
    }

    fn apply(&self, record: &mut Request, _ctx: &ActionContext<'_>) -> WorkflowResult<()> {
        record.payment = self.target()?;
        Ok(())
    }
}
