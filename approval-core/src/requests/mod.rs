//! Workflow Engine - 请款单状态机
//!
//! ```text
//! Draft ─submit─► AwaitingStage1 ─approve(1)─► AwaitingStage2 ─approve(2)─► Approved
//!   │                  │ reject(1)                   │ reject(2)               │
//!   │                  ▼                             │                         ▼
//!   │              Rejected ◄────────────────────────┘                set_payment_status
//!   │                  │ edit / submit (back to AwaitingStage1)
//!   ▼ soft_delete      ▼ soft_delete
//! Deleted          Deleted
//! ```
//!
//! Every mutation goes through [`RequestsManager`], which re-reads the table
//! under the write lock, checks the policy against that fresh row, applies
//! the action and persists before returning.

pub mod actions;
mod error;
mod manager;
pub mod sequence;

pub use actions::{Stage, WorkflowAction};
pub use error::{InputError, WorkflowError, WorkflowResult};
pub use manager::RequestsManager;
