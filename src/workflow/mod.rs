//! Guarded action workflow
//!
//! Every administrative or user action runs through the same state
//! machine: prompt for a candidate value, reject no-op candidates,
//! require explicit confirmation, submit exactly one message, poll for a
//! new transaction, then re-read state to verify the effect. Timeouts are
//! reported as ambiguous, never as success.

mod action;
mod handlers;
mod session;

use thiserror::Error;

use crate::cell::CellError;
use crate::contract::QueryError;
use crate::ledger::{ConfirmError, LedgerError};
use crate::ui::UiError;

pub use action::{derive_role, Action, Role};
pub use handlers::run_action;
pub use session::Session;

/// How an action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new transaction landed and the re-read state matches the intent
    Verified,
    /// A new transaction landed but the state does not match; something
    /// else happened on the contract
    Mismatched,
    /// Polling exhausted its budget; the transaction may still apply
    Unverified,
    /// Nothing was submitted (cancelled or nothing to do)
    Skipped,
    /// Read-only action completed
    Done,
    /// Operator asked to leave the session
    Quit,
}

/// Action-level failures; none of these end the session loop except
/// operator input running out
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Ui(#[from] UiError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Confirm(#[from] ConfirmError),
    #[error(transparent)]
    Cell(#[from] CellError),
}
