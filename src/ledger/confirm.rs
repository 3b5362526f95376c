//! Transaction confirmation by observation
//!
//! The ledger offers no synchronous commit acknowledgment; the only way to
//! learn that a submitted message took effect is to watch the account's
//! last-transaction cursor move. Polling is bounded: exhausting the
//! attempts is an ambiguous outcome, not proof of failure, because the
//! transaction may still apply after we stop looking.

use std::time::Duration;

use thiserror::Error;

use crate::types::Address;

use super::api::{LedgerApi, LedgerError, TxCursor};

/// Hard cap on observation attempts per confirmation
pub const MAX_POLL_ATTEMPTS: u32 = 10;

/// Confirmation polling errors
#[derive(Error, Debug)]
pub enum ConfirmError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// The account has no transaction history at all, so a before/after
    /// comparison is undefined. Fatal for the current action.
    #[error("account has no transaction history; refusing to confirm against it")]
    NoHistory,
}

/// Polling parameters
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: MAX_POLL_ATTEMPTS,
            interval: Duration::from_secs(2),
        }
    }
}

/// Outcome of a bounded confirmation poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// A new transaction landed on the account. Says nothing about which
    /// one; callers must verify the expected state change themselves.
    Observed,
    /// No new transaction within the attempt budget; ambiguous.
    TimedOut,
}

/// Read the account's current last-transaction cursor
///
/// Must be called immediately before submission. Fails with
/// [`ConfirmError::NoHistory`] when the account has never transacted.
pub async fn capture_cursor(
    api: &dyn LedgerApi,
    address: &Address,
) -> Result<TxCursor, ConfirmError> {
    let block = api.last_block().await?;
    let snapshot = api.account_state(block, address).await?;
    snapshot.last.ok_or(ConfirmError::NoHistory)
}

/// Poll until a transaction newer than `before` is observed, or the
/// attempt budget runs out
pub async fn wait_for_transaction(
    api: &dyn LedgerApi,
    address: &Address,
    before: TxCursor,
    config: &PollConfig,
) -> Result<Confirmation, ConfirmError> {
    let attempts = config.attempts.min(MAX_POLL_ATTEMPTS);
    for attempt in 1..=attempts {
        let block = api.last_block().await?;
        let snapshot = api.account_state(block, address).await?;
        log::debug!(
            "confirmation attempt {attempt}/{attempts} for {address}: last lt {:?}",
            snapshot.last.map(|c| c.lt)
        );

        if let Some(cursor) = snapshot.last {
            if cursor.lt != before.lt {
                log::info!("transaction observed on {address} at lt {}", cursor.lt);
                return Ok(Confirmation::Observed);
            }
        }

        if attempt < attempts {
            tokio::time::sleep(config.interval).await;
        }
    }

    log::warn!("no new transaction observed on {address} after {attempts} attempts");
    Ok(Confirmation::TimedOut)
}
