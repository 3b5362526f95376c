//! Staking minter contract handle
//!
//! One deployed contract instance: construction from an address or from a
//! deterministic (config, code) derivation, typed send operations, and
//! typed reads over the contract's get methods.

mod config;
mod minter;

use thiserror::Error;

use crate::cell::CellError;
use crate::ledger::LedgerError;

pub use config::{content_cell, MinterConfig, StateInit};
pub use minter::{JettonData, StakingData, StakingMinter, WithdrawData, DEPLOY_VALUE};

/// Errors from typed contract reads
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("malformed value in result stack: {0}")]
    Cell(#[from] CellError),
}
