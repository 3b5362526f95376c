//! Jetton Staking: a client-side toolkit for a staking minter contract
//!
//! This crate provides everything needed to deploy and administer a
//! token-issuance-and-staking contract on a TON-style ledger:
//! - Bit-level cell building, hashing and parsing
//! - The contract's wire protocol (opcodes and message bodies)
//! - Deterministic address derivation from the deployment payload
//! - A typed contract handle over an async ledger facade
//! - Bounded-retry transaction confirmation by cursor observation
//! - A guarded interactive workflow: prompt, validate, confirm, submit,
//!   poll, verify, with role-gated action menus
//!
//! # Example
//!
//! ```rust
//! use jetton_staking::protocol;
//! use jetton_staking::types::{Address, Coins};
//!
//! // Encode a mint message body
//! let to = Address::new(0, [7u8; 32]);
//! let amount = Coins::from_tokens("100").unwrap();
//! let body = protocol::mint(&to, amount, Coins::ZERO, Coins::ZERO).unwrap();
//!
//! // Encoding is deterministic; the hash identifies the body
//! println!("body hash: {}", hex::encode(body.hash()));
//! ```

pub mod cell;
pub mod cli;
pub mod contract;
pub mod ledger;
pub mod protocol;
pub mod types;
pub mod ui;
pub mod workflow;

// Re-export commonly used types
pub use cell::{Cell, CellBuilder, CellSlice};
pub use contract::{JettonData, MinterConfig, StakingData, StakingMinter, StateInit, WithdrawData};
pub use ledger::{AccountSnapshot, JsonRpcLedger, LedgerApi, PollConfig, TxCursor};
pub use protocol::Op;
pub use types::{Address, Coins};
pub use ui::{Console, Ui};
pub use workflow::{Action, Outcome, Role, Session};
