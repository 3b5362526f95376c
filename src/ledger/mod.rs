//! Ledger access
//!
//! The [`LedgerApi`] trait is the seam between this toolkit and the node
//! it talks to: latest block, account snapshots, message submission and
//! read-only get-method calls. [`confirm`] layers the bounded-retry
//! transaction confirmation protocol on top of it, and [`JsonRpcLedger`]
//! is the production transport.

pub mod api;
pub mod confirm;
mod rpc;

pub use api::{
    AccountSnapshot, BlockId, LedgerApi, LedgerError, MessageRequest, SendMode, StackReader,
    StackValue, TxCursor,
};
pub use confirm::{Confirmation, ConfirmError, PollConfig, MAX_POLL_ATTEMPTS};
pub use rpc::JsonRpcLedger;
