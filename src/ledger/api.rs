//! Ledger facade types
//!
//! Everything the toolkit needs from a node, expressed as a small async
//! trait plus the data shapes it exchanges. The node itself (consensus,
//! indexing, transports) is an external collaborator.

use async_trait::async_trait;
use thiserror::Error;

use crate::cell::Cell;
use crate::types::{Address, Coins};

/// Errors surfaced by the ledger facade
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("ledger rpc error: {0}")]
    Rpc(String),
    #[error("malformed ledger response: {0}")]
    Malformed(String),
    #[error("get method {method} failed with exit code {exit_code}")]
    MethodFailed { method: String, exit_code: i32 },
}

/// Identifier of a ledger block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockId {
    pub seqno: u32,
}

/// Position of the last transaction that affected an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxCursor {
    /// Logical time: strictly increases with every applied transaction
    pub lt: u64,
    pub hash: [u8; 32],
}

/// Read-only view of an account at some block
#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    pub balance: Coins,
    /// Cursor of the last transaction; `None` for an account that has
    /// never been transacted against
    pub last: Option<TxCursor>,
    pub code_hash: Option<[u8; 32]>,
    pub data: Option<Vec<u8>>,
}

impl AccountSnapshot {
    /// Whether the account holds deployed code
    pub fn is_active(&self) -> bool {
        self.code_hash.is_some()
    }
}

/// Fee handling for outbound messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    /// Fees are paid on top of the transferred value, never deducted
    PayFeesSeparately,
}

/// A message ready for submission
#[derive(Debug, Clone)]
pub struct MessageRequest {
    pub to: Address,
    pub value: Coins,
    pub body: Cell,
    /// Deployment payload for a not-yet-active account
    pub state_init: Option<Cell>,
    pub mode: SendMode,
}

/// A value on a get-method result stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackValue {
    Int(u128),
    Cell(Cell),
    Slice(Cell),
    Null,
}

/// Typed cursor over a get-method result stack
///
/// Reads values front to back and converts each to the expected type,
/// turning shape mismatches into explicit errors instead of defaults.
pub struct StackReader {
    items: std::vec::IntoIter<StackValue>,
}

impl StackReader {
    pub fn new(items: Vec<StackValue>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }

    fn next(&mut self) -> Result<StackValue, LedgerError> {
        self.items
            .next()
            .ok_or_else(|| LedgerError::Malformed("result stack exhausted".into()))
    }

    pub fn read_int(&mut self) -> Result<u128, LedgerError> {
        match self.next()? {
            StackValue::Int(v) => Ok(v),
            other => Err(LedgerError::Malformed(format!(
                "expected int on stack, got {other:?}"
            ))),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, LedgerError> {
        Ok(self.read_int()? != 0)
    }

    pub fn read_coins(&mut self) -> Result<Coins, LedgerError> {
        Ok(Coins::from_nano(self.read_int()?))
    }

    pub fn read_cell(&mut self) -> Result<Cell, LedgerError> {
        match self.next()? {
            StackValue::Cell(c) | StackValue::Slice(c) => Ok(c),
            other => Err(LedgerError::Malformed(format!(
                "expected cell on stack, got {other:?}"
            ))),
        }
    }

    pub fn read_address(&mut self) -> Result<Address, LedgerError> {
        let cell = self.read_cell()?;
        cell.parse()
            .load_address()
            .map_err(|e| LedgerError::Malformed(format!("address slice: {e}")))
    }
}

/// Async facade over a ledger node
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Latest block the node knows about
    async fn last_block(&self) -> Result<BlockId, LedgerError>;

    /// Account snapshot at the given block
    async fn account_state(
        &self,
        at: BlockId,
        address: &Address,
    ) -> Result<AccountSnapshot, LedgerError>;

    /// Submit a message; returns once the node accepted it, which says
    /// nothing about whether it will be applied
    async fn send_message(&self, request: MessageRequest) -> Result<(), LedgerError>;

    /// Invoke a read-only get method
    async fn run_get_method(
        &self,
        address: &Address,
        method: &str,
        args: Vec<StackValue>,
    ) -> Result<Vec<StackValue>, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellBuilder;

    #[test]
    fn test_stack_reader_types() {
        let addr = Address::new(0, [3u8; 32]);
        let mut slice = CellBuilder::new();
        slice.store_address(&addr).unwrap();

        let mut reader = StackReader::new(vec![
            StackValue::Int(1_000),
            StackValue::Int(0),
            StackValue::Slice(slice.build()),
        ]);
        assert_eq!(reader.read_coins().unwrap(), Coins::from_nano(1_000));
        assert!(!reader.read_bool().unwrap());
        assert_eq!(reader.read_address().unwrap(), addr);
    }

    #[test]
    fn test_stack_reader_rejects_shape_mismatch() {
        let mut reader = StackReader::new(vec![StackValue::Null]);
        assert!(matches!(reader.read_int(), Err(LedgerError::Malformed(_))));

        let mut reader = StackReader::new(vec![]);
        assert!(matches!(reader.read_cell(), Err(LedgerError::Malformed(_))));
    }
}
