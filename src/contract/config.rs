//! Deployment configuration
//!
//! The contract's initial data cell and the deterministic address
//! derivation from it. Two different configs must never produce the same
//! address; the cell hash guarantees that as long as the layout below is
//! reproduced exactly.

use crate::cell::{Cell, CellBuilder, CellError};
use crate::types::{Address, Coins};

/// Content kind byte for off-chain URI content
const CONTENT_OFFCHAIN: u64 = 1;

/// Build the token content cell: a kind byte followed by the URI as a
/// byte tail (chained into child cells when long)
pub fn content_cell(uri: &str) -> Result<Cell, CellError> {
    let mut b = CellBuilder::new();
    b.store_uint(CONTENT_OFFCHAIN, 8)?.store_tail(uri.as_bytes())?;
    Ok(b.build())
}

/// Initial configuration of a staking minter instance
#[derive(Debug, Clone)]
pub struct MinterConfig {
    pub admin: Address,
    pub content: Cell,
    pub wallet_code: Cell,
    /// `true` deploys the contract paused
    pub paused: bool,
    /// Unit price in nano, 64-bit on the wire
    pub price: u64,
}

impl MinterConfig {
    /// Encode the contract's initial data cell
    ///
    /// Layout: zero supply, zero staked amount, state bit, 64-bit price,
    /// zero collected amount, admin twice (current + withdraw target),
    /// the zero address placeholder for the associated wallet, and a
    /// reference holding content and wallet code.
    pub fn data_cell(&self) -> Result<Cell, CellError> {
        let mut inner = CellBuilder::new();
        inner
            .store_ref(self.content.clone())?
            .store_ref(self.wallet_code.clone())?;

        let mut b = CellBuilder::new();
        b.store_coins(Coins::ZERO)?
            .store_coins(Coins::ZERO)?
            .store_bit(self.paused)?
            .store_uint(self.price, 64)?
            .store_coins(Coins::ZERO)?
            .store_address(&self.admin)?
            .store_address(&self.admin)?
            .store_address(&Address::ZERO)?
            .store_ref(inner.build())?;
        Ok(b.build())
    }
}

/// Code plus initial data for a not-yet-deployed account
#[derive(Debug, Clone)]
pub struct StateInit {
    pub code: Cell,
    pub data: Cell,
}

impl StateInit {
    /// Encode the deployment payload cell: absent split depth and special
    /// markers, code and data as references, empty library dict
    pub fn cell(&self) -> Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        b.store_bit(false)? // no split depth
            .store_bit(false)? // not special
            .store_bit(true)?
            .store_ref(self.code.clone())?
            .store_bit(true)?
            .store_ref(self.data.clone())?
            .store_bit(false)?; // no libraries
        Ok(b.build())
    }

    /// Derive the account address this payload deploys to
    pub fn address(&self, workchain: i8) -> Result<Address, CellError> {
        Ok(Address::new(workchain, self.cell()?.hash()))
    }
}
