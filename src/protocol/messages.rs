//! Message body constructors
//!
//! One function per operation kind. Every body starts with the 32-bit
//! opcode and a 64-bit query id, followed by the operation's fields in
//! their fixed order. Encoding is pure: the same arguments always produce
//! the same cell.

use crate::cell::{Cell, CellBuilder, CellError};
use crate::types::{Address, Coins};

use super::Op;

/// Correlation id carried by every message; this client never correlates
/// responses, so it is always zero
pub const QUERY_ID: u64 = 0;

fn body(op: Op) -> Result<CellBuilder, CellError> {
    let mut b = CellBuilder::new();
    b.store_uint(op.code() as u64, 32)?.store_uint(QUERY_ID, 64)?;
    Ok(b)
}

/// Wallet-association request, also used as the deploy message body
pub fn wallet_association(counterpart: &Address) -> Result<Cell, CellError> {
    let mut b = body(Op::WalletAssociation)?;
    b.store_address(counterpart)?;
    Ok(b.build())
}

/// Mint `amount` tokens to `to`, forwarding `forward_value` of the
/// attached `total_value` to the receiving wallet
pub fn mint(
    to: &Address,
    amount: Coins,
    forward_value: Coins,
    total_value: Coins,
) -> Result<Cell, CellError> {
    let mut b = body(Op::Mint)?;
    b.store_address(to)?
        .store_coins(amount)?
        .store_coins(forward_value)?
        .store_coins(total_value)?;
    Ok(b.build())
}

/// Ask the contract for the wallet address owned by `owner`
pub fn ownership_discovery(owner: &Address, include_address: bool) -> Result<Cell, CellError> {
    let mut b = body(Op::OwnershipDiscovery)?;
    b.store_address(owner)?.store_bit(include_address)?;
    Ok(b.build())
}

pub fn change_admin(new_admin: &Address) -> Result<Cell, CellError> {
    let mut b = body(Op::ChangeAdmin)?;
    b.store_address(new_admin)?;
    Ok(b.build())
}

pub fn change_withdraw_address(new_address: &Address) -> Result<Cell, CellError> {
    let mut b = body(Op::ChangeWithdrawAddress)?;
    b.store_address(new_address)?;
    Ok(b.build())
}

/// Replace the token content; the content travels as a nested reference,
/// not inline bytes
pub fn change_content(content: Cell) -> Result<Cell, CellError> {
    let mut b = body(Op::ChangeContent)?;
    b.store_ref(content)?;
    Ok(b.build())
}

/// Toggle the operating state: `true` pauses staking, `false` resumes it
pub fn change_state(paused: bool) -> Result<Cell, CellError> {
    let mut b = body(Op::ChangeState)?;
    b.store_bit(paused)?;
    Ok(b.build())
}

/// Withdraw `amount` of staked tokens; zero means "all known balance"
pub fn withdraw(amount: Coins) -> Result<Cell, CellError> {
    let mut b = body(Op::Withdraw)?;
    b.store_coins(amount)?;
    Ok(b.build())
}

/// Stake whatever value is attached to the carrying message
pub fn stake() -> Result<Cell, CellError> {
    Ok(body(Op::Stake)?.build())
}

/// Set a new unit price (64-bit nano amount)
pub fn change_price(price: u64) -> Result<Cell, CellError> {
    let mut b = body(Op::ChangePrice)?;
    b.store_uint(price, 64)?;
    Ok(b.build())
}

pub fn change_withdraw_minimum(minimum: Coins) -> Result<Cell, CellError> {
    let mut b = body(Op::ChangeWithdrawMinimum)?;
    b.store_coins(minimum)?;
    Ok(b.build())
}
