//! Wire protocol for the staking minter contract
//!
//! Maps typed operation invocations onto their canonical cell layouts.
//! Field order and widths here are part of the deployed contract's ABI and
//! must not change.

mod messages;
mod ops;

pub use messages::{
    change_admin, change_content, change_price, change_state, change_withdraw_address,
    change_withdraw_minimum, mint, ownership_discovery, stake, wallet_association, withdraw,
    QUERY_ID,
};
pub use ops::{Op, UnsupportedOp};
