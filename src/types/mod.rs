//! Core value types shared across the toolkit
//!
//! Everything the workflow touches is parsed into these types at the
//! prompt/config boundary, so the rest of the crate never handles raw
//! strings.

mod address;
mod coins;

pub use address::{Address, AddressError};
pub use coins::{Coins, CoinsError};
