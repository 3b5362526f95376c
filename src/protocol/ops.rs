//! Operation codes
//!
//! Each contract operation is identified by a fixed 32-bit tag at the start
//! of the message body. The constants below match the deployed contract and
//! are load-bearing for interoperability.

use thiserror::Error;

/// Raised when a message carries an opcode this client does not know
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unsupported operation code {0:#010x}")]
pub struct UnsupportedOp(pub u32);

/// Operation kinds understood by the staking minter contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Op {
    /// Associate the minter with its counterpart jetton wallet
    WalletAssociation = 0xc2e7027b,
    /// Mint tokens to an owner address
    Mint = 0x4fda1e51,
    /// Ask the contract to report a wallet address for an owner
    OwnershipDiscovery = 0x2c76b973,
    /// Transfer admin rights to a new address
    ChangeAdmin = 0x4840664f,
    /// Point auto-withdrawal at a new address
    ChangeWithdrawAddress = 0x4f9d828b,
    /// Replace the token content cell
    ChangeContent = 0x11067aba,
    /// Pause or resume staking
    ChangeState = 0x58ca5361,
    /// Withdraw staked tokens back to the admin
    Withdraw = 0x46ed2e94,
    /// Stake attached value for tokens
    Stake = 0x402eff0b,
    /// Set a new unit price
    ChangePrice = 0xf4463799,
    /// Set a new auto-withdrawal minimum
    ChangeWithdrawMinimum = 0x6f45070e,
}

impl Op {
    /// Every operation kind, in declaration order
    pub const ALL: [Op; 11] = [
        Op::WalletAssociation,
        Op::Mint,
        Op::OwnershipDiscovery,
        Op::ChangeAdmin,
        Op::ChangeWithdrawAddress,
        Op::ChangeContent,
        Op::ChangeState,
        Op::Withdraw,
        Op::Stake,
        Op::ChangePrice,
        Op::ChangeWithdrawMinimum,
    ];

    /// The 32-bit wire tag
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Resolve a wire tag back to an operation kind
    pub fn from_code(code: u32) -> Result<Op, UnsupportedOp> {
        Op::ALL
            .into_iter()
            .find(|op| op.code() == code)
            .ok_or(UnsupportedOp(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_opcodes_are_unique() {
        let codes: HashSet<u32> = Op::ALL.iter().map(|op| op.code()).collect();
        assert_eq!(codes.len(), Op::ALL.len());
    }

    #[test]
    fn test_wire_constants() {
        assert_eq!(Op::WalletAssociation.code(), 0xc2e7027b);
        assert_eq!(Op::Mint.code(), 0x4fda1e51);
        assert_eq!(Op::OwnershipDiscovery.code(), 0x2c76b973);
        assert_eq!(Op::ChangeAdmin.code(), 0x4840664f);
        assert_eq!(Op::ChangeWithdrawAddress.code(), 0x4f9d828b);
        assert_eq!(Op::ChangeContent.code(), 0x11067aba);
        assert_eq!(Op::ChangeState.code(), 0x58ca5361);
        assert_eq!(Op::Withdraw.code(), 0x46ed2e94);
        assert_eq!(Op::Stake.code(), 0x402eff0b);
        assert_eq!(Op::ChangePrice.code(), 0xf4463799);
        assert_eq!(Op::ChangeWithdrawMinimum.code(), 0x6f45070e);
    }

    #[test]
    fn test_from_code() {
        for op in Op::ALL {
            assert_eq!(Op::from_code(op.code()), Ok(op));
        }
        assert_eq!(Op::from_code(0xdeadbeef), Err(UnsupportedOp(0xdeadbeef)));
    }
}
