//! Action kinds and role gating
//!
//! The menu is a closed enum, not a list of strings; dispatch happens on
//! the variant. Which subset a session sees depends on whether its sender
//! address equals the contract's current admin.

use crate::types::Address;

/// Session capability level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

/// Compare the invoking sender against the current on-chain admin.
///
/// A session with no sender address is treated as admin-capable: it can
/// browse the full menu for inspection or externally authorized flows,
/// and the contract still enforces authority on-chain.
pub fn derive_role(sender: Option<&Address>, admin: &Address) -> Role {
    match sender {
        Some(s) if s != admin => Role::User,
        _ => Role::Admin,
    }
}

/// Everything the interactive controller can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Mint,
    Buy,
    Info,
    Quit,
    ChangeAdmin,
    ChangeContent,
    ChangeState,
    Withdraw,
    ChangePrice,
    ChangeWithdrawMinimum,
    ChangeWithdrawAddress,
}

impl Action {
    /// Actions every session gets
    pub const COMMON: [Action; 4] = [Action::Mint, Action::Buy, Action::Info, Action::Quit];

    /// Actions reserved for the admin role
    pub const ADMIN_ONLY: [Action; 7] = [
        Action::ChangeAdmin,
        Action::ChangeContent,
        Action::ChangeState,
        Action::Withdraw,
        Action::ChangePrice,
        Action::ChangeWithdrawMinimum,
        Action::ChangeWithdrawAddress,
    ];

    /// Menu label shown to the operator
    pub fn label(self) -> &'static str {
        match self {
            Action::Mint => "Mint",
            Action::Buy => "Buy",
            Action::Info => "Info",
            Action::Quit => "Quit",
            Action::ChangeAdmin => "Change admin",
            Action::ChangeContent => "Change content",
            Action::ChangeState => "Change state",
            Action::Withdraw => "Withdrawal",
            Action::ChangePrice => "Change price",
            Action::ChangeWithdrawMinimum => "Change minimum withdraw",
            Action::ChangeWithdrawAddress => "Change withdraw address",
        }
    }

    /// The action set offered to a role
    pub fn menu(role: Role) -> Vec<Action> {
        let mut actions = Self::COMMON.to_vec();
        if role == Role::Admin {
            actions.extend(Self::ADMIN_ONLY);
        }
        actions
    }
}
