use thiserror::Error;

use super::{AccountId, Cents};

/// Every way a ledger operation can be refused.
///
/// All variants are ordinary outcomes of bad input. They are detected before
/// any balance is touched, so a failed operation never leaves partial state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount must be positive, got {amount}")]
    InvalidAmount { amount: Cents },

    #[error("Account already exists: {0}")]
    DuplicateAccount(AccountId),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Insufficient balance in account {id}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        id: AccountId,
        balance: Cents,
        requested: Cents,
    },

    #[error("Insufficient bank liquidity: liquidity {liquidity}, requested {requested}")]
    InsufficientLiquidity { liquidity: Cents, requested: Cents },

    #[error("Amount would overflow the ledger")]
    Overflow,
}

impl LedgerError {
    /// Stable snake_case name, used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount { .. } => "invalid_amount",
            LedgerError::DuplicateAccount(_) => "duplicate_account",
            LedgerError::AccountNotFound(_) => "account_not_found",
            LedgerError::InsufficientBalance { .. } => "insufficient_balance",
            LedgerError::InsufficientLiquidity { .. } => "insufficient_liquidity",
            LedgerError::Overflow => "overflow",
        }
    }
}
