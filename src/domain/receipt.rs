use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Cents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Account opened with an initial (fee-bearing) amount
    Open,
    /// Account removed from the ledger
    Close,
    Deposit,
    Withdrawal,
    /// Money moved from bank liquidity into an account
    Loan,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Open => "open",
            OperationKind::Close => "close",
            OperationKind::Deposit => "deposit",
            OperationKind::Withdrawal => "withdrawal",
            OperationKind::Loan => "loan",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A value before and after an operation was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    pub before: Cents,
    pub after: Cents,
}

impl BalanceChange {
    pub fn new(before: Cents, after: Cents) -> Self {
        Self { before, after }
    }

    pub fn unchanged(value: Cents) -> Self {
        Self::new(value, value)
    }

    pub fn delta(&self) -> Cents {
        self.after - self.before
    }
}

/// Record of one successful ledger operation.
/// Receipts are immutable; the ledger keeps them in its journal in the order applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Position in the journal, starting at 1
    pub sequence: u64,
    pub kind: OperationKind,
    pub account_id: AccountId,
    /// Amount requested by the caller (0 for closures)
    pub amount: Cents,
    /// Portion of `amount` retained by the bank
    pub fee: Cents,
    /// Balance of the target account
    pub balance: BalanceChange,
    /// Bank liquidity
    pub liquidity: BalanceChange,
    pub recorded_at: DateTime<Utc>,
}
