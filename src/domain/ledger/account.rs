use crate::domain::{AccountId, Cents};

/// A client account held by a [`Ledger`](super::Ledger).
///
/// Only the ledger can construct accounts or move their balance; everything
/// outside the ledger module sees a read-only view.
///
/// ```compile_fail
/// let forged: argentarius::Account = serde_json::from_str(r#"{"id":1,"balance":-5}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    balance: Cents,
}

impl Account {
    pub(super) fn new(id: AccountId, balance: Cents) -> Self {
        Self { id, balance }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn balance(&self) -> Cents {
        self.balance
    }

    /// Caller guarantees the result fits in `Cents`.
    pub(super) fn credit(&mut self, amount: Cents) {
        self.balance += amount;
    }

    /// Caller guarantees `amount <= balance`.
    pub(super) fn debit(&mut self, amount: Cents) {
        self.balance -= amount;
    }
}
