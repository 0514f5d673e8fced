use std::collections::BTreeMap;

use chrono::Utc;

use super::{
    compute_fee, BalanceChange, Cents, LedgerError, OperationKind, Receipt, DEFAULT_LIQUIDITY,
};

mod account;

pub use account::Account;

pub type AccountId = i64;

/// The bank: owns its liquidity pool and every client account.
///
/// The ledger is the only place balances change. Each operation validates
/// fully before mutating, so it either applies all of its balance changes
/// or none of them. Mutating operations take `&mut self`, which serializes
/// them: no two can interleave between a balance check and its update.
#[derive(Debug, Clone)]
pub struct Ledger {
    liquidity: Cents,
    accounts: BTreeMap<AccountId, Account>,
    journal: Vec<Receipt>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create a bank with [`DEFAULT_LIQUIDITY`].
    pub fn new() -> Self {
        Self::with_liquidity(DEFAULT_LIQUIDITY)
    }

    /// Create a bank with an explicit starting liquidity, in cents.
    pub fn with_liquidity(liquidity: Cents) -> Self {
        Self {
            liquidity,
            accounts: BTreeMap::new(),
            journal: Vec::new(),
        }
    }

    pub fn liquidity(&self) -> Cents {
        self.liquidity
    }

    /// Look up an account by id.
    pub fn account(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts
            .get(&id)
            .ok_or(LedgerError::AccountNotFound(id))
    }

    pub fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    /// All accounts, ordered by id.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all client balances.
    pub fn total_deposits(&self) -> Cents {
        self.accounts
            .values()
            .fold(0, |total: Cents, a| total.saturating_add(a.balance()))
    }

    /// Every successful operation so far, oldest first.
    pub fn journal(&self) -> &[Receipt] {
        &self.journal
    }

    // ========================
    // Ledger operations
    // ========================

    /// Open an account funded with `amount`, less the deposit fee.
    pub fn create_account(
        &mut self,
        id: AccountId,
        amount: Cents,
    ) -> Result<Receipt, LedgerError> {
        require_positive(amount)?;
        if self.accounts.contains_key(&id) {
            return Err(LedgerError::DuplicateAccount(id));
        }

        let fee = compute_fee(amount);
        let liquidity_after = self
            .liquidity
            .checked_add(fee)
            .ok_or(LedgerError::Overflow)?;
        let net = amount - fee;

        self.accounts.insert(id, Account::new(id, net));
        let liquidity = self.set_liquidity(liquidity_after);

        Ok(self.record(
            OperationKind::Open,
            id,
            amount,
            fee,
            BalanceChange::new(0, net),
            liquidity,
        ))
    }

    /// Remove an account. Its closing balance leaves the ledger with it.
    pub fn remove_account(&mut self, id: AccountId) -> Result<Receipt, LedgerError> {
        let account = self
            .accounts
            .remove(&id)
            .ok_or(LedgerError::AccountNotFound(id))?;

        Ok(self.record(
            OperationKind::Close,
            id,
            0,
            0,
            BalanceChange::unchanged(account.balance()),
            BalanceChange::unchanged(self.liquidity),
        ))
    }

    /// Credit `amount` less the deposit fee; the fee goes to liquidity.
    pub fn deposit_to_account(
        &mut self,
        id: AccountId,
        amount: Cents,
    ) -> Result<Receipt, LedgerError> {
        require_positive(amount)?;
        let balance_before = self.account(id)?.balance();

        let fee = compute_fee(amount);
        let net = amount - fee;
        let balance_after = balance_before
            .checked_add(net)
            .ok_or(LedgerError::Overflow)?;
        let liquidity_after = self
            .liquidity
            .checked_add(fee)
            .ok_or(LedgerError::Overflow)?;

        self.account_mut(id)?.credit(net);
        let liquidity = self.set_liquidity(liquidity_after);

        Ok(self.record(
            OperationKind::Deposit,
            id,
            amount,
            fee,
            BalanceChange::new(balance_before, balance_after),
            liquidity,
        ))
    }

    /// Debit `amount` from an account. Withdrawals carry no fee.
    pub fn withdraw_from_account(
        &mut self,
        id: AccountId,
        amount: Cents,
    ) -> Result<Receipt, LedgerError> {
        require_positive(amount)?;
        let balance_before = self.account(id)?.balance();
        if balance_before < amount {
            return Err(LedgerError::InsufficientBalance {
                id,
                balance: balance_before,
                requested: amount,
            });
        }

        self.account_mut(id)?.debit(amount);

        Ok(self.record(
            OperationKind::Withdrawal,
            id,
            amount,
            0,
            BalanceChange::new(balance_before, balance_before - amount),
            BalanceChange::unchanged(self.liquidity),
        ))
    }

    /// Lend `amount` from bank liquidity to an account.
    ///
    /// Liquidity is checked before the account is looked up, so a loan that
    /// the bank cannot cover reports `InsufficientLiquidity` even when the
    /// account does not exist.
    pub fn give_loan(&mut self, id: AccountId, amount: Cents) -> Result<Receipt, LedgerError> {
        require_positive(amount)?;
        if self.liquidity < amount {
            return Err(LedgerError::InsufficientLiquidity {
                liquidity: self.liquidity,
                requested: amount,
            });
        }
        let balance_before = self.account(id)?.balance();
        let balance_after = balance_before
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.account_mut(id)?.credit(amount);
        let liquidity = self.set_liquidity(self.liquidity - amount);

        Ok(self.record(
            OperationKind::Loan,
            id,
            amount,
            0,
            BalanceChange::new(balance_before, balance_after),
            liquidity,
        ))
    }

    // ========================
    // Helpers
    // ========================

    fn account_mut(&mut self, id: AccountId) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(&id)
            .ok_or(LedgerError::AccountNotFound(id))
    }

    fn set_liquidity(&mut self, liquidity: Cents) -> BalanceChange {
        let change = BalanceChange::new(self.liquidity, liquidity);
        self.liquidity = liquidity;
        change
    }

    fn record(
        &mut self,
        kind: OperationKind,
        account_id: AccountId,
        amount: Cents,
        fee: Cents,
        balance: BalanceChange,
        liquidity: BalanceChange,
    ) -> Receipt {
        let receipt = Receipt {
            sequence: self.journal.len() as u64 + 1,
            kind,
            account_id,
            amount,
            fee,
            balance,
            liquidity,
            recorded_at: Utc::now(),
        };
        self.journal.push(receipt.clone());
        receipt
    }
}

fn require_positive(amount: Cents) -> Result<(), LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount { amount });
    }
    Ok(())
}
