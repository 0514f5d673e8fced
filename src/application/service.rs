use tracing::{info, warn};

use crate::domain::{AccountId, Cents, Ledger, LedgerError, Receipt};

use super::{AccountSummary, BankReport};

/// Application service wrapping a [`Ledger`].
/// This is the primary interface for any client (CLI, scripts, tests); it
/// forwards each operation to the engine and reports the outcome as a
/// structured log event.
#[derive(Debug, Default)]
pub struct BankService {
    ledger: Ledger,
}

impl BankService {
    /// Create a service around an existing ledger.
    pub fn new(ledger: Ledger) -> Self {
        info!(
            liquidity = ledger.liquidity(),
            accounts = ledger.len(),
            "bank opened"
        );
        Self { ledger }
    }

    /// Create a service around a fresh ledger with the given liquidity.
    pub fn with_liquidity(liquidity: Cents) -> Self {
        Self::new(Ledger::with_liquidity(liquidity))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    pub fn liquidity(&self) -> Cents {
        self.ledger.liquidity()
    }

    // ========================
    // Account operations
    // ========================

    pub fn create_account(&mut self, id: AccountId, amount: Cents) -> Result<Receipt, LedgerError> {
        let result = self.ledger.create_account(id, amount);
        log_outcome("create_account", id, amount, &result);
        result
    }

    pub fn remove_account(&mut self, id: AccountId) -> Result<Receipt, LedgerError> {
        let result = self.ledger.remove_account(id);
        log_outcome("remove_account", id, 0, &result);
        result
    }

    pub fn deposit(&mut self, id: AccountId, amount: Cents) -> Result<Receipt, LedgerError> {
        let result = self.ledger.deposit_to_account(id, amount);
        log_outcome("deposit", id, amount, &result);
        result
    }

    pub fn withdraw(&mut self, id: AccountId, amount: Cents) -> Result<Receipt, LedgerError> {
        let result = self.ledger.withdraw_from_account(id, amount);
        log_outcome("withdraw", id, amount, &result);
        result
    }

    pub fn give_loan(&mut self, id: AccountId, amount: Cents) -> Result<Receipt, LedgerError> {
        let result = self.ledger.give_loan(id, amount);
        log_outcome("give_loan", id, amount, &result);
        result
    }

    // ========================
    // Read-only views
    // ========================

    /// Id/balance pair for a single account.
    pub fn show_account(&self, id: AccountId) -> Result<AccountSummary, LedgerError> {
        self.ledger.account(id).map(AccountSummary::from)
    }

    /// Liquidity and every account.
    pub fn report(&self) -> BankReport {
        BankReport::from_ledger(&self.ledger)
    }
}

fn log_outcome(
    operation: &str,
    id: AccountId,
    amount: Cents,
    result: &Result<Receipt, LedgerError>,
) {
    match result {
        Ok(receipt) => info!(
            operation,
            sequence = receipt.sequence,
            account_id = id,
            amount,
            fee = receipt.fee,
            balance_before = receipt.balance.before,
            balance_after = receipt.balance.after,
            liquidity_before = receipt.liquidity.before,
            liquidity_after = receipt.liquidity.after,
            "operation applied"
        ),
        Err(err) => warn!(
            operation,
            account_id = id,
            amount,
            error = err.kind(),
            "operation refused: {}",
            err
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_forwards_to_ledger() {
        let mut service = BankService::with_liquidity(100000);
        service.create_account(0, 10000).unwrap();
        service.deposit(0, 10000).unwrap();
        service.withdraw(0, 1000).unwrap();
        service.give_loan(0, 200).unwrap();

        assert_eq!(
            service.show_account(0),
            Ok(AccountSummary {
                id: 0,
                balance: 19000 - 1000 + 200
            })
        );
        assert_eq!(service.liquidity(), 100000 + 500 + 500 - 200);
        assert_eq!(service.ledger().journal().len(), 4);

        let ledger = service.into_ledger();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_service_passes_failures_through() {
        let mut service = BankService::default();
        assert_eq!(
            service.remove_account(3),
            Err(LedgerError::AccountNotFound(3))
        );
        assert_eq!(
            service.show_account(3),
            Err(LedgerError::AccountNotFound(3))
        );
        assert!(service.report().accounts.is_empty());
    }
}
