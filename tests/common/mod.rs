// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use argentarius::application::BankService;
use argentarius::domain::{AccountId, Cents, Ledger};
use std::io::Write;
use tempfile::NamedTempFile;

/// Liquidity used by the reference scenario ($1000.00)
pub const SCENARIO_LIQUIDITY: Cents = 100000;

/// Helper to create a service with the reference scenario liquidity
pub fn test_service() -> BankService {
    BankService::with_liquidity(SCENARIO_LIQUIDITY)
}

/// Test fixture: the two accounts of the reference scenario
pub struct StandardAccounts;

impl StandardAccounts {
    /// Account 0 funded with $100.00, account 1 with $17.00
    pub fn create(service: &mut BankService) -> Result<()> {
        service.create_account(0, 10000)?;
        service.create_account(1, 1700)?;
        Ok(())
    }
}

/// Balance of an account, panicking if it does not exist
pub fn balance(ledger: &Ledger, id: AccountId) -> Cents {
    ledger.account(id).unwrap().balance()
}

/// Write a script to a temporary file
pub fn script_file(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}
