use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{format_cents, Account, AccountId, Cents, Ledger};

/// Id/balance pair for a single account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub balance: Cents,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            balance: account.balance(),
        }
    }
}

impl fmt::Display for AccountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] - [{}]", self.id, format_cents(self.balance))
    }
}

/// Snapshot of the whole bank: liquidity plus every account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankReport {
    pub liquidity: Cents,
    pub total_deposits: Cents,
    pub accounts: Vec<AccountSummary>,
}

impl BankReport {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            liquidity: ledger.liquidity(),
            total_deposits: ledger.total_deposits(),
            accounts: ledger.accounts().map(AccountSummary::from).collect(),
        }
    }
}

impl fmt::Display for BankReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bank informations : ")?;
        writeln!(f, "Liquidity : {}", format_cents(self.liquidity))?;
        for account in &self.accounts {
            writeln!(f, "{}", account)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_summary_display() {
        let summary = AccountSummary {
            id: 0,
            balance: 19200,
        };
        assert_eq!(summary.to_string(), "[0] - [$192.00]");
    }

    #[test]
    fn test_bank_report_display() {
        let mut ledger = Ledger::with_liquidity(100000);
        ledger.create_account(1, 1700).unwrap();
        ledger.create_account(0, 10000).unwrap();

        let report = BankReport::from_ledger(&ledger);
        assert_eq!(report.total_deposits, 9500 + 1615);
        assert_eq!(
            report.to_string(),
            "Bank informations : \nLiquidity : $1005.85\n[0] - [$95.00]\n[1] - [$16.15]\n"
        );
    }

    #[test]
    fn test_bank_report_serializes() {
        let ledger = Ledger::with_liquidity(250);
        let json = serde_json::to_value(BankReport::from_ledger(&ledger)).unwrap();
        assert_eq!(json["liquidity"], 250);
        assert_eq!(json["accounts"].as_array().map(Vec::len), Some(0));
    }
}
