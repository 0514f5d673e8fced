use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::BankReport;
use crate::domain::{Ledger, Receipt};

/// Full JSON export of a bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: BankReport,
    pub journal: Vec<Receipt>,
}

/// Exporter for converting ledger state to various formats
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Export account balances to CSV format
    pub fn accounts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "balance_cents"])?;

        let mut count = 0;
        for account in self.ledger.accounts() {
            csv_writer.write_record([account.id().to_string(), account.balance().to_string()])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the journal of applied operations to CSV format
    pub fn journal_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "sequence",
            "recorded_at",
            "kind",
            "account_id",
            "amount_cents",
            "fee_cents",
            "balance_before",
            "balance_after",
            "liquidity_before",
            "liquidity_after",
        ])?;

        let mut count = 0;
        for receipt in self.ledger.journal() {
            csv_writer.write_record([
                receipt.sequence.to_string(),
                receipt.recorded_at.to_rfc3339(),
                receipt.kind.as_str().to_string(),
                receipt.account_id.to_string(),
                receipt.amount.to_string(),
                receipt.fee.to_string(),
                receipt.balance.before.to_string(),
                receipt.balance.after.to_string(),
                receipt.liquidity.before.to_string(),
                receipt.liquidity.after.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export liquidity, accounts and journal as a JSON snapshot
    pub fn report_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            report: BankReport::from_ledger(self.ledger),
            journal: self.ledger.journal().to_vec(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::with_liquidity(100000);
        ledger.create_account(0, 10000).unwrap();
        ledger.create_account(1, 1700).unwrap();
        ledger.withdraw_from_account(1, 50).unwrap();
        ledger
    }

    #[test]
    fn test_accounts_csv() {
        let ledger = sample_ledger();
        let mut out = Vec::new();
        let count = Exporter::new(&ledger).accounts_csv(&mut out).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,balance_cents\n0,9500\n1,1565\n"
        );
    }

    #[test]
    fn test_journal_csv() {
        let ledger = sample_ledger();
        let mut out = Vec::new();
        let count = Exporter::new(&ledger).journal_csv(&mut out).unwrap();
        assert_eq!(count, 3);

        let text = String::from_utf8(out).unwrap();
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("3,"));
        assert!(last.ends_with(",withdrawal,1,50,0,1615,1565,100585,100585"));
    }

    #[test]
    fn test_report_json() {
        let ledger = sample_ledger();
        let mut out = Vec::new();
        let snapshot = Exporter::new(&ledger).report_json(&mut out).unwrap();
        assert_eq!(snapshot.journal.len(), 3);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["liquidity"], 100585);
        assert_eq!(value["accounts"][1]["balance"], 1565);
        assert_eq!(value["journal"][2]["kind"], "withdrawal");
    }
}
