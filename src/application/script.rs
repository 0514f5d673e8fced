use std::fmt;

use crate::domain::{format_cents, parse_cents, AccountId, Cents, LedgerError, Receipt};

use super::{AccountSummary, BankReport, BankService, ScriptError};

/// Liquidity the bank in [`DEMO_SCRIPT`] starts with ($1000.00).
pub const DEMO_LIQUIDITY: Cents = 100000;

/// Walkthrough of every operation, including the expected refusals.
pub const DEMO_SCRIPT: &str = "\
# Creating accounts
open 0 100.00
open 1 17.00
open 0 50.00          # duplicate id

# Deposit (5% fee to the bank)
deposit 0 100.00

# Withdrawals
withdraw 1 0.50
withdraw 1 50.00      # more than the balance

# Loans
loan 0 2.00
loan 1 2000.00        # more than the bank holds

# Current state
show 0
show 1
status

# Removal
close 1
close 1               # already removed
status
";

/// A single script instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Open { id: AccountId, amount: Cents },
    Close { id: AccountId },
    Deposit { id: AccountId, amount: Cents },
    Withdraw { id: AccountId, amount: Cents },
    Loan { id: AccountId, amount: Cents },
    Show { id: AccountId },
    Status,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Open { id, amount } => write!(f, "open {} {}", id, format_cents(*amount)),
            Command::Close { id } => write!(f, "close {}", id),
            Command::Deposit { id, amount } => {
                write!(f, "deposit {} {}", id, format_cents(*amount))
            }
            Command::Withdraw { id, amount } => {
                write!(f, "withdraw {} {}", id, format_cents(*amount))
            }
            Command::Loan { id, amount } => write!(f, "loan {} {}", id, format_cents(*amount)),
            Command::Show { id } => write!(f, "show {}", id),
            Command::Status => write!(f, "status"),
        }
    }
}

/// A command together with the line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub command: Command,
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<Statement>, ScriptError> {
    let mut statements = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }
        let command = parse_command(line, text)?;
        statements.push(Statement { line, command });
    }

    Ok(statements)
}

fn parse_command(line: usize, text: &str) -> Result<Command, ScriptError> {
    let mut words = text.split_whitespace();
    let name = words.next().unwrap_or_default().to_lowercase();
    let mut args = Args {
        line,
        command: &name,
        words,
    };

    let command = match name.as_str() {
        "open" | "create" => Command::Open {
            id: args.account_id()?,
            amount: args.amount()?,
        },
        "close" | "remove" => Command::Close {
            id: args.account_id()?,
        },
        "deposit" => Command::Deposit {
            id: args.account_id()?,
            amount: args.amount()?,
        },
        "withdraw" => Command::Withdraw {
            id: args.account_id()?,
            amount: args.amount()?,
        },
        "loan" => Command::Loan {
            id: args.account_id()?,
            amount: args.amount()?,
        },
        "show" => Command::Show {
            id: args.account_id()?,
        },
        "status" => Command::Status,
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: name.clone(),
            });
        }
    };

    args.finish()?;
    Ok(command)
}

struct Args<'a> {
    line: usize,
    command: &'a str,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn next(&mut self, argument: &'static str) -> Result<&'a str, ScriptError> {
        self.words.next().ok_or_else(|| ScriptError::MissingArgument {
            line: self.line,
            command: self.command.to_string(),
            argument,
        })
    }

    fn account_id(&mut self) -> Result<AccountId, ScriptError> {
        let value = self.next("account id")?;
        value.parse().map_err(|_| ScriptError::InvalidAccountId {
            line: self.line,
            value: value.to_string(),
        })
    }

    fn amount(&mut self) -> Result<Cents, ScriptError> {
        let value = self.next("amount")?;
        parse_cents(value).map_err(|source| ScriptError::InvalidAmount {
            line: self.line,
            value: value.to_string(),
            source,
        })
    }

    fn finish(mut self) -> Result<(), ScriptError> {
        match self.words.next() {
            Some(extra) => Err(ScriptError::UnexpectedArgument {
                line: self.line,
                value: extra.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// What a step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Applied(Receipt),
    Account(AccountSummary),
    Status(BankReport),
    Failed(LedgerError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub statement: Statement,
    pub result: StepResult,
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.result, StepResult::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Stop after the first refused operation
    pub stop_on_error: bool,
}

/// Outcome of running a script.
#[derive(Debug, Clone, Default)]
pub struct ScriptRun {
    pub steps: Vec<StepOutcome>,
    /// True when `stop_on_error` cut the run short
    pub stopped_early: bool,
}

impl ScriptRun {
    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.is_failure())
    }
}

/// Execute statements in order against the service.
pub fn execute(
    service: &mut BankService,
    statements: &[Statement],
    options: RunOptions,
) -> ScriptRun {
    let mut run = ScriptRun::default();

    for (index, statement) in statements.iter().enumerate() {
        let result = execute_command(service, statement.command);
        let failed = matches!(result, StepResult::Failed(_));
        run.steps.push(StepOutcome {
            statement: *statement,
            result,
        });

        if failed && options.stop_on_error {
            run.stopped_early = index + 1 < statements.len();
            break;
        }
    }

    run
}

fn execute_command(service: &mut BankService, command: Command) -> StepResult {
    let applied = match command {
        Command::Open { id, amount } => service.create_account(id, amount),
        Command::Close { id } => service.remove_account(id),
        Command::Deposit { id, amount } => service.deposit(id, amount),
        Command::Withdraw { id, amount } => service.withdraw(id, amount),
        Command::Loan { id, amount } => service.give_loan(id, amount),
        Command::Show { id } => {
            return match service.show_account(id) {
                Ok(summary) => StepResult::Account(summary),
                Err(err) => StepResult::Failed(err),
            };
        }
        Command::Status => return StepResult::Status(service.report()),
    };

    match applied {
        Ok(receipt) => StepResult::Applied(receipt),
        Err(err) => StepResult::Failed(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_skips_comments_and_blanks() {
        let statements =
            parse_script("# header\n\nopen 0 100.00 # trailing\n  STATUS  \n").unwrap();
        assert_eq!(
            statements,
            vec![
                Statement {
                    line: 3,
                    command: Command::Open {
                        id: 0,
                        amount: 10000
                    }
                },
                Statement {
                    line: 4,
                    command: Command::Status
                },
            ]
        );
    }

    #[test]
    fn test_parse_aliases() {
        let statements = parse_script("create 4 17\nremove 4").unwrap();
        assert_eq!(statements[0].command, Command::Open { id: 4, amount: 1700 });
        assert_eq!(statements[1].command, Command::Close { id: 4 });
    }

    #[test]
    fn test_parse_errors_carry_line() {
        assert_eq!(
            parse_script("status\nfly 1"),
            Err(ScriptError::UnknownCommand {
                line: 2,
                command: "fly".into()
            })
        );
        assert_eq!(
            parse_script("deposit 1"),
            Err(ScriptError::MissingArgument {
                line: 1,
                command: "deposit".into(),
                argument: "amount"
            })
        );
        assert_eq!(
            parse_script("\nshow x").map_err(|e| e.line()),
            Err(2)
        );
        assert_eq!(
            parse_script("close 1 2"),
            Err(ScriptError::UnexpectedArgument {
                line: 1,
                value: "2".into()
            })
        );
        assert!(matches!(
            parse_script("loan 1 lots"),
            Err(ScriptError::InvalidAmount { line: 1, .. })
        ));
    }

    #[test]
    fn test_negative_amounts_reach_the_ledger() {
        let statements = parse_script("open 1 -5").unwrap();
        let mut service = BankService::default();
        let run = execute(&mut service, &statements, RunOptions::default());
        assert_eq!(
            run.steps[0].result,
            StepResult::Failed(LedgerError::InvalidAmount { amount: -500 })
        );
    }

    #[test]
    fn test_command_display() {
        assert_eq!(
            Command::Deposit {
                id: 0,
                amount: 10000
            }
            .to_string(),
            "deposit 0 $100.00"
        );
        assert_eq!(Command::Show { id: 2 }.to_string(), "show 2");
    }

    #[test]
    fn test_stop_on_error() {
        let statements = parse_script("withdraw 1 5\nopen 1 5\nstatus").unwrap();

        let mut service = BankService::default();
        let run = execute(&mut service, &statements, RunOptions::default());
        assert_eq!(run.steps.len(), 3);
        assert_eq!(run.failures().count(), 1);
        assert!(!run.stopped_early);

        let mut service = BankService::default();
        let run = execute(
            &mut service,
            &statements,
            RunOptions {
                stop_on_error: true,
            },
        );
        assert_eq!(run.steps.len(), 1);
        assert!(run.stopped_early);
        assert!(service.ledger().is_empty());
    }

    #[test]
    fn test_demo_script_parses() {
        let statements = parse_script(DEMO_SCRIPT).unwrap();
        assert_eq!(statements.len(), 14);
    }
}
