//! # Subcommands
//!
//! Each subcommand is a thin handler: parse raw text into typed values, call
//! one service operation, print the result.
//!
//! ## Command Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Subcommand        Service call                       Module            │
//! │  ──────────        ────────────                       ──────            │
//! │  deposit           MovementManager::create_deposit    movement.rs       │
//! │  expense           MovementManager::create_expense    movement.rs       │
//! │  edit-deposit      MovementManager::edit_deposit      movement.rs       │
//! │  edit-expense      MovementManager::edit_expense      movement.rs       │
//! │  delete            MovementManager::delete            movement.rs       │
//! │  show              MovementManager::get               movement.rs       │
//! │  history           MovementManager::list              movement.rs       │
//! │  suggest           InventoryLedger::suggest           drawer.rs         │
//! │  inventory (corte) InventoryLedger::snapshot          drawer.rs         │
//! │  verify            MovementManager::check_consistency drawer.rs         │
//! │  status            Database::health_check             drawer.rs         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bills are given as repeated `--bill DENOMINATION=COUNT` flags
//! (`1000x2` is accepted too).

pub mod drawer;
pub mod movement;

use clap::{Subcommand, ValueEnum};

use caja_core::validation::validate_movement_id;
use caja_core::{BillBundle, MovementKind};

use crate::error::CliResult;
use crate::output::Output;
use caja_db::Database;

/// Everything a handler needs.
pub struct Context {
    pub db: Database,
    pub out: Output,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record cash put into the drawer
    Deposit {
        /// Bills added, e.g. `--bill 500=2 --bill 20=3`
        #[arg(short, long = "bill", value_name = "DENOM=COUNT", value_parser = parse_bill)]
        bills: Vec<(i64, i64)>,
    },

    /// Record cash taken out of the drawer to pay for something
    Expense {
        /// Who was paid
        #[arg(short, long)]
        payee: String,

        /// What it was for
        #[arg(short, long, default_value = "")]
        description: String,

        /// Amount the expense cost (may differ from the bills handed over)
        #[arg(short, long, allow_negative_numbers = true)]
        amount: i64,

        /// Bills removed, e.g. `--bill 200=2`
        #[arg(short, long = "bill", value_name = "DENOM=COUNT", value_parser = parse_bill)]
        bills: Vec<(i64, i64)>,
    },

    /// Replace the bills of a deposit
    EditDeposit {
        /// Deposit id
        #[arg(value_parser = parse_id)]
        id: String,

        /// New bills; the old ones are returned first
        #[arg(short, long = "bill", value_name = "DENOM=COUNT", value_parser = parse_bill)]
        bills: Vec<(i64, i64)>,
    },

    /// Replace the bills of an expense, optionally its other fields too
    EditExpense {
        /// Expense id
        #[arg(value_parser = parse_id)]
        id: String,

        /// New bills; the old ones are put back first
        #[arg(short, long = "bill", value_name = "DENOM=COUNT", value_parser = parse_bill)]
        bills: Vec<(i64, i64)>,

        /// New payee
        #[arg(short, long)]
        payee: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New declared amount
        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<i64>,
    },

    /// Delete a deposit or expense and reverse its effect on the drawer
    #[command(alias = "rm")]
    Delete {
        /// Movement id
        #[arg(value_parser = parse_id)]
        id: String,
    },

    /// Show one movement
    Show {
        /// Movement id
        #[arg(value_parser = parse_id)]
        id: String,
    },

    /// List movements, newest first
    #[command(alias = "ls")]
    History {
        /// Only this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Propose bills to hand over for an amount
    Suggest {
        /// Amount to cover
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },

    /// Per-denomination stock and drawer total
    #[command(alias = "corte")]
    Inventory,

    /// Check stored stock against the movements on record
    Verify,

    /// Database location, health and migration state
    Status,
}

/// `--kind` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Deposit,
    Expense,
}

impl From<KindArg> for MovementKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Deposit => MovementKind::Deposit,
            KindArg::Expense => MovementKind::Expense,
        }
    }
}

/// Runs one subcommand.
pub async fn execute(command: Command, ctx: &Context) -> CliResult<()> {
    match command {
        Command::Deposit { bills } => movement::deposit(ctx, bundle(bills)?).await,
        Command::Expense {
            payee,
            description,
            amount,
            bills,
        } => movement::expense(ctx, payee, description, amount, bundle(bills)?).await,
        Command::EditDeposit { id, bills } => {
            movement::edit_deposit(ctx, &id, bundle(bills)?).await
        }
        Command::EditExpense {
            id,
            bills,
            payee,
            description,
            amount,
        } => {
            let edit = caja_core::ExpenseEdit {
                bills: bundle(bills)?,
                payee,
                description,
                declared_amount: amount,
            };
            movement::edit_expense(ctx, &id, edit).await
        }
        Command::Delete { id } => movement::delete(ctx, &id).await,
        Command::Show { id } => movement::show(ctx, &id).await,
        Command::History { kind } => movement::history(ctx, kind.map(MovementKind::from)).await,
        Command::Suggest { amount } => drawer::suggest(ctx, amount).await,
        Command::Inventory => drawer::inventory(ctx).await,
        Command::Verify => drawer::verify(ctx).await,
        Command::Status => drawer::status(ctx).await,
    }
}

/// Validates parsed `--bill` pairs as a bundle.
fn bundle(pairs: Vec<(i64, i64)>) -> CliResult<BillBundle> {
    Ok(BillBundle::from_counts(pairs)?)
}

/// Parses `DENOM=COUNT` or `DENOMxCOUNT`.
///
/// Only checks that both sides are integers; denomination and sign rules are
/// applied when the bundle is built.
pub fn parse_bill(raw: &str) -> Result<(i64, i64), String> {
    let (denomination, count) = raw
        .split_once('=')
        .or_else(|| raw.split_once(|c: char| c == 'x' || c == 'X'))
        .ok_or_else(|| format!("expected DENOM=COUNT, got '{}'", raw))?;

    let denomination = denomination
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("denomination '{}' is not an integer", denomination.trim()))?;
    let count = count
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("count '{}' is not an integer", count.trim()))?;

    Ok((denomination, count))
}

/// Accepts only well-formed movement ids.
pub fn parse_id(raw: &str) -> Result<String, String> {
    validate_movement_id(raw).map_err(|e| e.to_string())?;
    Ok(raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(subcommand)]
        command: Command,
    }

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Harness::try_parse_from(std::iter::once("caja").chain(args.iter().copied()))
            .map(|h| h.command)
    }

    #[test]
    fn test_parse_bill_forms() {
        assert_eq!(parse_bill("1000=2"), Ok((1000, 2)));
        assert_eq!(parse_bill("50x4"), Ok((50, 4)));
        assert_eq!(parse_bill(" 5 = 0 "), Ok((5, 0)));
        assert_eq!(parse_bill("20=-1"), Ok((20, -1)));
        assert!(parse_bill("20").is_err());
        assert!(parse_bill("veinte=1").is_err());
        assert!(parse_bill("20=1.5").is_err());
    }

    #[test]
    fn test_bundle_rejects_unknown_denomination() {
        let err = bundle(vec![(3, 1)]).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);

        let err = bundle(vec![(100, 1), (100, 2)]).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[test]
    fn test_parse_expense() {
        let command = parse(&[
            "expense", "--payee", "Gas", "--amount", "480", "--bill", "200=2", "-b", "100x1",
        ])
        .unwrap();

        let Command::Expense {
            payee,
            description,
            amount,
            bills,
        } = command
        else {
            panic!("expected expense");
        };
        assert_eq!(payee, "Gas");
        assert_eq!(description, "");
        assert_eq!(amount, 480);
        assert_eq!(bills, vec![(200, 2), (100, 1)]);
    }

    #[test]
    fn test_ids_must_be_uuids() {
        assert!(parse(&["delete", "nope"]).is_err());
        assert!(parse(&["show", "550e8400-e29b-41d4-a716-446655440000"]).is_ok());
    }

    #[test]
    fn test_aliases_and_kind_filter() {
        assert!(matches!(parse(&["corte"]).unwrap(), Command::Inventory));

        let Command::History { kind } = parse(&["history", "--kind", "expense"]).unwrap() else {
            panic!("expected history");
        };
        assert_eq!(kind, Some(KindArg::Expense));
    }

    #[test]
    fn test_negative_suggest_amount_reaches_validation() {
        let Command::Suggest { amount } = parse(&["suggest", "-5"]).unwrap() else {
            panic!("expected suggest");
        };
        assert_eq!(amount, -5);
    }
}
