//! Deposit and expense subcommands.

use caja_core::{BillBundle, ExpenseEdit, MovementKind, NewExpense};

use super::Context;
use crate::error::CliResult;
use crate::output::{History, MovementView, Saved};

pub async fn deposit(ctx: &Context, bills: BillBundle) -> CliResult<()> {
    let total = bills.total_value();
    let id = ctx.db.movements().create_deposit(bills).await?;

    saved(ctx, &id, MovementKind::Deposit, "created", total)
}

pub async fn expense(
    ctx: &Context,
    payee: String,
    description: String,
    declared_amount: i64,
    bills: BillBundle,
) -> CliResult<()> {
    let total = bills.total_value();
    let input = NewExpense {
        payee,
        description,
        declared_amount,
        bills,
    };
    let id = ctx.db.movements().create_expense(input).await?;

    saved(ctx, &id, MovementKind::Expense, "created", total)
}

pub async fn edit_deposit(ctx: &Context, id: &str, bills: BillBundle) -> CliResult<()> {
    let total = bills.total_value();
    let id = ctx.db.movements().edit_deposit(id, bills).await?;

    saved(ctx, &id, MovementKind::Deposit, "edited", total)
}

pub async fn edit_expense(ctx: &Context, id: &str, edit: ExpenseEdit) -> CliResult<()> {
    let total = edit.bills.total_value();
    let id = ctx.db.movements().edit_expense(id, edit).await?;

    saved(ctx, &id, MovementKind::Expense, "edited", total)
}

pub async fn delete(ctx: &Context, id: &str) -> CliResult<()> {
    let movements = ctx.db.movements();
    let kind = movements.get(id).await?.kind();
    movements.delete(id).await?;

    let report = Saved {
        id,
        kind,
        action: "deleted",
    };
    ctx.out.emit(&report, |_| format!("Deleted {} {}", kind.label().to_lowercase(), id))
}

pub async fn show(ctx: &Context, id: &str) -> CliResult<()> {
    let record = ctx.db.movements().get(id).await?;
    let view = MovementView::from(&record);

    ctx.out.emit(&view, |config| view.detail(config))
}

pub async fn history(ctx: &Context, kind: Option<MovementKind>) -> CliResult<()> {
    let records = ctx.db.movements().list(kind).await?;
    let history = History::new(&records);

    ctx.out.emit(&history, |config| history.render(config))
}

fn saved(
    ctx: &Context,
    id: &str,
    kind: MovementKind,
    action: &'static str,
    total: i64,
) -> CliResult<()> {
    let report = Saved { id, kind, action };
    ctx.out.emit(&report, |config| {
        format!("{} {} {} ({})", kind, action, id, config.money(total))
    })
}
