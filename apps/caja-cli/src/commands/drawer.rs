//! Drawer-wide subcommands: suggestion, corte, verification, status.

use caja_core::shortfall;
use tracing::warn;

use super::Context;
use crate::error::CliResult;
use crate::output::{Inventory, Status, Suggestion, Verification};

pub async fn suggest(ctx: &Context, amount: i64) -> CliResult<()> {
    let bills = ctx.db.ledger().suggest(amount).await?;

    let report = Suggestion {
        amount,
        bills: &bills,
        total: bills.total_value(),
        shortfall: shortfall(amount, &bills),
    };
    if report.shortfall > 0 {
        warn!(amount, shortfall = report.shortfall, "Suggestion does not cover amount");
    }

    ctx.out.emit(&report, |config| report.render(config))
}

pub async fn inventory(ctx: &Context) -> CliResult<()> {
    let snapshot = ctx.db.ledger().snapshot().await?;
    let report = Inventory::new(snapshot.entries());

    ctx.out.emit(&report, |config| report.render(config))
}

pub async fn verify(ctx: &Context) -> CliResult<()> {
    let discrepancies = ctx.db.movements().check_consistency().await?;
    let report = Verification {
        consistent: discrepancies.is_empty(),
        discrepancies,
    };

    ctx.out.emit(&report, |_| report.render())
}

pub async fn status(ctx: &Context) -> CliResult<()> {
    let (migrations_total, migrations_applied) = ctx.db.migration_status().await?;

    let report = Status {
        database: ctx.out.config().database_path.display().to_string(),
        healthy: ctx.db.health_check().await,
        migrations_total,
        migrations_applied,
        movements: ctx.db.movements().count().await?,
        total: ctx.db.ledger().total_value().await?,
    };

    ctx.out.emit(&report, |config| report.render(config))
}
