//! # Output
//!
//! Text for people, JSON (`--json`) for scripts. Results go to stdout,
//! logs and human-readable errors to stderr.

use chrono::Local;
use serde::Serialize;

use caja_core::{BillBundle, Discrepancy, InventoryEntry, MovementKind, MovementRecord};

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Output settings for one run.
#[derive(Debug, Clone)]
pub struct Output {
    json: bool,
    config: AppConfig,
}

impl Output {
    pub fn new(json: bool, config: AppConfig) -> Self {
        Output { json, config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Prints `value` as JSON, or the text `human` builds.
    pub fn emit<T, F>(&self, value: &T, human: F) -> CliResult<()>
    where
        T: Serialize,
        F: FnOnce(&AppConfig) -> String,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", human(&self.config));
        }
        Ok(())
    }

    /// Reports a failed command.
    pub fn error(&self, err: &CliError) {
        if self.json {
            match serde_json::to_string_pretty(err) {
                Ok(json) => println!("{}", json),
                Err(_) => eprintln!("{}", err),
            }
        } else {
            eprintln!("{}", err);
        }
    }
}

// =============================================================================
// Reports
// =============================================================================

/// A created or edited movement.
#[derive(Debug, Serialize)]
pub struct Saved<'a> {
    pub id: &'a str,
    pub kind: MovementKind,
    pub action: &'static str,
}

/// One movement flattened for display.
#[derive(Debug, Serialize)]
pub struct MovementView<'a> {
    pub id: &'a str,
    pub kind: MovementKind,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_amount: Option<i64>,
    /// Declared amount minus bill value, expenses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unreconciled: Option<i64>,
    pub bills: &'a BillBundle,
    pub total: i64,
}

impl<'a> From<&'a MovementRecord> for MovementView<'a> {
    fn from(record: &'a MovementRecord) -> Self {
        let (payee, description, declared_amount, unreconciled) = match record {
            MovementRecord::Deposit(_) => (None, None, None, None),
            MovementRecord::Expense(expense) => (
                Some(expense.payee.as_str()),
                Some(expense.description.as_str()),
                Some(expense.declared_amount),
                Some(expense.unreconciled()),
            ),
        };

        MovementView {
            id: record.id(),
            kind: record.kind(),
            recorded_at: record.recorded_at(),
            payee,
            description,
            declared_amount,
            unreconciled,
            bills: record.bills(),
            total: record.bills().total_value(),
        }
    }
}

impl MovementView<'_> {
    /// One history line.
    pub fn line(&self, config: &AppConfig) -> String {
        let when = self.recorded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        let mut line = format!(
            "{}  {:<7}  {}  {:>10}  {}",
            when,
            self.kind.label().to_lowercase(),
            self.id,
            config.money(self.total),
            self.bills
        );

        if let (Some(payee), Some(amount)) = (self.payee, self.declared_amount) {
            line.push_str(&format!("  [{} declared {}]", payee, config.money(amount)));
        }
        line
    }

    /// Multi-line detail for `show`.
    pub fn detail(&self, config: &AppConfig) -> String {
        let mut text = format!(
            "{} {}\nrecorded: {}\nbills:    {}\ntotal:    {}",
            self.kind,
            self.id,
            self.recorded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
            self.bills,
            config.money(self.total)
        );

        if let Some(payee) = self.payee {
            text.push_str(&format!("\npayee:    {}", payee));
        }
        if let Some(description) = self.description.filter(|d| !d.is_empty()) {
            text.push_str(&format!("\nfor:      {}", description));
        }
        if let Some(amount) = self.declared_amount {
            text.push_str(&format!("\ndeclared: {}", config.money(amount)));
        }
        if let Some(difference) = self.unreconciled.filter(|&d| d != 0) {
            text.push_str(&format!(" (bills differ by {})", config.money(difference)));
        }
        text
    }
}

/// Movement listing with a grand total per kind.
#[derive(Debug, Serialize)]
pub struct History<'a> {
    pub movements: Vec<MovementView<'a>>,
    pub deposited: i64,
    pub spent: i64,
}

impl<'a> History<'a> {
    pub fn new(records: &'a [MovementRecord]) -> Self {
        let movements: Vec<MovementView<'a>> = records.iter().map(MovementView::from).collect();
        let sum = |kind: MovementKind| -> i64 {
            movements
                .iter()
                .filter(|view| view.kind == kind)
                .map(|view| view.total)
                .sum()
        };

        History {
            deposited: sum(MovementKind::Deposit),
            spent: sum(MovementKind::Expense),
            movements,
        }
    }

    pub fn render(&self, config: &AppConfig) -> String {
        if self.movements.is_empty() {
            return "No movements recorded.".to_string();
        }

        let mut lines: Vec<String> = self.movements.iter().map(|view| view.line(config)).collect();
        lines.push(String::new());
        lines.push(format!(
            "{} movements  deposited {}  spent {}",
            self.movements.len(),
            config.money(self.deposited),
            config.money(self.spent)
        ));
        lines.join("\n")
    }
}

/// Suggested bills for an amount.
#[derive(Debug, Serialize)]
pub struct Suggestion<'a> {
    pub amount: i64,
    pub bills: &'a BillBundle,
    pub total: i64,
    pub shortfall: i64,
}

impl Suggestion<'_> {
    pub fn render(&self, config: &AppConfig) -> String {
        let mut lines: Vec<String> = self
            .bills
            .iter()
            .map(|(denomination, count)| {
                format!(
                    "{:>6} x {:<4} {}",
                    denomination.value(),
                    count,
                    config.money(denomination.times(count))
                )
            })
            .collect();

        lines.push(format!("total {}", config.money(self.total)));
        if self.shortfall > 0 {
            lines.push(format!(
                "short by {}: the drawer cannot cover {} with greedy change",
                config.money(self.shortfall),
                config.money(self.amount)
            ));
        }
        lines.join("\n")
    }
}

/// The "corte": stock per denomination plus the drawer total.
#[derive(Debug, Serialize)]
pub struct Inventory {
    pub entries: Vec<InventoryLine>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct InventoryLine {
    pub denomination: i64,
    pub count: i64,
    pub value: i64,
}

impl Inventory {
    pub fn new(entries: Vec<InventoryEntry>) -> Self {
        let entries: Vec<InventoryLine> = entries
            .into_iter()
            .map(|entry| InventoryLine {
                denomination: entry.denomination.value(),
                count: entry.count,
                value: entry.value(),
            })
            .collect();
        let total = entries.iter().map(|line| line.value).sum();

        Inventory { entries, total }
    }

    pub fn render(&self, config: &AppConfig) -> String {
        let mut lines = vec![format!("{:>6}  {:>5}  {:>10}", "denom", "count", "value")];
        lines.extend(self.entries.iter().map(|line| {
            format!(
                "{:>6}  {:>5}  {:>10}",
                line.denomination,
                line.count,
                config.money(line.value)
            )
        }));
        lines.push(format!("{:>6}  {:>5}  {:>10}", "total", "", config.money(self.total)));
        lines.join("\n")
    }
}

/// Result of `verify`.
#[derive(Debug, Serialize)]
pub struct Verification {
    pub consistent: bool,
    pub discrepancies: Vec<Discrepancy>,
}

impl Verification {
    pub fn render(&self) -> String {
        if self.consistent {
            return "Inventory matches the movements on record.".to_string();
        }

        let mut lines = vec!["Inventory disagrees with the movements on record:".to_string()];
        lines.extend(self.discrepancies.iter().map(|d| {
            format!(
                "  {:>6}: stored {}, movements say {}",
                d.denomination.value(),
                d.actual,
                d.expected
            )
        }));
        lines.join("\n")
    }
}

/// Result of `status`.
#[derive(Debug, Serialize)]
pub struct Status {
    pub database: String,
    pub healthy: bool,
    pub migrations_total: usize,
    pub migrations_applied: usize,
    pub movements: i64,
    pub total: i64,
}

impl Status {
    pub fn render(&self, config: &AppConfig) -> String {
        format!(
            "database:   {}\nhealthy:    {}\nmigrations: {}/{}\nmovements:  {}\ndrawer:     {}",
            self.database,
            if self.healthy { "yes" } else { "no" },
            self.migrations_applied,
            self.migrations_total,
            self.movements,
            config.money(self.total)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CURRENCY_SYMBOL;
    use caja_core::{Deposit, Expense, InventorySnapshot, NewExpense};
    use std::path::PathBuf;

    fn config() -> AppConfig {
        AppConfig {
            database_path: PathBuf::from("caja.db"),
            log_filter: String::new(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    fn bills(pairs: &[(i64, i64)]) -> BillBundle {
        BillBundle::from_counts(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_history_totals_by_kind() {
        let records: Vec<MovementRecord> = vec![
            Deposit::new(bills(&[(500, 2)])).into(),
            Expense::new(NewExpense {
                payee: "Gas".to_string(),
                description: String::new(),
                declared_amount: 480,
                bills: bills(&[(200, 2), (100, 1)]),
            })
            .into(),
        ];

        let history = History::new(&records);
        assert_eq!(history.deposited, 1000);
        assert_eq!(history.spent, 500);
        assert!(history.render(&config()).contains("deposited $1000  spent $500"));
    }

    #[test]
    fn test_inventory_report_is_descending_with_total() {
        let snapshot = InventorySnapshot::from_counts([(1, 3), (100, 2)]).unwrap();
        let report = Inventory::new(snapshot.entries());

        assert_eq!(report.entries.first().map(|l| l.denomination), Some(1000));
        assert_eq!(report.entries.last().map(|l| l.denomination), Some(1));
        assert_eq!(report.total, 203);
    }

    #[test]
    fn test_suggestion_mentions_shortfall() {
        let bundle = bills(&[(100, 1)]);
        let suggestion = Suggestion {
            amount: 350,
            bills: &bundle,
            total: 100,
            shortfall: 250,
        };

        let text = suggestion.render(&config());
        assert!(text.contains("short by $250"));

        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["bills"]["100"], 1);
        assert_eq!(json["shortfall"], 250);
    }

    #[test]
    fn test_deposit_view_omits_expense_fields() {
        let record: MovementRecord = Deposit::new(bills(&[(5, 2)])).into();
        let json = serde_json::to_value(MovementView::from(&record)).unwrap();

        assert_eq!(json["kind"], "deposit");
        assert_eq!(json["total"], 10);
        assert!(json.get("payee").is_none());
        assert!(json.get("unreconciled").is_none());
    }

    #[test]
    fn test_expense_detail_reports_unreconciled_difference() {
        let record: MovementRecord = Expense::new(NewExpense {
            payee: "Gas".to_string(),
            description: String::new(),
            declared_amount: 480,
            bills: bills(&[(500, 1)]),
        })
        .into();
        let view = MovementView::from(&record);

        assert_eq!(view.unreconciled, Some(-20));
        assert!(view.detail(&config()).contains("declared: $480 (bills differ by -$20)"));

        let exact: MovementRecord = Expense::new(NewExpense {
            payee: "Gas".to_string(),
            description: String::new(),
            declared_amount: 500,
            bills: bills(&[(500, 1)]),
        })
        .into();
        assert!(!MovementView::from(&exact).detail(&config()).contains("differ"));
    }
}
