//! # Movement Records
//!
//! Deposits and expenses, plus the inputs used to create and edit them.
//!
//! ## Record Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Movement Lifecycle                                │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── Deposit::new(bills) / Expense::new(NewExpense)                 │
//! │         ledger += effect()                                             │
//! │                                                                         │
//! │  2. (OPTIONAL) EDIT                                                    │
//! │     └── bills + timestamp replaced, id kept                            │
//! │         ledger += reversal(old) + effect(new)                          │
//! │                                                                         │
//! │  3. (OPTIONAL) DELETE                                                  │
//! │     └── ledger += reversal()                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger never points back at records; whoever changes a record is
//! responsible for applying the matching [`StockDelta`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::bundle::BillBundle;
use crate::inventory::StockDelta;
use crate::validation::{validate_amount, validate_description, validate_payee, ValidationResult};

// =============================================================================
// Movement Kind
// =============================================================================

/// Direction of a movement.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Cash entering the drawer.
    Deposit,
    /// Cash leaving the drawer.
    Expense,
}

impl MovementKind {
    /// Human-readable label used in errors and reports.
    pub fn label(&self) -> &'static str {
        match self {
            MovementKind::Deposit => "Deposit",
            MovementKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Deposit
// =============================================================================

/// Cash added to the drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub bills: BillBundle,
}

impl Deposit {
    /// A new deposit stamped with a fresh id and the current time.
    pub fn new(bills: BillBundle) -> Self {
        Deposit {
            id: generate_movement_id(),
            recorded_at: Utc::now(),
            bills,
        }
    }
}

// =============================================================================
// Expense
// =============================================================================

/// Cash taken from the drawer to pay someone.
///
/// `declared_amount` is what the expense cost; `bills` is what physically left
/// the drawer. The two are stored independently and never reconciled (the
/// payee may have returned change).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub payee: String,
    pub description: String,
    pub declared_amount: i64,
    pub bills: BillBundle,
}

impl Expense {
    /// A new expense stamped with a fresh id and the current time.
    pub fn new(input: NewExpense) -> Self {
        Expense {
            id: generate_movement_id(),
            recorded_at: Utc::now(),
            payee: input.payee.trim().to_string(),
            description: input.description.trim().to_string(),
            declared_amount: input.declared_amount,
            bills: input.bills,
        }
    }

    /// Declared amount minus the value of the bills handed over.
    ///
    /// Positive when the bills fall short of the declared amount, negative
    /// when more cash left the drawer than was declared.
    pub fn unreconciled(&self) -> i64 {
        self.declared_amount - self.bills.total_value()
    }
}

/// Input for creating an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub payee: String,
    pub description: String,
    pub declared_amount: i64,
    pub bills: BillBundle,
}

impl NewExpense {
    /// Checks text limits and that the declared amount is non-negative.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_payee(&self.payee)?;
        validate_description(&self.description)?;
        validate_amount("declared amount", self.declared_amount)?;
        Ok(())
    }
}

/// Input for editing an expense.
///
/// The bundle is always replaced; the other fields only when supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEdit {
    pub bills: BillBundle,
    pub payee: Option<String>,
    pub description: Option<String>,
    pub declared_amount: Option<i64>,
}

impl ExpenseEdit {
    /// An edit that only replaces the bundle.
    pub fn bills(bills: BillBundle) -> Self {
        ExpenseEdit {
            bills,
            ..ExpenseEdit::default()
        }
    }

    /// Validates whichever optional fields are present.
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(payee) = &self.payee {
            validate_payee(payee)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(amount) = self.declared_amount {
            validate_amount("declared amount", amount)?;
        }
        Ok(())
    }

    /// Produces the edited record. `id` is preserved, `recorded_at` refreshed.
    pub fn apply_to(self, expense: &Expense) -> Expense {
        Expense {
            id: expense.id.clone(),
            recorded_at: Utc::now(),
            payee: self
                .payee
                .map(|payee| payee.trim().to_string())
                .unwrap_or_else(|| expense.payee.clone()),
            description: self
                .description
                .map(|description| description.trim().to_string())
                .unwrap_or_else(|| expense.description.clone()),
            declared_amount: self.declared_amount.unwrap_or(expense.declared_amount),
            bills: self.bills,
        }
    }
}

// =============================================================================
// Movement Record
// =============================================================================

/// A stored deposit or expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MovementRecord {
    Deposit(Deposit),
    Expense(Expense),
}

impl MovementRecord {
    pub fn id(&self) -> &str {
        match self {
            MovementRecord::Deposit(deposit) => &deposit.id,
            MovementRecord::Expense(expense) => &expense.id,
        }
    }

    pub fn kind(&self) -> MovementKind {
        match self {
            MovementRecord::Deposit(_) => MovementKind::Deposit,
            MovementRecord::Expense(_) => MovementKind::Expense,
        }
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        match self {
            MovementRecord::Deposit(deposit) => deposit.recorded_at,
            MovementRecord::Expense(expense) => expense.recorded_at,
        }
    }

    pub fn bills(&self) -> &BillBundle {
        match self {
            MovementRecord::Deposit(deposit) => &deposit.bills,
            MovementRecord::Expense(expense) => &expense.bills,
        }
    }

    /// What this record contributes to the ledger while it exists.
    pub fn effect(&self) -> StockDelta {
        match self {
            MovementRecord::Deposit(deposit) => StockDelta::credit(&deposit.bills),
            MovementRecord::Expense(expense) => StockDelta::debit(&expense.bills),
        }
    }

    /// The delta that undoes [`MovementRecord::effect`].
    pub fn reversal(&self) -> StockDelta {
        self.effect().negated()
    }
}

impl From<Deposit> for MovementRecord {
    fn from(deposit: Deposit) -> Self {
        MovementRecord::Deposit(deposit)
    }
}

impl From<Expense> for MovementRecord {
    fn from(expense: Expense) -> Self {
        MovementRecord::Expense(expense)
    }
}

/// Net effect of a set of records on an initially empty drawer.
///
/// ## Example
/// ```rust
/// use caja_core::{net_effect, BillBundle, Denomination, Deposit, MovementRecord};
///
/// let records: Vec<MovementRecord> = vec![
///     Deposit::new(BillBundle::from_counts([(50, 4)]).unwrap()).into(),
///     Deposit::new(BillBundle::from_counts([(50, 1)]).unwrap()).into(),
/// ];
/// assert_eq!(net_effect(&records).change(Denomination::new(50).unwrap()), 5);
/// ```
pub fn net_effect<'a, I>(records: I) -> StockDelta
where
    I: IntoIterator<Item = &'a MovementRecord>,
{
    records
        .into_iter()
        .fold(StockDelta::new(), |total, record| total.then(record.effect()))
}

/// Generates a new movement id.
pub fn generate_movement_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Denomination;

    fn bills(pairs: &[(i64, i64)]) -> BillBundle {
        BillBundle::from_counts(pairs.iter().copied()).unwrap()
    }

    fn sample_expense() -> Expense {
        Expense::new(NewExpense {
            payee: "  Papeleria  ".to_string(),
            description: "toner".to_string(),
            declared_amount: 350,
            bills: bills(&[(200, 2)]),
        })
    }

    #[test]
    fn test_effect_signs() {
        let deposit: MovementRecord = Deposit::new(bills(&[(100, 2)])).into();
        let expense: MovementRecord = sample_expense().into();
        let hundred = Denomination::new(100).unwrap();
        let two_hundred = Denomination::new(200).unwrap();

        assert_eq!(deposit.effect().change(hundred), 2);
        assert_eq!(deposit.reversal().change(hundred), -2);
        assert_eq!(expense.effect().change(two_hundred), -2);
        assert_eq!(expense.reversal().change(two_hundred), 2);
    }

    #[test]
    fn test_expense_keeps_declared_amount_independent() {
        let expense = sample_expense();
        assert_eq!(expense.payee, "Papeleria");
        assert_eq!(expense.declared_amount, 350);
        assert_eq!(expense.bills.total_value(), 400);
        assert_eq!(expense.unreconciled(), -50);
    }

    #[test]
    fn test_new_expense_validation() {
        let mut input = NewExpense {
            payee: "x".to_string(),
            description: String::new(),
            declared_amount: -1,
            bills: BillBundle::new(),
        };
        assert!(input.validate().is_err());

        input.declared_amount = 0;
        assert!(input.validate().is_ok());

        input.payee = "p".repeat(101);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_expense_edit_keeps_unsupplied_fields() {
        let original = sample_expense();
        let edited = ExpenseEdit::bills(bills(&[(100, 4)])).apply_to(&original);

        assert_eq!(edited.id, original.id);
        assert_eq!(edited.payee, original.payee);
        assert_eq!(edited.description, original.description);
        assert_eq!(edited.declared_amount, 350);
        assert_eq!(edited.bills, bills(&[(100, 4)]));

        let renamed = ExpenseEdit {
            bills: bills(&[(100, 4)]),
            payee: Some("Otro".to_string()),
            declared_amount: Some(400),
            ..ExpenseEdit::default()
        }
        .apply_to(&original);
        assert_eq!(renamed.payee, "Otro");
        assert_eq!(renamed.declared_amount, 400);
        assert_eq!(renamed.description, "toner");
    }

    #[test]
    fn test_record_serializes_with_kind_tag() {
        let record: MovementRecord = Deposit::new(bills(&[(5, 1)])).into();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "deposit");
        assert_eq!(json["bills"]["5"], 1);
    }
}
