//! # Seed Data Generator
//!
//! Populates the database with sample drawer movements for development.
//!
//! ## Usage
//! ```bash
//! # 200 deposits (default), each followed by an occasional expense
//! cargo run -p caja-db --bin seed
//!
//! # Custom amount
//! cargo run -p caja-db --bin seed -- --deposits 1000
//!
//! # Specify database path
//! cargo run -p caja-db --bin seed -- --db ./data/caja.db
//! ```
//!
//! ## Generated Movements
//! - Deposits of 1 to 4 denominations, 1 to 12 pieces each
//! - Every third deposit is followed by an expense paid with the bills the
//!   greedy suggestion picks for a pseudo-random amount
//!
//! Values are derived from the loop index, so two runs on empty databases
//! produce the same drawer.

use std::env;

use caja_core::{BillBundle, NewExpense, DENOMINATIONS};
use caja_db::{Database, DbConfig};

/// Sample payees and what they were paid for.
const PAYEES: &[(&str, &str)] = &[
    ("Papeleria Lupita", "hojas y toner"),
    ("Gas del Valle", "tanque de 30 kg"),
    ("Agua Purificada", "garrafones"),
    ("Ferreteria Central", "focos y cinta"),
    ("Limpieza Express", "productos de limpieza"),
    ("Taxi", "envio de documentos"),
    ("Mercado", "cafe y azucar"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut deposits: usize = 200;
    let mut db_path = String::from("./caja_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--deposits" | "-n" => {
                if i + 1 < args.len() {
                    deposits = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Caja Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --deposits <N>  Number of deposits to generate (default: 200)");
                println!("  -d, --db <PATH>     Database file path (default: ./caja_dev.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Caja Seed Data Generator");
    println!("========================");
    println!("Database: {}", db_path);
    println!("Deposits: {}", deposits);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let movements = db.movements();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = movements.count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} movements", existing);
        println!("  Skipping seed to avoid mixing sample and real data.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating movements...");

    let start = std::time::Instant::now();
    let mut created_deposits = 0;
    let mut created_expenses = 0;

    for seed in 0..deposits {
        let bills = generate_bundle(seed)?;
        if let Err(e) = movements.create_deposit(bills).await {
            eprintln!("Failed to create deposit {}: {}", seed, e);
            continue;
        }
        created_deposits += 1;

        if seed % 3 == 2 {
            let amount = 37 + ((seed * 131) % 1900) as i64;
            let bills = db.ledger().suggest(amount).await?;
            if bills.is_empty() {
                continue;
            }

            let (payee, description) = PAYEES[seed % PAYEES.len()];
            let expense = NewExpense {
                payee: payee.to_string(),
                description: description.to_string(),
                declared_amount: amount,
                bills,
            };

            match movements.create_expense(expense).await {
                Ok(_) => created_expenses += 1,
                Err(e) => eprintln!("Failed to create expense {}: {}", seed, e),
            }
        }

        if created_deposits % 50 == 0 {
            println!("  Generated {} deposits...", created_deposits);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} deposits and {} expenses in {:?}",
        created_deposits, created_expenses, elapsed
    );

    println!();
    println!("Verifying ledger...");
    let discrepancies = movements.check_consistency().await?;
    println!("  Drawer total: {}", db.ledger().total_value().await?);
    println!("  Discrepancies: {}", discrepancies.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a deterministic deposit bundle for the given index.
///
/// Offsets `k * 3` are distinct modulo the set size, so no denomination
/// repeats within a bundle.
fn generate_bundle(seed: usize) -> Result<BillBundle, caja_core::ValidationError> {
    let kinds = 1 + seed % 4;
    BillBundle::from_counts((0..kinds).map(|k| {
        let denomination = DENOMINATIONS[(seed * 7 + k * 3) % DENOMINATIONS.len()];
        let count = 1 + ((seed * 13 + k * 5) % 12) as i64;
        (denomination, count)
    }))
}
