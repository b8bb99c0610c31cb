//! Demo runner for the hotel record store.
//!
//! # Responsibility
//! - Walk through every hotel, customer and reservation operation once.
//! - Own all console output; the core never prints.
//! - Keep going after any failed step.

use clap::Parser;
use hotel_core::db::open_db;
use hotel_core::{
    init_logging, CustomerRepository, JsonFileStore, RecordStore, RepoResult,
    ReservationRepository, SqliteRecordStore, StorageBackend, StorageConfig,
};
use log::info;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "hotel_cli")]
#[command(about = "Runs the hotel reservation demo against a data directory.")]
struct CommandLine {
    /// Directory holding the record collections
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Storage medium: json or sqlite
    #[arg(long, default_value = "json")]
    backend: StorageBackend,
    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long)]
    log_dir: Option<String>,
    #[arg(long, default_value_t = hotel_core::default_log_level().to_string())]
    log_level: String,
}

fn main() -> ExitCode {
    let args = CommandLine::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        if let Err(err) = init_logging(&args.log_level, log_dir) {
            eprintln!("[ERROR] {err}");
            return ExitCode::FAILURE;
        }
    }

    let config = StorageConfig::new(args.data_dir).with_backend(args.backend);
    info!(
        "event=demo_start module=cli status=start backend={} data_dir={}",
        config.backend,
        config.data_dir().display()
    );

    match config.backend {
        StorageBackend::JsonFiles => run_demo(JsonFileStore::from_config(&config)),
        StorageBackend::Sqlite => match open_db(config.sqlite_path()) {
            Ok(conn) => run_demo(SqliteRecordStore::new(&conn)),
            Err(err) => {
                eprintln!("[ERROR] failed to open store: {err}");
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

fn run_demo<S: RecordStore + Clone>(store: S) {
    let reservations = ReservationRepository::new(store.clone());
    let hotels = reservations.hotels();
    let customers = CustomerRepository::new(store);

    println!("=== Hotels ===");
    report("create hotel H1", hotels.create("H1", "Grand Plaza", "New York", 10));
    show("Hotel", hotels.get("H1"));
    report(
        "rename hotel H1",
        hotels.update("H1", [("name", json!("Grand Plaza Updated"))]),
    );
    show("Hotel", hotels.get("H1"));

    println!("\n=== Customers ===");
    report(
        "create customer C1",
        customers.create("C1", "Alice Smith", "alice@example.com", "555-0100"),
    );
    show("Customer", customers.get("C1"));
    report(
        "change phone of C1",
        customers.update("C1", [("phone", json!("555-9999"))]),
    );

    println!("\n=== Reservations ===");
    report(
        "create reservation RES1",
        reservations.create("RES1", "C1", "H1", "2025-06-01", "2025-06-05"),
    );
    show("Hotel", hotels.get("H1"));
    report("cancel reservation RES1", reservations.cancel("RES1"));
    show("Reservation", reservations.get("RES1"));

    println!("\n=== Cleanup ===");
    report("delete hotel H1", hotels.delete("H1"));
    report("delete customer C1", customers.delete("C1"));
}

fn report<T>(step: &str, result: RepoResult<T>) {
    match result {
        Ok(_) => println!("[OK] {step}"),
        Err(err) => println!("[ERROR] {step}: {err}"),
    }
}

fn show<T: Serialize>(title: &str, result: RepoResult<T>) {
    let record = match result {
        Ok(record) => record,
        Err(err) => {
            println!("[ERROR] {err}");
            return;
        }
    };

    println!("--- {title} ---");
    match serde_json::to_value(&record) {
        Ok(Value::Object(fields)) => {
            for (name, value) in fields {
                match value {
                    Value::String(text) => println!("  {name}: {text}"),
                    other => println!("  {name}: {other}"),
                }
            }
        }
        Ok(other) => println!("  {other}"),
        Err(err) => println!("[ERROR] failed to render {title}: {err}"),
    }
}
