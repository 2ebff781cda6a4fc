pub mod postgres;
pub mod sqlite;

use rust_decimal::Decimal;
use tracing::info;

use crate::error::{Result, TillError};
use crate::models::{NewExpense, Tables};
use crate::settings::{PgConfig, Settings};

pub use postgres::PgStore;
pub use sqlite::SqliteStore;

/// Read/write access to the companies, expenses and sales tables.
///
/// Every mutation is a single parameterized statement that has committed by
/// the time the call returns.
pub trait Store {
    /// Short backend name for status output.
    fn backend(&self) -> &'static str;

    /// Create the three tables if they do not exist.
    fn init_schema(&self) -> Result<()>;

    /// Companies ordered by name, expenses by id, sales by (year, month).
    fn load_all(&self) -> Result<Tables>;

    /// Insert a company unless one with the same name exists. Returns whether
    /// a row was added; a duplicate is not an error.
    fn insert_company(&self, name: &str) -> Result<bool>;

    /// Append an expense (duplicate expense numbers allowed) and return its id.
    fn insert_expense(&self, expense: &NewExpense) -> Result<i64>;

    /// Insert or replace the sales figure for `(month, year)`.
    fn upsert_sale(&self, month: u32, year: i32, amount: Decimal) -> Result<()>;
}

pub(crate) fn validate_period(month: u32, year: i32) -> Result<()> {
    if (1..=12).contains(&month) && year > 0 {
        Ok(())
    } else {
        Err(TillError::InvalidPeriod { month, year })
    }
}

/// Open the configured store and make sure its schema exists. PostgreSQL is
/// used when `PGHOST` is set, otherwise `<data_dir>/till.db`.
pub fn open_store(settings: &Settings) -> Result<Box<dyn Store>> {
    let store: Box<dyn Store> = match PgConfig::from_env()? {
        Some(cfg) => {
            info!(target: "till::db", url = %cfg.describe(), "connecting to PostgreSQL");
            Box::new(PgStore::connect(&cfg)?)
        }
        None => {
            let path = settings.db_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            info!(target: "till::db", path = %path.display(), "opening SQLite store");
            Box::new(SqliteStore::open(&path)?)
        }
    };
    store.init_schema()?;
    Ok(store)
}
