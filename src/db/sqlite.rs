use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::{validate_period, Store};
use crate::error::{Result, TillError};
use crate::models::{Company, Expense, NewExpense, Sale, Tables};

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS companies (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY,
    expense_number TEXT NOT NULL,
    amount TEXT,
    amount_raw TEXT,
    company_id INTEGER,
    status TEXT,
    expense_date TEXT,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    year INTEGER NOT NULL CHECK (year > 0),
    FOREIGN KEY (company_id) REFERENCES companies(id)
);

CREATE TABLE IF NOT EXISTS sales (
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    year INTEGER NOT NULL CHECK (year > 0),
    amount TEXT NOT NULL,
    PRIMARY KEY (month, year)
);
";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Amounts are kept as decimal text so they load back exactly as written.
fn parse_stored_amount(id: i64, text: Option<String>) -> Option<Decimal> {
    let text = text?;
    match Decimal::from_str(text.trim()) {
        Ok(d) => Some(d),
        Err(_) => {
            warn!(target: "till::db", expense_id = id, value = %text, "unreadable amount");
            None
        }
    }
}

fn decimal_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(text.trim())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_stored_date(id: i64, text: Option<String>) -> Option<NaiveDate> {
    let text = text?;
    // Accept a trailing time component from older rows.
    let day = text.get(..10).unwrap_or(text.as_str());
    match NaiveDate::parse_from_str(day, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            warn!(target: "till::db", expense_id = id, value = %text, "unreadable expense_date");
            None
        }
    }
}

impl Store for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn load_all(&self) -> Result<Tables> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM companies ORDER BY name")?;
        let companies: Vec<Company> = stmt
            .query_map([], |row| {
                Ok(Company {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT id, expense_number, amount, amount_raw, company_id, status, expense_date, month, year \
             FROM expenses ORDER BY id",
        )?;
        let raw: Vec<(Expense, Option<String>, Option<String>)> = stmt
            .query_map([], |row| {
                Ok((
                    Expense {
                        id: row.get(0)?,
                        expense_number: row.get(1)?,
                        amount: None,
                        amount_raw: row.get(3)?,
                        company_id: row.get(4)?,
                        status: row.get(5)?,
                        expense_date: None,
                        month: row.get(7)?,
                        year: row.get(8)?,
                    },
                    row.get(2)?,
                    row.get(6)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let expenses = raw
            .into_iter()
            .map(|(mut e, amount, date)| {
                e.amount = parse_stored_amount(e.id, amount);
                e.expense_date = parse_stored_date(e.id, date);
                e
            })
            .collect();

        let mut stmt = self
            .conn
            .prepare("SELECT month, year, amount FROM sales ORDER BY year, month")?;
        let sales: Vec<Sale> = stmt
            .query_map([], |row| {
                Ok(Sale {
                    month: row.get(0)?,
                    year: row.get(1)?,
                    amount: decimal_column(row, 2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let tables = Tables {
            companies,
            expenses,
            sales,
        };
        debug!(
            target: "till::db",
            companies = tables.companies.len(),
            expenses = tables.expenses.len(),
            sales = tables.sales.len(),
            "loaded tables"
        );
        Ok(tables)
    }

    fn insert_company(&self, name: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "INSERT INTO companies (name) VALUES (?1) ON CONFLICT (name) DO NOTHING",
            params![name],
        )?;
        info!(target: "till::db", company = name, inserted = changed > 0, "insert company");
        Ok(changed > 0)
    }

    fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        validate_period(expense.month(), expense.year())
            .map_err(|_| TillError::InvalidDate(expense.date.to_string()))?;
        self.conn.execute(
            "INSERT INTO expenses (expense_number, amount, amount_raw, company_id, status, expense_date, month, year) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                expense.expense_number,
                expense.amount.map(|a| a.to_string()),
                expense.amount_raw,
                expense.company_id,
                expense.status,
                expense.date.format(DATE_FORMAT).to_string(),
                expense.month(),
                expense.year(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(target: "till::db", id, number = %expense.expense_number, "insert expense");
        Ok(id)
    }

    fn upsert_sale(&self, month: u32, year: i32, amount: Decimal) -> Result<()> {
        validate_period(month, year)?;
        self.conn.execute(
            "INSERT INTO sales (month, year, amount) VALUES (?1, ?2, ?3) \
             ON CONFLICT (month, year) DO UPDATE SET amount = excluded.amount",
            params![month, year, amount.to_string()],
        )?;
        info!(target: "till::db", month, year, %amount, "upsert sale");
        Ok(())
    }
}
