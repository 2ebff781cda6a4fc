use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::{validate_period, Store};
use crate::error::{Result, TillError};
use crate::models::{Company, Expense, NewExpense, Sale, Tables};
use crate::settings::{PgConfig, SslMode};

pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS companies (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS expenses (
        id SERIAL PRIMARY KEY,
        expense_number TEXT NOT NULL,
        amount NUMERIC,
        amount_raw TEXT,
        company_id INTEGER REFERENCES companies(id),
        status TEXT,
        expense_date DATE,
        month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
        year INTEGER NOT NULL CHECK (year > 0)
    )",
    "CREATE TABLE IF NOT EXISTS sales (
        month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
        year INTEGER NOT NULL CHECK (year > 0),
        amount NUMERIC NOT NULL,
        PRIMARY KEY (month, year)
    )",
];

type ExpenseRow = (
    i64,
    String,
    Option<Decimal>,
    Option<String>,
    Option<i64>,
    Option<String>,
    Option<NaiveDate>,
    i32,
    i32,
);

/// PostgreSQL-backed store. Queries run on a private current-thread runtime
/// so callers stay synchronous.
pub struct PgStore {
    pool: PgPool,
    rt: Runtime,
}

pub(crate) fn pg_ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Allow => PgSslMode::Allow,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
        SslMode::VerifyCa => PgSslMode::VerifyCa,
        SslMode::VerifyFull => PgSslMode::VerifyFull,
    }
}

fn connect_options(cfg: &PgConfig) -> PgConnectOptions {
    let mut opts = PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .ssl_mode(pg_ssl_mode(cfg.ssl_mode));
    if let Some(db) = &cfg.database {
        opts = opts.database(db);
    }
    if let Some(user) = &cfg.user {
        opts = opts.username(user);
    }
    if let Some(password) = &cfg.password {
        opts = opts.password(password);
    }
    opts
}

fn month_from_db(month: i32) -> Result<u32> {
    u32::try_from(month).map_err(|_| TillError::Other(format!("stored month out of range: {month}")))
}

impl PgStore {
    pub fn connect(cfg: &PgConfig) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let pool = rt.block_on(
            PgPoolOptions::new()
                .max_connections(2)
                .acquire_timeout(Duration::from_secs(10))
                .connect_with(connect_options(cfg)),
        )?;
        info!(target: "till::db", url = %cfg.describe(), "connected");
        Ok(Self { pool, rt })
    }
}

impl Drop for PgStore {
    fn drop(&mut self) {
        self.rt.block_on(self.pool.close());
    }
}

impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn init_schema(&self) -> Result<()> {
        self.rt.block_on(async {
            for stmt in SCHEMA {
                sqlx::query(stmt).execute(&self.pool).await?;
            }
            Ok::<_, TillError>(())
        })
    }

    fn load_all(&self) -> Result<Tables> {
        self.rt.block_on(async {
            let companies = sqlx::query_as::<_, (i64, String)>(
                "SELECT id::int8, name FROM companies ORDER BY name",
            )
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|(id, name)| Company { id, name })
            .collect();

            let expenses = sqlx::query_as::<_, ExpenseRow>(
                "SELECT id::int8, expense_number, amount, amount_raw, company_id::int8, \
                 status, expense_date, month, year FROM expenses ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| {
                Ok(Expense {
                    id: row.0,
                    expense_number: row.1,
                    amount: row.2,
                    amount_raw: row.3,
                    company_id: row.4,
                    status: row.5,
                    expense_date: row.6,
                    month: month_from_db(row.7)?,
                    year: row.8,
                })
            })
            .collect::<Result<Vec<_>>>()?;

            let sales = sqlx::query_as::<_, (i32, i32, Decimal)>(
                "SELECT month, year, amount FROM sales ORDER BY year, month",
            )
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|(month, year, amount)| {
                Ok(Sale {
                    month: month_from_db(month)?,
                    year,
                    amount,
                })
            })
            .collect::<Result<Vec<_>>>()?;

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
            Ok::<_, TillError>(tables)
        })
    }

    fn insert_company(&self, name: &str) -> Result<bool> {
        let done = self.rt.block_on(
            sqlx::query("INSERT INTO companies (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(name)
                .execute(&self.pool),
        )?;
        let inserted = done.rows_affected() > 0;
        info!(target: "till::db", company = name, inserted, "insert company");
        Ok(inserted)
    }

    fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        validate_period(expense.month(), expense.year())
            .map_err(|_| TillError::InvalidDate(expense.date.to_string()))?;
        let id: i64 = self.rt.block_on(
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO expenses (expense_number, amount, amount_raw, company_id, status, expense_date, month, year) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id::int8",
            )
            .bind(&expense.expense_number)
            .bind(expense.amount)
            .bind(expense.amount_raw.as_deref())
            .bind(expense.company_id)
            .bind(expense.status.as_deref())
            .bind(expense.date)
            .bind(expense.month() as i32)
            .bind(expense.year())
            .fetch_one(&self.pool),
        )?;
        info!(target: "till::db", id, number = %expense.expense_number, "insert expense");
        Ok(id)
    }

    fn upsert_sale(&self, month: u32, year: i32, amount: Decimal) -> Result<()> {
        validate_period(month, year)?;
        self.rt.block_on(
            sqlx::query(
                "INSERT INTO sales (month, year, amount) VALUES ($1, $2, $3) \
                 ON CONFLICT (month, year) DO UPDATE SET amount = EXCLUDED.amount",
            )
            .bind(month as i32)
            .bind(year)
            .bind(amount)
            .execute(&self.pool),
        )?;
        info!(target: "till::db", month, year, %amount, "upsert sale");
        Ok(())
    }
}
