pub mod companies;
pub mod dashboard;
pub mod expenses;
pub mod export;
pub mod init;
pub mod report;
pub mod sales;
pub mod status;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::error::{Result, TillError};
use crate::filters::{DateRange, ExpenseFilter};
use crate::models::Tables;

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| TillError::InvalidDate(text.to_string()))
}

fn parse_date_opt(text: &Option<String>) -> Result<Option<NaiveDate>> {
    text.as_deref().map(parse_date).transpose()
}

#[derive(Parser)]
#[command(name = "till", about = "Expense and sales dashboard for a small cafe.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Filter flags shared by reports, exports and the dashboard.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text matched against expense number and amount
    #[arg(long)]
    pub search: Option<String>,
    /// Only expenses for this company (exact name)
    #[arg(long)]
    pub company: Option<String>,
    /// Only expenses with this status (exact match)
    #[arg(long)]
    pub status: Option<String>,
    /// Start date: YYYY-MM-DD (default: earliest expense)
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// End date: YYYY-MM-DD (default: latest expense)
    #[arg(long = "to")]
    pub to_date: Option<String>,
}

impl FilterArgs {
    /// Resolve flags against the loaded tables. Missing date bounds fall back
    /// to the span of recorded expenses.
    pub fn to_filter(&self, tables: &Tables, today: NaiveDate) -> Result<ExpenseFilter> {
        let range = DateRange::with_bounds(
            parse_date_opt(&self.from_date)?,
            parse_date_opt(&self.to_date)?,
            &tables.expenses,
            today,
        );
        Ok(ExpenseFilter {
            search: self.search.clone().unwrap_or_default(),
            company: self.company.clone(),
            status: self.status.clone(),
            range,
        })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up till: choose a data directory and initialize the database.
    Init {
        /// Path for till data (default: ~/Documents/till)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage companies (suppliers).
    Companies {
        #[command(subcommand)]
        command: CompaniesCommands,
    },
    /// Record and inspect expenses.
    Expenses {
        #[command(subcommand)]
        command: ExpensesCommands,
    },
    /// Record monthly sales.
    Sales {
        #[command(subcommand)]
        command: SalesCommands,
    },
    /// Print reports over filtered expenses.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Export filtered expenses and summaries to CSV.
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Directory for the CSV files (default: <data_dir>/exports)
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
    /// Open the interactive dashboard.
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show configuration and row counts.
    Status,
}

#[derive(Subcommand)]
pub enum CompaniesCommands {
    /// Add a company. Existing names are left alone.
    Add {
        /// Company name
        name: String,
    },
    /// List companies.
    List,
}

#[derive(Subcommand)]
pub enum ExpensesCommands {
    /// Record an expense.
    Add {
        /// Expense (voucher) number
        number: String,
        /// Amount as written, e.g. "1,250 SAR"
        #[arg(long = "amount-raw")]
        amount_raw: String,
        /// Numeric amount (default: read from --amount-raw)
        #[arg(long)]
        amount: Option<Decimal>,
        /// Company name
        #[arg(long)]
        company: Option<String>,
        /// Status (default: the configured unpaid status)
        #[arg(long)]
        status: Option<String>,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List the status values to choose from.
    Statuses,
}

#[derive(Subcommand)]
pub enum SalesCommands {
    /// Set the sales total for a month, replacing any previous figure.
    Set {
        /// Sales amount
        amount: Decimal,
        /// Month number, 1-12
        #[arg(long)]
        month: u32,
        /// Year (default: current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// List recorded monthly sales.
    List,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Filtered expense list.
    Expenses {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Totals: spent, unpaid, missing amounts.
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Expenses per month alongside recorded sales.
    Monthly {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Spend per company, largest first.
    Companies {
        #[command(flatten)]
        filters: FilterArgs,
        /// Number of companies to show
        #[arg(long, default_value = "10")]
        top: usize,
    },
}
