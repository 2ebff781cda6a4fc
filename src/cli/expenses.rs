use colored::Colorize;
use rust_decimal::Decimal;

use crate::amounts::parse_amount;
use crate::books::Books;
use crate::cli::{parse_date, today};
use crate::error::Result;
use crate::fmt::money_opt;
use crate::models::{NewExpense, Tables};
use crate::settings::{load_settings, Settings};

pub struct AddArgs {
    pub number: String,
    pub amount_raw: String,
    pub amount: Option<Decimal>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
}

pub fn add(args: AddArgs) -> Result<()> {
    let settings = load_settings();
    let mut books = Books::open(&settings)?;

    let amount = args.amount.or_else(|| parse_amount(&args.amount_raw));
    let company_id = match &args.company {
        Some(name) => {
            let id = books.company_id(name)?;
            if id.is_none() {
                eprintln!(
                    "{}",
                    format!("Unknown company \"{name}\"; saved without a company.").yellow()
                );
            }
            id
        }
        None => None,
    };
    let date = match &args.date {
        Some(text) => parse_date(text)?,
        None => today(),
    };

    let expense = NewExpense {
        expense_number: args.number.trim().to_string(),
        amount,
        amount_raw: Some(args.amount_raw),
        company_id,
        status: Some(args.status.unwrap_or_else(|| settings.unpaid_status.clone())),
        date,
    };
    let id = books.add_expense(&expense)?;

    println!(
        "Added expense #{id}: {} {} on {}",
        expense.expense_number,
        money_opt(expense.amount),
        expense.date
    );
    if expense.amount.is_none() {
        eprintln!(
            "{}",
            "Amount could not be read; it is excluded from totals.".yellow()
        );
    }
    Ok(())
}

/// Statuses offered when recording an expense: the configured pair first,
/// then any other value already in use.
pub fn status_choices(tables: &Tables, settings: &Settings) -> Vec<String> {
    let mut out = vec![settings.unpaid_status.clone(), settings.paid_status.clone()];
    for status in tables.statuses() {
        if !out.contains(&status) {
            out.push(status);
        }
    }
    out
}

pub fn statuses() -> Result<()> {
    let settings = load_settings();
    let mut books = Books::open(&settings)?;
    for status in status_choices(books.tables()?, &settings) {
        println!("{status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::Expense;

    #[test]
    fn test_status_choices_defaults_first_without_duplicates() {
        let with_status = |id, s: &str| Expense {
            id,
            expense_number: format!("E-{id}"),
            amount: None,
            amount_raw: None,
            company_id: None,
            status: Some(s.to_string()),
            expense_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            month: 1,
            year: 2024,
        };
        let tables = Tables {
            expenses: vec![with_status(1, "paid"), with_status(2, "disputed")],
            ..Default::default()
        };
        let choices = status_choices(&tables, &Settings::default());
        assert_eq!(choices, vec!["unpaid", "paid", "disputed"]);
    }
}
