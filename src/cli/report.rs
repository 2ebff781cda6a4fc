use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};
use rust_decimal::Decimal;

use crate::books::Books;
use crate::cli::{today, FilterArgs, ReportCommands};
use crate::error::Result;
use crate::fmt::{money, money_opt};
use crate::reports::{self, DashboardReport};
use crate::settings::{load_settings, Settings};

/// Load through the cache and run the full pipeline for the given flags.
pub fn load_report(settings: &Settings, filters: &FilterArgs) -> Result<DashboardReport> {
    let mut books = Books::open(settings)?;
    let tables = books.tables()?;
    let filter = filters.to_filter(tables, today())?;
    Ok(reports::build_report(tables, &filter, &settings.paid_status))
}

/// Prepend cafe name and the active filter as header lines.
fn with_header(settings: &Settings, report: &DashboardReport, body: String) -> String {
    let filter_line = report.filter.describe().dimmed().to_string();
    if settings.cafe_name.is_empty() {
        format!("{filter_line}\n{body}")
    } else {
        format!("{}\n{filter_line}\n{body}", settings.cafe_name.bold())
    }
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn dispatch(cmd: ReportCommands) -> Result<()> {
    let settings = load_settings();
    let out = match cmd {
        ReportCommands::Expenses { filters } => {
            let report = load_report(&settings, &filters)?;
            with_header(&settings, &report, format_expenses(&report))
        }
        ReportCommands::Summary { filters } => {
            let report = load_report(&settings, &filters)?;
            with_header(&settings, &report, format_summary(&report))
        }
        ReportCommands::Monthly { filters } => {
            let report = load_report(&settings, &filters)?;
            with_header(&settings, &report, format_monthly(&report))
        }
        ReportCommands::Companies { filters, top } => {
            let report = load_report(&settings, &filters)?;
            with_header(&settings, &report, format_companies(&report, top))
        }
    };
    println!("{out}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Plain-text formatters
// ---------------------------------------------------------------------------

pub fn format_expenses(report: &DashboardReport) -> String {
    if report.expenses.is_empty() {
        return "No expenses match.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["Date", "Number", "Company", "Status", "Amount", "As written"]);
    for e in &report.expenses {
        let amount = match e.amount {
            Some(a) => money(a),
            None => "missing".dimmed().to_string(),
        };
        table.add_row(vec![
            Cell::new(e.expense_date.map(|d| d.to_string()).unwrap_or_default()),
            Cell::new(&e.expense_number),
            Cell::new(report.company_name(e.company_id).unwrap_or("")),
            Cell::new(e.status.as_deref().unwrap_or("")),
            right(amount),
            Cell::new(e.amount_raw.as_deref().unwrap_or("")),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        right(money(report.totals.total_spent)),
        Cell::new(""),
    ]);
    format!("Expenses\n{table}")
}

pub fn format_summary(report: &DashboardReport) -> String {
    let t = &report.totals;
    let mut table = Table::new();
    table.set_header(vec!["", "Value"]);
    table.add_row(vec![Cell::new("Total spent"), right(money(t.total_spent))]);
    table.add_row(vec![
        Cell::new("Unpaid"),
        right(money(t.unpaid_total).red().to_string()),
    ]);
    table.add_row(vec![Cell::new("Expenses"), right(t.count.to_string())]);
    table.add_row(vec![Cell::new("Companies"), right(report.companies.len().to_string())]);
    let mut out = format!("Summary\n{table}");
    if t.missing_amounts > 0 {
        out.push_str(&format!(
            "\n{}",
            format!(
                "{} expense(s) have no readable amount and are left out of the totals.",
                t.missing_amounts
            )
            .yellow()
        ));
    }
    out
}

pub fn format_monthly(report: &DashboardReport) -> String {
    if report.vs_sales.is_empty() {
        return "No expenses match.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["Period", "Expenses", "Sales", "Net"]);
    for row in &report.vs_sales {
        let net = match row.amount_sales {
            Some(s) => {
                let n = s - row.amount_expenses;
                if n >= Decimal::ZERO {
                    money(n).green().to_string()
                } else {
                    money(n).red().to_string()
                }
            }
            None => String::new(),
        };
        table.add_row(vec![
            Cell::new(&row.period),
            right(money(row.amount_expenses)),
            right(money_opt(row.amount_sales)),
            right(net),
        ]);
    }
    let mut out = format!("Expenses vs Sales\n{table}");
    if !reports::has_sales(&report.vs_sales) {
        out.push_str(&format!("\n{}", "No sales recorded for these periods.".dimmed()));
    }
    out
}

pub fn format_companies(report: &DashboardReport, top: usize) -> String {
    if report.companies.is_empty() {
        return "No company spend in range.".to_string();
    }
    let total = report.totals.total_spent;
    let mut table = Table::new();
    table.set_header(vec!["Company", "Amount", "%"]);
    for row in report.companies.iter().take(top) {
        let pct = if total > Decimal::ZERO {
            row.amount / total * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        let name = row
            .name
            .clone()
            .unwrap_or_else(|| format!("#{} (removed)", row.company_id));
        table.add_row(vec![
            Cell::new(name),
            right(money(row.amount)),
            right(format!("{pct:.1}%")),
        ]);
    }
    format!("Top Companies\n{table}")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::filters::{DateRange, ExpenseFilter};
    use crate::models::{Company, Expense, Sale, Tables};

    fn report() -> DashboardReport {
        colored::control::set_override(false);
        let e = |id, amount, company_id, month| Expense {
            id,
            expense_number: format!("INV-{id}"),
            amount,
            amount_raw: Some("raw".into()),
            company_id,
            status: Some("unpaid".into()),
            expense_date: NaiveDate::from_ymd_opt(2024, month, 3),
            month,
            year: 2024,
        };
        let tables = Tables {
            companies: vec![
                Company { id: 1, name: "Almarai".into() },
                Company { id: 2, name: "Nadec".into() },
            ],
            expenses: vec![
                e(1, Some(Decimal::from(1200)), Some(1), 1),
                e(2, Some(Decimal::from(300)), Some(2), 1),
                e(3, None, Some(2), 2),
            ],
            sales: vec![Sale { month: 1, year: 2024, amount: Decimal::from(5000) }],
        };
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        );
        reports::build_report(&tables, &ExpenseFilter::new(range), "paid")
    }

    #[test]
    fn test_format_expenses_lists_rows_and_total() {
        let out = format_expenses(&report());
        assert!(out.contains("INV-1"));
        assert!(out.contains("Almarai"));
        assert!(out.contains("missing"));
        assert!(out.contains("1,500.00"));
    }

    #[test]
    fn test_format_summary_flags_missing_amounts() {
        let out = format_summary(&report());
        assert!(out.contains("1,500.00"));
        assert!(out.contains("1 expense(s) have no readable amount"));
    }

    #[test]
    fn test_format_monthly_shows_sales_gap() {
        let out = format_monthly(&report());
        assert!(out.contains("2024-01"));
        assert!(out.contains("5,000.00"));
        assert!(out.contains("3,500.00"));
        assert!(out.contains("2024-02"));
    }

    #[test]
    fn test_format_companies_respects_top() {
        let out = format_companies(&report(), 1);
        assert!(out.contains("Almarai"));
        assert!(!out.contains("Nadec"));
        assert!(out.contains("80.0%"));
    }
}
