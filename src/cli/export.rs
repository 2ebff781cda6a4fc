use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::report::load_report;
use crate::cli::FilterArgs;
use crate::error::Result;
use crate::reports::DashboardReport;
use crate::settings::{load_settings, resolve_dir};

pub const EXPENSES_FILE: &str = "expenses_filtered.csv";
pub const MONTHLY_FILE: &str = "summary_month.csv";
pub const COMPANIES_FILE: &str = "summary_company.csv";

/// Write the filtered expenses and both summaries under `dir`. The company
/// summary is skipped when empty, and a company file left by an earlier
/// export is removed. Returns the written paths.
pub fn write_csvs(report: &DashboardReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let path = dir.join(EXPENSES_FILE);
    let mut w = csv::Writer::from_path(&path)?;
    w.write_record([
        "id",
        "expense_number",
        "amount",
        "amount_raw",
        "company_id",
        "status",
        "expense_date",
        "month",
        "year",
    ])?;
    for e in &report.expenses {
        w.write_record([
            e.id.to_string(),
            e.expense_number.clone(),
            e.amount.map(|a| a.to_string()).unwrap_or_default(),
            e.amount_raw.clone().unwrap_or_default(),
            e.company_id.map(|id| id.to_string()).unwrap_or_default(),
            e.status.clone().unwrap_or_default(),
            e.expense_date.map(|d| d.to_string()).unwrap_or_default(),
            e.month.to_string(),
            e.year.to_string(),
        ])?;
    }
    w.flush()?;
    written.push(path);

    let path = dir.join(MONTHLY_FILE);
    let mut w = csv::Writer::from_path(&path)?;
    w.write_record(["year", "month", "amount", "period"])?;
    for m in &report.monthly {
        w.write_record([
            m.year.to_string(),
            m.month.to_string(),
            m.amount.to_string(),
            m.period.clone(),
        ])?;
    }
    w.flush()?;
    written.push(path);

    if !report.companies.is_empty() {
        let path = dir.join(COMPANIES_FILE);
        let mut w = csv::Writer::from_path(&path)?;
        w.write_record(["name", "amount"])?;
        for c in &report.companies {
            w.write_record([c.name.clone().unwrap_or_default(), c.amount.to_string()])?;
        }
        w.flush()?;
        written.push(path);
    } else {
        match std::fs::remove_file(dir.join(COMPANIES_FILE)) {
            Ok(()) => debug!(target: "till::export", "removed stale company summary"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    info!(target: "till::export", dir = %dir.display(), files = written.len(), "csv export written");
    Ok(written)
}

pub fn run(filters: FilterArgs, output_dir: Option<String>) -> Result<()> {
    let settings = load_settings();
    let report = load_report(&settings, &filters)?;
    let dir = match output_dir {
        Some(d) => resolve_dir(&d),
        None => PathBuf::from(&settings.data_dir).join("exports"),
    };
    for path in write_csvs(&report, &dir)? {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::filters::{DateRange, ExpenseFilter};
    use crate::models::{Company, Expense, Tables};
    use crate::reports::build_report;

    fn tables(with_company: bool) -> Tables {
        Tables {
            companies: vec![Company { id: 1, name: "Almarai".into() }],
            expenses: vec![
                Expense {
                    id: 1,
                    expense_number: "INV-1".into(),
                    amount: Some(Decimal::from_str("12.5").unwrap()),
                    amount_raw: Some("12.5 SAR".into()),
                    company_id: with_company.then_some(1),
                    status: Some("paid".into()),
                    expense_date: NaiveDate::from_ymd_opt(2024, 3, 2),
                    month: 3,
                    year: 2024,
                },
                Expense {
                    id: 2,
                    expense_number: "INV-2".into(),
                    amount: None,
                    amount_raw: None,
                    company_id: None,
                    status: None,
                    expense_date: NaiveDate::from_ymd_opt(2024, 3, 9),
                    month: 3,
                    year: 2024,
                },
            ],
            sales: vec![],
        }
    }

    fn filter() -> ExpenseFilter {
        ExpenseFilter::new(DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        ))
    }

    #[test]
    fn test_write_csvs_contents() {
        let dir = tempfile::tempdir().unwrap();
        let report = build_report(&tables(true), &filter(), "paid");
        let written = write_csvs(&report, dir.path()).unwrap();
        assert_eq!(written.len(), 3);

        let expenses = std::fs::read_to_string(dir.path().join(EXPENSES_FILE)).unwrap();
        let lines: Vec<&str> = expenses.lines().collect();
        assert_eq!(
            lines[0],
            "id,expense_number,amount,amount_raw,company_id,status,expense_date,month,year"
        );
        assert_eq!(lines[1], "1,INV-1,12.5,12.5 SAR,1,paid,2024-03-02,3,2024");
        assert_eq!(lines[2], "2,INV-2,,,,,2024-03-09,3,2024");

        let monthly = std::fs::read_to_string(dir.path().join(MONTHLY_FILE)).unwrap();
        assert_eq!(monthly, "year,month,amount,period\n2024,3,12.5,2024-03\n");

        let companies = std::fs::read_to_string(dir.path().join(COMPANIES_FILE)).unwrap();
        assert_eq!(companies, "name,amount\nAlmarai,12.5\n");
    }

    #[test]
    fn test_company_file_skipped_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let report = build_report(&tables(false), &filter(), "paid");
        let written = write_csvs(&report, dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(!dir.path().join(COMPANIES_FILE).exists());
    }

    #[test]
    fn test_second_export_without_companies_clears_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = build_report(&tables(true), &filter(), "paid");
        assert_eq!(write_csvs(&first, dir.path()).unwrap().len(), 3);
        assert!(dir.path().join(COMPANIES_FILE).exists());

        let second = build_report(&tables(false), &filter(), "paid");
        let written = write_csvs(&second, dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(!dir.path().join(COMPANIES_FILE).exists());
    }
}
