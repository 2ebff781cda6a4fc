use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

/// A recorded outflow. `amount` is `None` when the entered text could not be
/// read as a number; that is kept distinct from a zero amount.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub expense_number: String,
    pub amount: Option<Decimal>,
    pub amount_raw: Option<String>,
    pub company_id: Option<i64>,
    pub status: Option<String>,
    pub expense_date: Option<NaiveDate>,
    pub month: u32,
    pub year: i32,
}

/// Revenue for one calendar month, unique per `(month, year)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub month: u32,
    pub year: i32,
    pub amount: Decimal,
}

/// Everything the dashboard reads, as loaded in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub companies: Vec<Company>,
    pub expenses: Vec<Expense>,
    pub sales: Vec<Sale>,
}

impl Tables {
    pub fn company_id(&self, name: &str) -> Option<i64> {
        self.companies.iter().find(|c| c.name == name).map(|c| c.id)
    }

    /// Distinct non-empty statuses seen on expenses, sorted.
    pub fn statuses(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .expenses
            .iter()
            .filter_map(|e| e.status.clone())
            .filter(|s| !s.is_empty())
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

/// Insert payload for an expense. Month and year are taken from `date`.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub expense_number: String,
    pub amount: Option<Decimal>,
    pub amount_raw: Option<String>,
    pub company_id: Option<i64>,
    pub status: Option<String>,
    pub date: NaiveDate,
}

impl NewExpense {
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// `"YYYY-MM"` key used to line up expense months with sales.
pub fn period_key(year: i32, month: u32) -> String {
    format!("{year}-{month:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_key_zero_pads_month() {
        assert_eq!(period_key(2024, 1), "2024-01");
        assert_eq!(period_key(2024, 12), "2024-12");
    }

    #[test]
    fn test_new_expense_derives_month_and_year() {
        let e = NewExpense {
            expense_number: "E-1".into(),
            amount: Some(Decimal::TEN),
            amount_raw: Some("10".into()),
            company_id: None,
            status: None,
            date: NaiveDate::from_ymd_opt(2023, 11, 30).unwrap(),
        };
        assert_eq!(e.month(), 11);
        assert_eq!(e.year(), 2023);
    }

    #[test]
    fn test_statuses_are_distinct_and_sorted() {
        let mk = |id, status: Option<&str>| Expense {
            id,
            expense_number: format!("E-{id}"),
            amount: None,
            amount_raw: None,
            company_id: None,
            status: status.map(String::from),
            expense_date: None,
            month: 1,
            year: 2024,
        };
        let tables = Tables {
            expenses: vec![mk(1, Some("unpaid")), mk(2, Some("paid")), mk(3, None), mk(4, Some("paid"))],
            ..Default::default()
        };
        assert_eq!(tables.statuses(), vec!["paid".to_string(), "unpaid".to_string()]);
    }
}
