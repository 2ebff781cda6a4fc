use chrono::NaiveDate;

use crate::amounts::amount_text;
use crate::models::{Expense, Tables};

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Earliest to latest dated expense, or `[today, today]` when no expense
    /// carries a date.
    pub fn covering(expenses: &[Expense], today: NaiveDate) -> Self {
        let mut dates = expenses.iter().filter_map(|e| e.expense_date);
        match dates.next() {
            Some(first) => {
                let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
                Self::new(min, max)
            }
            None => Self::new(today, today),
        }
    }

    /// Use the given bounds, filling whichever is missing from `covering`.
    pub fn with_bounds(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        expenses: &[Expense],
        today: NaiveDate,
    ) -> Self {
        let default = Self::covering(expenses, today);
        Self::new(from.unwrap_or(default.start), to.unwrap_or(default.end))
    }
}

/// User-selected narrowing of the expense list. `None` for company or status
/// means "all".
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFilter {
    pub search: String,
    pub company: Option<String>,
    pub status: Option<String>,
    pub range: DateRange,
}

impl ExpenseFilter {
    pub fn new(range: DateRange) -> Self {
        Self {
            search: String::new(),
            company: None,
            status: None,
            range,
        }
    }

    pub fn describe(&self) -> String {
        let mut parts = vec![format!("{} to {}", self.range.start, self.range.end)];
        if !self.search.is_empty() {
            parts.push(format!("search: \"{}\"", self.search));
        }
        if let Some(company) = &self.company {
            parts.push(format!("company: {company}"));
        }
        if let Some(status) = &self.status {
            parts.push(format!("status: {status}"));
        }
        parts.join(", ")
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Case-insensitive substring match on expense number, raw amount text or the
/// canonical amount text. Missing values never match.
pub fn matches_search(expense: &Expense, needle_lower: &str) -> bool {
    contains_ci(&expense.expense_number, needle_lower)
        || expense
            .amount_raw
            .as_deref()
            .is_some_and(|raw| contains_ci(raw, needle_lower))
        || expense
            .amount
            .is_some_and(|a| contains_ci(&amount_text(a), needle_lower))
}

/// Apply date range, search, company and status filters in that order.
pub fn filter_expenses(tables: &Tables, filter: &ExpenseFilter) -> Vec<Expense> {
    let mut rows: Vec<&Expense> = tables
        .expenses
        .iter()
        .filter(|e| e.expense_date.is_some_and(|d| filter.range.contains(d)))
        .collect();

    if !filter.search.is_empty() {
        let needle = filter.search.to_lowercase();
        rows.retain(|e| matches_search(e, &needle));
    }

    if let Some(name) = &filter.company {
        match tables.company_id(name) {
            Some(id) => rows.retain(|e| e.company_id == Some(id)),
            None => rows.clear(),
        }
    }

    if let Some(status) = &filter.status {
        rows.retain(|e| e.status.as_deref() == Some(status.as_str()));
    }

    rows.into_iter().cloned().collect()
}
