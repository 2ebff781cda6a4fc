use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::filters::{filter_expenses, ExpenseFilter};
use crate::models::{period_key, Company, Expense, Sale, Tables};

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub total_spent: Decimal,
    /// Sum over rows whose status is anything other than the paid status.
    pub unpaid_total: Decimal,
    pub count: usize,
    /// Rows whose amount could not be read. Excluded from every sum.
    pub missing_amounts: usize,
}

pub fn totals(rows: &[Expense], paid_status: &str) -> Totals {
    let total_spent: Decimal = rows.iter().filter_map(|e| e.amount).sum();
    let unpaid_total: Decimal = rows
        .iter()
        .filter(|e| e.status.as_deref() != Some(paid_status))
        .filter_map(|e| e.amount)
        .sum();
    Totals {
        total_spent,
        unpaid_total,
        count: rows.len(),
        missing_amounts: rows.iter().filter(|e| e.amount.is_none()).count(),
    }
}

// ---------------------------------------------------------------------------
// Monthly summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRow {
    pub year: i32,
    pub month: u32,
    pub period: String,
    pub amount: Decimal,
}

/// Sum per `(year, month)`, ascending.
pub fn monthly_summary(rows: &[Expense]) -> Vec<MonthlyRow> {
    let mut groups: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for e in rows {
        *groups.entry((e.year, e.month)).or_insert(Decimal::ZERO) += e.amount.unwrap_or_default();
    }
    groups
        .into_iter()
        .map(|((year, month), amount)| MonthlyRow {
            year,
            month,
            period: period_key(year, month),
            amount,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Company summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRow {
    pub company_id: i64,
    /// `None` when the id has no matching company row.
    pub name: Option<String>,
    pub amount: Decimal,
}

/// Sum per company id (rows without a company are left out), joined to
/// company names and sorted by amount, largest first. Equal amounts keep
/// ascending id order.
pub fn company_summary(rows: &[Expense], companies: &[Company]) -> Vec<CompanyRow> {
    let mut groups: BTreeMap<i64, Decimal> = BTreeMap::new();
    for e in rows {
        if let Some(id) = e.company_id {
            *groups.entry(id).or_insert(Decimal::ZERO) += e.amount.unwrap_or_default();
        }
    }
    let names: HashMap<i64, &str> = companies.iter().map(|c| (c.id, c.name.as_str())).collect();
    let mut out: Vec<CompanyRow> = groups
        .into_iter()
        .map(|(company_id, amount)| CompanyRow {
            company_id,
            name: names.get(&company_id).map(|n| n.to_string()),
            amount,
        })
        .collect();
    out.sort_by(|a, b| b.amount.cmp(&a.amount));
    out
}

// ---------------------------------------------------------------------------
// Expenses vs sales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SalesJoinRow {
    pub period: String,
    pub amount_expenses: Decimal,
    /// `None` when no sales figure was recorded for the period.
    pub amount_sales: Option<Decimal>,
}

/// Left join of the monthly summary to sales on the period key, in monthly
/// summary order.
pub fn join_sales(monthly: &[MonthlyRow], sales: &[Sale]) -> Vec<SalesJoinRow> {
    let mut by_period: HashMap<String, Decimal> = HashMap::new();
    for s in sales {
        by_period.entry(period_key(s.year, s.month)).or_insert(s.amount);
    }
    monthly
        .iter()
        .map(|m| SalesJoinRow {
            period: m.period.clone(),
            amount_expenses: m.amount,
            amount_sales: by_period.get(&m.period).copied(),
        })
        .collect()
}

/// Whether the sales series has any point to draw.
pub fn has_sales(rows: &[SalesJoinRow]) -> bool {
    rows.iter().any(|r| r.amount_sales.is_some())
}

// ---------------------------------------------------------------------------
// Full dashboard report
// ---------------------------------------------------------------------------

pub struct DashboardReport {
    pub filter: ExpenseFilter,
    pub expenses: Vec<Expense>,
    pub totals: Totals,
    pub monthly: Vec<MonthlyRow>,
    pub companies: Vec<CompanyRow>,
    pub vs_sales: Vec<SalesJoinRow>,
    company_names: HashMap<i64, String>,
}

impl DashboardReport {
    pub fn company_name(&self, id: Option<i64>) -> Option<&str> {
        id.and_then(|id| self.company_names.get(&id)).map(String::as_str)
    }
}

pub fn build_report(tables: &Tables, filter: &ExpenseFilter, paid_status: &str) -> DashboardReport {
    let expenses = filter_expenses(tables, filter);
    let totals = totals(&expenses, paid_status);
    let monthly = monthly_summary(&expenses);
    let companies = company_summary(&expenses, &tables.companies);
    let vs_sales = join_sales(&monthly, &tables.sales);
    DashboardReport {
        filter: filter.clone(),
        expenses,
        totals,
        monthly,
        companies,
        vs_sales,
        company_names: tables.companies.iter().map(|c| (c.id, c.name.clone())).collect(),
    }
}
