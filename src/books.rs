use std::time::Duration;

use rust_decimal::Decimal;
use tracing::debug;

use crate::cache::Cache;
use crate::db::{open_store, Store};
use crate::error::{Result, TillError};
use crate::models::{NewExpense, Tables};
use crate::settings::Settings;

/// The store plus its read cache. All writes go through here so a successful
/// mutation always clears the cache before the next read.
pub struct Books {
    store: Box<dyn Store>,
    cache: Cache,
}

impl Books {
    pub fn new(store: Box<dyn Store>, ttl: Duration) -> Self {
        Self {
            store,
            cache: Cache::new(ttl),
        }
    }

    pub fn open(settings: &Settings) -> Result<Self> {
        Ok(Self::new(open_store(settings)?, settings.cache_ttl()))
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Cached tables, reloading when expired or invalidated.
    pub fn tables(&mut self) -> Result<&Tables> {
        let store = &self.store;
        self.cache.load(|| store.load_all())
    }

    /// Drop the cache and load straight from the store.
    pub fn reload(&mut self) -> Result<&Tables> {
        self.cache.invalidate();
        self.tables()
    }

    /// Last good load, for read-only fallback after a failed reload.
    pub fn last_snapshot(&self) -> Option<&Tables> {
        self.cache.last_snapshot()
    }

    pub fn add_company(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TillError::Other("company name is empty".into()));
        }
        let inserted = self.store.insert_company(name)?;
        self.cache.invalidate();
        Ok(inserted)
    }

    pub fn add_expense(&mut self, expense: &NewExpense) -> Result<i64> {
        if expense.expense_number.trim().is_empty() {
            return Err(TillError::Other("expense number is empty".into()));
        }
        let id = self.store.insert_expense(expense)?;
        self.cache.invalidate();
        Ok(id)
    }

    pub fn set_sale(&mut self, month: u32, year: i32, amount: Decimal) -> Result<()> {
        self.store.upsert_sale(month, year, amount)?;
        self.cache.invalidate();
        Ok(())
    }

    /// Exact-name lookup against the loaded companies.
    pub fn company_id(&mut self, name: &str) -> Result<Option<i64>> {
        let id = self.tables()?.company_id(name);
        debug!(target: "till::books", company = name, ?id, "company lookup");
        Ok(id)
    }
}
