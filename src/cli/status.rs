use crate::books::Books;
use crate::error::Result;
use crate::settings::{load_settings, PgConfig};

pub fn run() -> Result<()> {
    let settings = load_settings();

    println!(
        "Cafe:       {}",
        if settings.cafe_name.is_empty() { "(not set)" } else { &settings.cafe_name }
    );
    println!("Data dir:   {}", settings.data_dir);
    match PgConfig::from_env()? {
        Some(pg) => println!("Database:   {}", pg.describe()),
        None => {
            let db_path = settings.db_path();
            if !db_path.exists() {
                println!();
                println!("Database not found. Run `till init` to set up.");
                return Ok(());
            }
            println!("Database:   {}", db_path.display());
        }
    }
    println!("Statuses:   paid = {}, unpaid = {}", settings.paid_status, settings.unpaid_status);
    println!("Cache TTL:  {}s", settings.cache_ttl_secs);

    let mut books = Books::open(&settings)?;
    let backend = books.backend();
    let tables = books.tables()?;
    let undated = tables.expenses.iter().filter(|e| e.expense_date.is_none()).count();
    let missing = tables.expenses.iter().filter(|e| e.amount.is_none()).count();

    println!();
    println!("Backend:    {backend}");
    println!("Companies:  {}", tables.companies.len());
    println!("Expenses:   {}", tables.expenses.len());
    println!("  undated:    {undated}");
    println!("  no amount:  {missing}");
    println!("Sales:      {}", tables.sales.len());
    Ok(())
}
