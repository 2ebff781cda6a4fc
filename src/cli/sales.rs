use chrono::Datelike;
use comfy_table::{Cell, CellAlignment, Table};
use rust_decimal::Decimal;

use crate::books::Books;
use crate::cli::today;
use crate::error::Result;
use crate::fmt::money;
use crate::models::period_key;
use crate::settings::load_settings;

pub fn set(month: u32, year: Option<i32>, amount: Decimal) -> Result<()> {
    let settings = load_settings();
    let mut books = Books::open(&settings)?;
    let year = year.unwrap_or_else(|| today().year());
    books.set_sale(month, year, amount)?;
    println!("Sales for {}: {}", period_key(year, month), money(amount));
    Ok(())
}

pub fn list() -> Result<()> {
    let settings = load_settings();
    let mut books = Books::open(&settings)?;
    let tables = books.tables()?;

    let mut table = Table::new();
    table.set_header(vec!["Period", "Sales"]);
    for sale in &tables.sales {
        table.add_row(vec![
            Cell::new(period_key(sale.year, sale.month)),
            Cell::new(money(sale.amount)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("Monthly sales\n{table}");
    Ok(())
}
