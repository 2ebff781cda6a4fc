use comfy_table::{Cell, Table};

use crate::books::Books;
use crate::error::Result;
use crate::settings::load_settings;

pub fn add(name: &str) -> Result<()> {
    let settings = load_settings();
    let mut books = Books::open(&settings)?;
    if books.add_company(name)? {
        println!("Added company: {}", name.trim());
    } else {
        println!("Company already exists: {}", name.trim());
    }
    Ok(())
}

pub fn list() -> Result<()> {
    let settings = load_settings();
    let mut books = Books::open(&settings)?;
    let tables = books.tables()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Expenses"]);
    for company in &tables.companies {
        let count = tables
            .expenses
            .iter()
            .filter(|e| e.company_id == Some(company.id))
            .count();
        table.add_row(vec![
            Cell::new(company.id),
            Cell::new(&company.name),
            Cell::new(count),
        ]);
    }
    println!("Companies\n{table}");
    Ok(())
}
