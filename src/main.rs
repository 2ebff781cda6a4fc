mod amounts;
mod books;
mod cache;
mod cli;
mod db;
mod error;
mod filters;
mod fmt;
mod logging;
mod models;
mod reports;
mod settings;
mod tui;

use clap::Parser;

use cli::{Cli, Commands, CompaniesCommands, ExpensesCommands, SalesCommands};

fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::dashboard::run(cli::FilterArgs::default()),
        Some(Commands::Init { data_dir }) => cli::init::run(data_dir),
        Some(Commands::Companies { command }) => match command {
            CompaniesCommands::Add { name } => cli::companies::add(&name),
            CompaniesCommands::List => cli::companies::list(),
        },
        Some(Commands::Expenses { command }) => match command {
            ExpensesCommands::Add {
                number,
                amount_raw,
                amount,
                company,
                status,
                date,
            } => cli::expenses::add(cli::expenses::AddArgs {
                number,
                amount_raw,
                amount,
                company,
                status,
                date,
            }),
            ExpensesCommands::Statuses => cli::expenses::statuses(),
        },
        Some(Commands::Sales { command }) => match command {
            SalesCommands::Set { amount, month, year } => cli::sales::set(month, year, amount),
            SalesCommands::List => cli::sales::list(),
        },
        Some(Commands::Report { command }) => cli::report::dispatch(command),
        Some(Commands::Export {
            filters,
            output_dir,
        }) => cli::export::run(filters, output_dir),
        Some(Commands::Dashboard { filters }) => cli::dashboard::run(filters),
        Some(Commands::Status) => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
