use thiserror::Error;

#[derive(Error, Debug)]
pub enum TillError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("PostgreSQL error: {0}")]
    Pg(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid period {year}-{month:02}: month must be 1-12 and year positive")]
    InvalidPeriod { month: u32, year: i32 },

    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TillError>;
