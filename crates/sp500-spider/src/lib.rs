mod error;
mod tui;

pub use error::{Error, Result};

/// The company record scraped from the constituents table, and its stored counterpart.
pub mod company;

/// PostgreSQL connection management; one connection per unit of work.
pub mod pg;

/// Full-replace persistence of the scraped companies into `companies.sp500_companies`.
pub mod store;

/// The [List of S&P 500 companies] page on Wikipedia.
///
/// [List of S&P 500 companies]: https://en.wikipedia.org/wiki/List_of_S%26P_500_companies
pub mod wiki;

/// Shortcut for required API elements.
pub mod http {
    pub use dotenv::var;
    pub use reqwest::Client as HttpClient;
    pub use tokio_postgres::Client as PgClient;
}

/// Format the time elapsed since `time` for log lines.
pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:?}", time.elapsed())
}
