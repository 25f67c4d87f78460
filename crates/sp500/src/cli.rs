use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Sets the level of tracing.
    ///
    /// Without it, a plain summary is printed instead of log lines.
    #[arg(short, long)]
    pub trace: Option<TraceLevel>,

    /// Scrape the table without touching the database.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the scraped companies as JSON (only with `--dry-run`).
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Replace the table even when no companies were scraped.
    ///
    /// By default an empty scrape (e.g. the page could not be fetched) leaves the table as
    /// it is.
    #[arg(long)]
    pub allow_empty: bool,

    /// Scrape a page other than the Wikipedia list of S&P 500 companies.
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments() {
        let cli = Cli::try_parse_from(["sp500"]).unwrap();
        assert_eq!(cli.trace, None);
        assert!(!cli.dry_run);
        assert!(!cli.allow_empty);
        assert_eq!(cli.url, None);
    }

    #[test]
    fn trace_level() {
        let cli = Cli::try_parse_from(["sp500", "--trace", "DEBUG"]).unwrap();
        assert_eq!(cli.trace, Some(TraceLevel::DEBUG));
    }

    #[test]
    fn json_requires_dry_run() {
        assert!(Cli::try_parse_from(["sp500", "--json"]).is_err());
        assert!(Cli::try_parse_from(["sp500", "--dry-run", "--json"]).is_ok());
    }
}
