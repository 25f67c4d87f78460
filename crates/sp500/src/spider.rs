use crate::cli::Cli;
use sp500_spider::company::{Company, StoredCompany};
use sp500_spider::pg::{Database, DbConfig};
use sp500_spider::store;
use sp500_spider::wiki::WikiScraper;
use tracing::{debug, info, warn};

/// Scrape the constituents table and replace `companies.sp500_companies` with it.
pub(crate) async fn run(cli: &Cli, tui: bool) -> anyhow::Result<()> {
    let time = std::time::Instant::now();

    // 1. scrape
    let scraper = match &cli.url {
        Some(url) => WikiScraper::with_url(url.as_str())?,
        None => WikiScraper::new()?,
    };
    let companies = scraper.scrape_table().await?;
    info!("scraped {} companies from {}", companies.len(), scraper.url());
    // keep stdout parseable when printing JSON
    if tui && !cli.json {
        println!("Scraped {} companies from S&P 500", companies.len());
    }

    if cli.dry_run {
        return print_scraped(&companies, cli.json);
    }

    if companies.is_empty() && !cli.allow_empty {
        warn!("no companies scraped; leaving companies.sp500_companies untouched");
        anyhow::bail!("no companies scraped from {}", scraper.url());
    }

    // 2. persist
    let config = DbConfig::from_env()?;
    debug!("database config: {config:?}");
    let db = Database::new(config);
    let stored = db
        .scoped(async |pg_client| store::save(pg_client, &companies, tui).await)
        .await?;

    info!(
        "saved {} companies, {} rows in companies.sp500_companies, time elapsed: {:?}",
        companies.len(),
        stored.len(),
        time.elapsed()
    );
    if tui {
        print_stored(&stored);
        println!("Saved {} companies to the database", companies.len());
    }

    Ok(())
}

fn print_scraped(companies: &[Company], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(companies)?);
    } else {
        for company in companies {
            println!(
                "{:<6} {:<40} {:<24} {}",
                company.ticker, company.name, company.gcis_sector, company.cik
            );
        }
    }
    Ok(())
}

fn print_stored(stored: &[StoredCompany]) {
    for row in stored {
        let company = &row.company;
        println!(
            "{:>4} {:<6} {:<40} {:<24} {:<32} {:<32} {:<12} {:<10} {}",
            row.id,
            company.ticker,
            company.name,
            company.gcis_sector,
            company.gcis_subsector,
            company.hq_location.as_deref().unwrap_or("-"),
            company.date_added,
            company.cik,
            company.year_founded
        );
    }
}
