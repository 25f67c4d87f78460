mod sql;

use crate::company::{Company, StoredCompany};
use crate::http::*;
use crate::{tui, Result};
use futures::{stream, StreamExt};
use tracing::{debug, error, info, trace};

/// Replace the contents of `companies.sp500_companies` with `companies`, then read the table
/// back.
///
/// The table (and its schema) is created when missing. The delete and every insert share
/// one transaction, so on failure the previous contents are kept and the error is
/// returned; nothing is committed until all rows are in.
pub async fn save(
    pg_client: &mut PgClient,
    companies: &[Company],
    tui: bool,
) -> Result<Vec<StoredCompany>> {
    let time = std::time::Instant::now();

    create_table(pg_client).await?;

    // preprocess pg query as transaction
    let query = pg_client.prepare(sql::INSERT_COMPANY).await?;
    let transaction = pg_client.transaction().await?;

    let deleted = transaction
        .execute(sql::DELETE_COMPANIES, &[])
        .await
        .map_err(|err| {
            error!("failed to clear companies.sp500_companies, error({err})");
            err
        })?;
    debug!("{deleted} rows deleted from companies.sp500_companies");

    // iterate over the companies and execute pg rows
    let pb = tui::progress_bar(companies.len(), "inserting", tui)?;
    let mut stream = stream::iter(companies);
    while let Some(company) = stream.next().await {
        transaction
            .execute(
                &query,
                &[
                    &company.ticker,
                    &company.name,
                    &company.gcis_sector,
                    &company.gcis_subsector,
                    &company.hq_location,
                    &company.date_added,
                    &company.cik,
                    &company.year_founded,
                ],
            )
            .await
            .map_err(|err| {
                error!(
                    "failed to insert [{}] {}, error({err})",
                    &company.ticker, &company.name
                );
                err
            })?;
        trace!("inserted [{}] {}", &company.ticker, &company.name);
        pb.inc(1);
    }
    pb.finish_and_clear();

    transaction.commit().await.map_err(|err| {
        error!("failed to commit transaction for companies.sp500_companies, error({err})");
        err
    })?;

    info!(
        "saved {} companies to companies.sp500_companies, {}",
        companies.len(),
        crate::time_elapsed(time)
    );

    load(pg_client).await
}

/// Every row of `companies.sp500_companies`, in insertion order.
pub async fn load(pg_client: &PgClient) -> Result<Vec<StoredCompany>> {
    let stored: Vec<StoredCompany> = pg_client
        .query(sql::SELECT_COMPANIES, &[])
        .await
        .map_err(|err| {
            error!("failed to fetch companies.sp500_companies, error({err})");
            err
        })?
        .iter()
        .map(StoredCompany::try_from)
        .collect::<core::result::Result<Vec<_>, tokio_postgres::Error>>()
        .map_err(|err| {
            error!("failed to read a row of companies.sp500_companies, error({err})");
            err
        })?;
    debug!("{} rows read from companies.sp500_companies", stored.len());

    Ok(stored)
}

/// Create the `companies` schema and the `sp500_companies` table when missing.
pub async fn create_table(pg_client: &PgClient) -> Result<()> {
    pg_client
        .batch_execute(sql::CREATE_COMPANIES)
        .await
        .map_err(|err| {
            error!("failed to create companies.sp500_companies, error({err})");
            err
        })?;
    trace!("companies.sp500_companies exists");

    Ok(())
}
