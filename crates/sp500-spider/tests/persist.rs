use sp500_spider::company::{Company, StoredCompany};
use sp500_spider::pg::{Database, DbConfig};
use sp500_spider::{store, Error};
use std::collections::HashMap;
use tokio::sync::Mutex;

// These tests need a live PostgreSQL instance configured through DB_HOST, DB_NAME, DB_USER,
// DB_PASSWORD and DB_PORT; run them with `cargo test -- --ignored`.
//
// Every test rewrites companies.sp500_companies, so they take turns on this lock.
static TABLE: Mutex<()> = Mutex::const_new(());

fn database() -> Database {
    Database::new(DbConfig::from_env().expect("DB_* environment variables"))
}

fn apple() -> Company {
    Company {
        ticker: "AAPL".into(),
        name: "Apple Inc.".into(),
        gcis_sector: "Information Technology".into(),
        gcis_subsector: "Technology Hardware, Storage & Peripherals".into(),
        hq_location: Some("Cupertino, California".into()),
        date_added: "1982-11-30".into(),
        cik: "0000320193".into(),
        year_founded: "1976".into(),
    }
}

fn microsoft() -> Company {
    Company {
        ticker: "MSFT".into(),
        name: "Microsoft".into(),
        gcis_sector: "Information Technology".into(),
        gcis_subsector: "Systems Software".into(),
        hq_location: None,
        date_added: "1994-06-01".into(),
        cik: "0000789019".into(),
        year_founded: "1975".into(),
    }
}

fn multiset<'a>(companies: impl IntoIterator<Item = &'a Company>) -> HashMap<&'a Company, usize> {
    let mut counts = HashMap::new();
    for company in companies {
        *counts.entry(company).or_insert(0) += 1;
    }
    counts
}

fn unstored(stored: &[StoredCompany]) -> Vec<Company> {
    stored.iter().map(|s| s.company.clone()).collect()
}

async fn replace_with(db: &Database, companies: &[Company]) -> Vec<StoredCompany> {
    db.scoped(async |pg_client| store::save(pg_client, companies, false).await)
        .await
        .unwrap()
}

async fn reload(db: &Database) -> Vec<Company> {
    let stored = db
        .scoped(async |pg_client| store::load(pg_client).await)
        .await
        .unwrap();
    unstored(&stored)
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn save_round_trip() {
    let _table = TABLE.lock().await;
    let db = database();

    // the same company twice is kept twice; rows are independent
    let companies = vec![apple(), microsoft(), microsoft()];
    let stored = replace_with(&db, &companies).await;

    assert_eq!(stored.len(), companies.len());
    assert!(stored.windows(2).all(|w| w[0].id < w[1].id));

    let read_back = unstored(&stored);
    assert_eq!(multiset(&read_back), multiset(&companies));
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn save_apple_unchanged() {
    let _table = TABLE.lock().await;
    let db = database();

    replace_with(&db, &[apple()]).await;
    let read_back = reload(&db).await;

    assert_eq!(read_back, vec![apple()]);
    assert_eq!(read_back[0].cik, "0000320193");
    assert_eq!(read_back[0].year_founded, "1976");
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn save_replaces_previous_contents() {
    let _table = TABLE.lock().await;
    let db = database();

    replace_with(&db, &[apple(), microsoft()]).await;
    replace_with(&db, &[microsoft()]).await;
    assert_eq!(reload(&db).await, vec![microsoft()]);

    replace_with(&db, &[]).await;
    assert!(reload(&db).await.is_empty());
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn oversized_ticker_rolls_back() {
    let _table = TABLE.lock().await;
    let db = database();

    replace_with(&db, &[apple()]).await;

    // `ticker` is VARCHAR(5)
    let too_long = Company {
        ticker: "TOOLONG".into(),
        ..microsoft()
    };
    let batch = vec![microsoft(), too_long];
    let result = db
        .scoped(async |pg_client| store::save(pg_client, &batch, false).await)
        .await;

    assert!(matches!(result, Err(Error::Postgres(_))));
    assert_eq!(reload(&db).await, vec![apple()]);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn scoped_rolls_back_uncommitted_work() {
    let _table = TABLE.lock().await;
    let db = database();

    replace_with(&db, &[apple()]).await;

    let result: Result<(), Error> = db
        .scoped(async |pg_client| {
            pg_client
                .batch_execute("BEGIN; DELETE FROM companies.sp500_companies;")
                .await?;
            Err(Error::Config("forced failure".into()))
        })
        .await;

    assert!(matches!(result, Err(Error::Config(_))));
    assert_eq!(reload(&db).await, vec![apple()]);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn load_null_column_is_an_error() {
    let _table = TABLE.lock().await;
    let db = database();

    replace_with(&db, &[apple()]).await;

    // a row written by another tool, with NULLs in the text columns
    let result = db
        .scoped(async |pg_client| {
            pg_client
                .execute(
                    "INSERT INTO companies.sp500_companies (ticker) VALUES ('NUL')",
                    &[],
                )
                .await?;
            store::load(pg_client).await
        })
        .await;
    assert!(matches!(result, Err(Error::Postgres(_))));

    replace_with(&db, &[]).await;
    assert!(reload(&db).await.is_empty());
}
