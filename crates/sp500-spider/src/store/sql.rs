//////////////////////////////////////////////////////////////////
// schema
//////////////////////////////////////////////////////////////////

/// `companies.sp500_companies` holds the latest scrape of the S&P 500 constituents; it is
/// fully replaced on every run.
pub(crate) static CREATE_COMPANIES: &'static str = "
    CREATE SCHEMA IF NOT EXISTS companies;

    CREATE TABLE IF NOT EXISTS companies.sp500_companies (
        id SERIAL PRIMARY KEY,
        ticker VARCHAR(5),
        company_name TEXT,
        gcis_sector TEXT,
        gcis_subsector TEXT,
        hq_location TEXT,
        date_added TEXT,
        cik VARCHAR(10),
        year_founded TEXT
    );
";

//////////////////////////////////////////////////////////////////
// companies
//////////////////////////////////////////////////////////////////

pub(crate) static DELETE_COMPANIES: &'static str = "
    DELETE FROM companies.sp500_companies
";

pub(crate) static INSERT_COMPANY: &'static str = "
    INSERT INTO companies.sp500_companies (
        ticker,
        company_name,
        gcis_sector,
        gcis_subsector,
        hq_location,
        date_added,
        cik,
        year_founded
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
";

/// Column order is relied upon by `StoredCompany::try_from(&Row)`.
pub(crate) static SELECT_COMPANIES: &'static str = "
    SELECT id, ticker, company_name, gcis_sector, gcis_subsector, hq_location, date_added, cik,
        year_founded
    FROM companies.sp500_companies
    ORDER BY id
";
