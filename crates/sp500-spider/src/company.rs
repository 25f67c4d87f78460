use serde::Serialize;
use tokio_postgres::Row;

/// One row of the S&P 500 constituents table.
///
/// Every field is kept as free text: `cik` may carry leading zeros, and `date_added` and
/// `year_founded` are not guaranteed to be well-formed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Company {
    pub ticker: String,
    pub name: String,
    pub gcis_sector: String,
    pub gcis_subsector: String,
    pub hq_location: Option<String>,
    pub date_added: String,
    pub cik: String,
    pub year_founded: String,
}

/// A [Company] read back from `companies.sp500_companies`, with its generated key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredCompany {
    pub id: i32,
    #[serde(flatten)]
    pub company: Company,
}

impl TryFrom<&Row> for StoredCompany {
    type Error = tokio_postgres::Error;

    // column order follows `store::sql::SELECT_COMPANIES`; a NULL in a text column other
    // than `hq_location` is an error rather than a panic
    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(StoredCompany {
            id: row.try_get(0)?,
            company: Company {
                ticker: row.try_get(1)?,
                name: row.try_get(2)?,
                gcis_sector: row.try_get(3)?,
                gcis_subsector: row.try_get(4)?,
                hq_location: row.try_get(5)?,
                date_added: row.try_get(6)?,
                cik: row.try_get(7)?,
                year_founded: row.try_get(8)?,
            },
        })
    }
}
