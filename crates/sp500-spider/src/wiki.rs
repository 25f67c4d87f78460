use crate::company::Company;
use crate::http::*;
use crate::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, trace, warn};

/// The constituents page; the first `<table>` on it is the list of companies.
pub const SP500_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// Wikipedia rejects requests without a browser-like identification header.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Number of cells read from each row of the table.
const NUM_CELLS: usize = 8;

// scrape
// ----------------------------------------------------------------------------

/// Fetches the constituents page and extracts its table into [Company] records.
#[derive(Clone, Debug)]
pub struct WikiScraper {
    url: String,
    http_client: HttpClient,
}

impl WikiScraper {
    /// Scraper for the fixed Wikipedia page.
    pub fn new() -> Result<Self> {
        Self::with_url(SP500_URL)
    }

    /// Scraper for any page laid out like the Wikipedia one (mirrors, test servers).
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::ClientBuilder::new()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| {
                error!("failed to build reqwest client, error({err})");
                err
            })?;

        Ok(WikiScraper {
            url: url.into(),
            http_client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the page and return its body.
    ///
    /// Transport failures and non-2xx statuses are logged and yield `None`; they are never
    /// raised to the caller.
    pub async fn fetch_page(&self) -> Option<String> {
        debug!("fetching {}", self.url);
        let response = match self.http_client.get(&self.url).send().await {
            Ok(response) => response,
            Err(err) => {
                error!("failed to fetch {}, error({err})", self.url);
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(err) => {
                error!("failed to fetch {}, error({err})", self.url);
                return None;
            }
        };

        match response.text().await {
            Ok(body) => {
                trace!("fetched {} bytes from {}", body.len(), self.url);
                Some(body)
            }
            Err(err) => {
                error!("failed to read the body of {}, error({err})", self.url);
                None
            }
        }
    }

    /// Fetch the page and parse its first table.
    ///
    /// An unreachable page yields an empty `Vec`, the same as a page without a table.
    pub async fn scrape_table(&self) -> Result<Vec<Company>> {
        let time = std::time::Instant::now();

        let Some(html) = self.fetch_page().await else {
            return Ok(Vec::new());
        };
        let companies = parse_table(&html)?;

        debug!(
            "scraped {} companies from {}, {}",
            companies.len(),
            self.url,
            crate::time_elapsed(time)
        );
        Ok(companies)
    }
}

// parse
// ----------------------------------------------------------------------------

/// Extract the companies from the first `<table>` of `html`.
///
/// The first row is the header and is skipped. Every other row is read by position;
/// rows with fewer than eight `<td>` cells are logged and skipped, cells past the eighth
/// are ignored.
pub fn parse_table(html: &str) -> Result<Vec<Company>> {
    let table_selector = create_selector("table")?;
    let row_selector = create_selector("tr")?;
    let cell_selector = create_selector("td")?;

    let doc = Html::parse_document(html);
    let Some(table) = doc.select(&table_selector).next() else {
        error!("could not find the constituents table");
        return Ok(Vec::new());
    };

    let companies = table
        .select(&row_selector)
        .enumerate()
        .skip(1)
        .filter_map(|(n, row)| {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .take(NUM_CELLS)
                .map(|cell| clean_text(Some(cell_text(cell).as_str())))
                .collect();

            match <[String; NUM_CELLS]>::try_from(cells) {
                Ok(cells) => Some(Company::from(cells)),
                Err(cells) => {
                    warn!(
                        "skipping row {n}: expected {NUM_CELLS} cells, found {}",
                        cells.len()
                    );
                    None
                }
            }
        })
        .collect();

    Ok(companies)
}

/// Trim the surrounding whitespace and drop any embedded newlines and tabs.
///
/// `None` and `""` both clean to `""`.
pub fn clean_text(text: Option<&str>) -> String {
    match text {
        Some(text) => text.trim().replace(['\n', '\t'], ""),
        None => String::new(),
    }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect()
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::Selector(sel_str.into()))
}

impl From<[String; NUM_CELLS]> for Company {
    fn from(cells: [String; NUM_CELLS]) -> Self {
        let [ticker, name, gcis_sector, gcis_subsector, hq_location, date_added, cik, year_founded] =
            cells;
        Company {
            ticker,
            name,
            gcis_sector,
            gcis_subsector,
            hq_location: (!hq_location.is_empty()).then_some(hq_location),
            date_added,
            cik,
            year_founded,
        }
    }
}
