use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("reqwest error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("failed to build a progress bar: {0}")]
    Progress(#[from] indicatif::style::TemplateError),

    #[error("the selector you are trying to scrape for is invalid. Selector: {0}")]
    Selector(String),
}
