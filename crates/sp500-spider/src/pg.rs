use crate::http::*;
use crate::{Error, Result};
use std::fmt;
use std::ops::AsyncFnOnce;
use tokio::task::JoinHandle;
use tokio_postgres::NoTls;
use tracing::{debug, error, trace, warn};

/// Default PostgreSQL port, used when `DB_PORT` is not set.
pub const DEFAULT_PORT: u16 = 5432;

// config
// ----------------------------------------------------------------------------

/// Connection parameters for the database holding `companies.sp500_companies`.
///
/// Missing values are not validated here; the connection attempt reports them.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DbConfig {
    pub host: Option<String>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: u16,
}

impl DbConfig {
    /// Read `DB_HOST`, `DB_NAME`, `DB_USER`, `DB_PASSWORD` and `DB_PORT` from the environment
    /// (or a `.env` file).
    pub fn from_env() -> Result<Self> {
        let port = match var("DB_PORT") {
            Ok(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|err| Error::Config(format!("DB_PORT {port:?}: {err}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let config = DbConfig {
            host: var("DB_HOST").ok(),
            dbname: var("DB_NAME").ok(),
            user: var("DB_USER").ok(),
            password: var("DB_PASSWORD").ok(),
            port,
        };
        trace!("database config read from environment: {config:?}");

        Ok(config)
    }

    /// Translate into the driver's own config; only the values present are set.
    pub fn pg_config(&self) -> tokio_postgres::Config {
        let mut pg_config = tokio_postgres::Config::new();
        if let Some(host) = &self.host {
            pg_config.host(host);
        }
        if let Some(dbname) = &self.dbname {
            pg_config.dbname(dbname);
        }
        if let Some(user) = &self.user {
            pg_config.user(user);
        }
        if let Some(password) = &self.password {
            pg_config.password(password);
        }
        pg_config.port(self.port);
        pg_config
    }
}

// keep the password out of the logs
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("port", &self.port)
            .finish()
    }
}

// connection
// ----------------------------------------------------------------------------

/// Opens one connection per unit of work; nothing is pooled or kept between calls.
#[derive(Clone, Debug)]
pub struct Database {
    config: DbConfig,
}

impl Database {
    pub fn new(config: DbConfig) -> Self {
        Database { config }
    }

    /// Open a connection and spawn its driver task.
    pub async fn connect(&self) -> Result<ScopedConnection> {
        trace!("connecting to postgres {:?} ...", self.config);
        let (client, connection) = self
            .config
            .pg_config()
            .connect(NoTls)
            .await
            .map_err(|err| {
                error!("postgres connection error: {}", err);
                err
            })?;

        let driver = tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!("postgres connection error: {}", err);
            }
        });
        debug!("postgres connection established");

        Ok(ScopedConnection { client, driver })
    }

    /// Run `work` on a fresh connection, closing it afterwards whatever the outcome.
    ///
    /// If `work` fails, a `ROLLBACK` is issued on the connection before the error is returned
    /// unchanged; commits are the responsibility of `work`.
    pub async fn scoped<T, F>(&self, work: F) -> Result<T>
    where
        F: AsyncFnOnce(&mut PgClient) -> Result<T>,
    {
        let mut conn = self.connect().await?;

        let result = work(&mut conn.client).await;
        if let Err(err) = &result {
            error!("unit of work failed, rolling back, error({err})");
            conn.rollback().await;
        }

        conn.close().await;
        result
    }
}

/// A single open connection and the task driving it.
///
/// Dropping it drops the client, which ends the driver task and closes the connection.
pub struct ScopedConnection {
    client: PgClient,
    driver: JoinHandle<()>,
}

impl ScopedConnection {
    /// Discard any uncommitted work; failures are logged, not returned.
    pub async fn rollback(&self) {
        match self.client.batch_execute("ROLLBACK").await {
            Ok(_) => debug!("rolled back uncommitted work"),
            Err(err) => warn!("rollback failed, error({err})"),
        }
    }

    /// Close the connection and wait for the driver task to finish.
    pub async fn close(self) {
        drop(self.client);
        match self.driver.await {
            Ok(_) => trace!("postgres connection closed"),
            Err(err) => error!("postgres connection task failed, error({err})"),
        }
    }
}
