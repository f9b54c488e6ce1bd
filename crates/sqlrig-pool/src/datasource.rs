//! Datasource construction with the rig's fixed pool policy

use std::sync::Arc;

use async_trait::async_trait;
use sqlrig_core::{
    ConnectCoordinates, Connection, DatabaseDriver, Result, jdbc_url,
};

use super::config::PoolConfig;
use super::pool::{ConnectionFactory, ConnectionPool, PooledConnection};
use super::stats::PoolStats;

/// Every datasource pools at most this many connections.
const MAX_POOL_SIZE: usize = 4;

/// Session isolation applied to every pooled connection at creation.
const READ_COMMITTED: &str =
    "SET SESSION CHARACTERISTICS AS TRANSACTION ISOLATION LEVEL READ COMMITTED";

/// Builds pooled datasource handles for logical databases.
///
/// All handles share one driver and one fixed policy: pool size capped at
/// [`MAX_POOL_SIZE`], read-committed sessions. Construction never touches
/// the network; the pool connects on first use.
pub struct DatasourceFactory {
    driver: Arc<dyn DatabaseDriver>,
}

impl DatasourceFactory {
    pub fn new(driver: Arc<dyn DatabaseDriver>) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &Arc<dyn DatabaseDriver> {
        &self.driver
    }

    /// Build a handle for one logical database.
    ///
    /// Fails with `ConnectionConfigError` when the coordinates are
    /// malformed for the engine. No connection is opened here.
    pub fn create_datasource(
        &self,
        coords: &ConnectCoordinates,
        database: &str,
    ) -> Result<DatasourceHandle> {
        let coords = coords.clone().with_database(database);
        coords.validate()?;

        let url = jdbc_url(
            &self.driver.engine(),
            &coords.host,
            coords.port,
            Some(database),
        );
        let factory = SessionFactory {
            driver: Arc::clone(&self.driver),
            coords,
        };
        let pool = ConnectionPool::new(PoolConfig::new(MAX_POOL_SIZE), factory);

        tracing::debug!(database = database, url = %url, "datasource created");
        Ok(DatasourceHandle {
            name: database.to_string(),
            url,
            pool,
        })
    }
}

/// Pool factory that opens driver connections with the fixed session setup.
struct SessionFactory {
    driver: Arc<dyn DatabaseDriver>,
    coords: ConnectCoordinates,
}

#[async_trait]
impl ConnectionFactory for SessionFactory {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        let connection = self.driver.connect(&self.coords).await?;
        connection.execute(READ_COMMITTED).await?;
        Ok(connection)
    }
}

/// An owned, pooled connection resource bound to one logical database.
///
/// The container lifecycle owns every handle it creates and closes them on
/// `stop()`; test code borrows connections via [`DatasourceHandle::acquire`]
/// and must not close the handle itself.
pub struct DatasourceHandle {
    name: String,
    url: String,
    pool: ConnectionPool,
}

impl DatasourceHandle {
    /// The logical database name this handle is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Connection URL of the backing database.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Borrow a pooled connection, connecting lazily on first use.
    pub async fn acquire(&self) -> Result<PooledConnection<'_>> {
        self.pool.get().await
    }

    pub fn stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Close the handle and every pooled connection. Double-close is a
    /// no-op.
    pub async fn close(&self) {
        self.pool.close_all().await;
    }
}

impl std::fmt::Debug for DatasourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasourceHandle")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("closed", &self.is_closed())
            .finish()
    }
}
