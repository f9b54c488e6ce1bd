//! Connection pool implementation

use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlrig_core::{Connection, Result, RigError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::config::PoolConfig;
use super::stats::PoolStats;

/// Factory trait for creating new pooled connections
#[async_trait]
pub trait ConnectionFactory: Send + Sync + 'static {
    /// Create a new connection.
    async fn create(&self) -> Result<Arc<dyn Connection>>;

    /// Check that an idle connection is still usable before handing it out.
    async fn validate(&self, conn: &dyn Connection) -> bool {
        !conn.is_closed()
    }
}

#[async_trait]
impl<T: ConnectionFactory> ConnectionFactory for Arc<T> {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        (**self).create().await
    }

    async fn validate(&self, conn: &dyn Connection) -> bool {
        (**self).validate(conn).await
    }
}

/// A bounded pool of database connections.
///
/// Connections are created lazily: constructing the pool performs no I/O,
/// the first `get()` does. Borrowed connections return to the pool when the
/// `PooledConnection` guard drops. `close_all()` shuts the pool down and is
/// idempotent.
pub struct ConnectionPool {
    config: PoolConfig,
    factory: Arc<dyn ConnectionFactory>,
    idle: Mutex<VecDeque<Arc<dyn Connection>>>,
    semaphore: Arc<Semaphore>,
    active_count: AtomicUsize,
    waiting_count: AtomicUsize,
    closed: AtomicBool,
}

impl ConnectionPool {
    pub fn new<F: ConnectionFactory>(config: PoolConfig, factory: F) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_size()));
        Self {
            config,
            factory: Arc::new(factory),
            idle: Mutex::new(VecDeque::new()),
            semaphore,
            active_count: AtomicUsize::new(0),
            waiting_count: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Borrow a connection, creating one if the pool is under its limit.
    ///
    /// Waits for a returned connection when the pool is at capacity; gives
    /// up with a timeout error after the configured acquire timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_>> {
        if self.is_closed() {
            return Err(RigError::connection_msg("pool is closed"));
        }
        self.waiting_count.fetch_add(1, Ordering::SeqCst);

        let result = tokio::time::timeout(self.config.acquire_timeout(), async {
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| RigError::connection_msg("pool semaphore closed"))?;

            let connection = match self.take_idle().await {
                Some(conn) => conn,
                None => self.factory.create().await?,
            };

            self.active_count.fetch_add(1, Ordering::SeqCst);
            self.waiting_count.fetch_sub(1, Ordering::SeqCst);

            Ok(PooledConnection {
                connection: Some(connection),
                pool: self,
                _permit: permit,
            })
        })
        .await;

        match result {
            Ok(conn) => conn,
            Err(_) => {
                self.waiting_count.fetch_sub(1, Ordering::SeqCst);
                Err(RigError::Timeout(format!(
                    "no pooled connection available within {:?}",
                    self.config.acquire_timeout()
                )))
            }
        }
    }

    /// Pop idle connections until one validates; stale ones are closed.
    async fn take_idle(&self) -> Option<Arc<dyn Connection>> {
        loop {
            let connection = { self.idle.lock().pop_front() }?;
            if self.factory.validate(&*connection).await {
                return Some(connection);
            }
            let _ = connection.close().await;
        }
    }

    fn return_connection(&self, connection: Arc<dyn Connection>) {
        self.active_count.fetch_sub(1, Ordering::SeqCst);
        if self.is_closed() || connection.is_closed() {
            return;
        }
        self.idle.lock().push_back(connection);
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats::new(
            self.idle.lock().len(),
            self.active_count.load(Ordering::SeqCst),
            self.waiting_count.load(Ordering::SeqCst),
        )
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Shut the pool down: refuse further borrows and close every idle
    /// connection. Calling it again is a no-op. Close failures are logged,
    /// not propagated, so teardown always completes.
    pub async fn close_all(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let connections: Vec<_> = { self.idle.lock().drain(..).collect() };
        for connection in connections {
            if let Err(error) = connection.close().await {
                tracing::warn!(error = %error, "failed to close pooled connection");
            }
        }
    }
}

/// A connection borrowed from the pool.
///
/// Returned to the pool on drop.
pub struct PooledConnection<'a> {
    connection: Option<Arc<dyn Connection>>,
    pool: &'a ConnectionPool,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection<'_> {
    type Target = dyn Connection;

    fn deref(&self) -> &Self::Target {
        self.connection.as_ref().expect("connection taken").as_ref()
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.connection.take() {
            self.pool.return_connection(conn);
        }
    }
}

impl PooledConnection<'_> {
    /// The underlying connection as an `Arc`.
    pub fn inner(&self) -> &Arc<dyn Connection> {
        self.connection.as_ref().expect("connection taken")
    }
}
