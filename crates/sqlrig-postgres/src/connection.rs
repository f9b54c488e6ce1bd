//! PostgreSQL connection implementation

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlrig_core::{ConnectCoordinates, Connection, Result, RigError};
use tokio::task::JoinHandle;
use tokio_postgres::NoTls;

fn format_postgres_error(error: &tokio_postgres::Error) -> String {
    match error.as_db_error() {
        Some(db_error) => format!("{} (code: {})", db_error.message(), db_error.code().code()),
        None => error.to_string(),
    }
}

/// PostgreSQL connection wrapper.
///
/// Owns the client and the background connection task tokio-postgres needs;
/// closing aborts the task, which drops the socket.
pub struct PostgresConnection {
    client: tokio_postgres::Client,
    io_task: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl PostgresConnection {
    /// Connect to a PostgreSQL server.
    ///
    /// `coords.database` of `None` connects without selecting a database,
    /// which PostgreSQL resolves to the user's login database.
    pub async fn connect(coords: &ConnectCoordinates) -> Result<Self> {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&coords.host)
            .port(coords.port)
            .user(&coords.credentials.username)
            .password(&coords.credentials.password);
        if let Some(database) = &coords.database {
            config.dbname(database);
        }

        let (client, connection) = config.connect(NoTls).await.map_err(|error| {
            RigError::connection(
                format!(
                    "failed to connect to postgresql://{}:{}",
                    coords.host, coords.port
                ),
                error,
            )
        })?;

        let io_task = tokio::spawn(async move {
            if let Err(error) = connection.await {
                tracing::debug!(error = %error, "postgres connection task ended");
            }
        });

        tracing::debug!(
            host = %coords.host,
            port = coords.port,
            database = coords.database.as_deref().unwrap_or("<login default>"),
            "PostgreSQL connection established"
        );
        Ok(Self {
            client,
            io_task: Mutex::new(Some(io_task)),
            closed: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl Connection for PostgresConnection {
    fn driver_name(&self) -> &str {
        "postgres"
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        self.client
            .execute(sql, &[])
            .await
            .map_err(|error| RigError::connection(format_postgres_error(&error), error))
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .query_one("SELECT 1", &[])
            .await
            .map(|_| ())
            .map_err(|error| RigError::connection(format_postgres_error(&error), error))
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(task) = self.io_task.lock().take() {
            task.abort();
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || self.client.is_closed()
    }
}
