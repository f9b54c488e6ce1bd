//! Connection trait

use async_trait::async_trait;

use crate::Result;

/// A live database connection.
///
/// The rig only needs enough surface to seed data and to probe liveness;
/// query result shaping is a concern of the tests using the datasources.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Driver identifier, e.g. "postgres".
    fn driver_name(&self) -> &str;

    /// Execute a statement, returning the number of affected rows.
    async fn execute(&self, sql: &str) -> Result<u64>;

    /// Cheap liveness check (e.g. `SELECT 1`).
    async fn ping(&self) -> Result<()>;

    /// Close the connection. Closing twice is a no-op.
    async fn close(&self) -> Result<()>;

    /// Whether the connection has been closed.
    fn is_closed(&self) -> bool;
}

impl std::fmt::Debug for dyn Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("driver_name", &self.driver_name())
            .field("is_closed", &self.is_closed())
            .finish()
    }
}
