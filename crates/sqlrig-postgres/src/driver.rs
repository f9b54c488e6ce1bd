//! PostgreSQL driver implementation

use std::sync::Arc;

use async_trait::async_trait;
use sqlrig_core::{ConnectCoordinates, Connection, DatabaseDriver, EngineIdentity, Result};

use crate::PostgresConnection;

/// PostgreSQL database driver
pub struct PostgresDriver;

impl PostgresDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PostgresDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for PostgresDriver {
    fn id(&self) -> &'static str {
        "postgres"
    }

    fn engine(&self) -> EngineIdentity {
        EngineIdentity::new("PostgreSQL")
    }

    #[tracing::instrument(skip(self, coords), fields(host = %coords.host, port = coords.port))]
    async fn connect(&self, coords: &ConnectCoordinates) -> Result<Arc<dyn Connection>> {
        coords.validate()?;
        let connection = PostgresConnection::connect(coords).await.map_err(|error| {
            tracing::warn!(error = %error, "PostgreSQL connection failed");
            error
        })?;
        Ok(Arc::new(connection))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sqlrig_core::{Credentials, RigError};

    use super::*;

    #[test]
    fn driver_identity() {
        let driver = PostgresDriver::new();
        assert_eq!(driver.id(), "postgres");
        assert_eq!(driver.engine().tag(), "postgresql");
    }

    #[tokio::test]
    async fn malformed_coordinates_fail_before_any_io() {
        let driver = PostgresDriver::new();
        let coords = ConnectCoordinates::new("localhost", 0, Credentials::new("root", "root"));
        let err = driver.connect(&coords).await.unwrap_err();
        assert!(matches!(err, RigError::ConnectionConfigError(_)));
    }
}
