//! Database driver trait definition

use std::sync::Arc;

use async_trait::async_trait;

use crate::{ConnectCoordinates, Connection, EngineIdentity, Result};

/// A database driver able to open connections from plain coordinates.
///
/// Drivers are looked up explicitly and passed by value wherever a
/// connection has to be made; there is no process-wide registration.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Unique identifier for this driver (e.g. "postgres").
    fn id(&self) -> &'static str;

    /// The engine this driver speaks to.
    fn engine(&self) -> EngineIdentity;

    /// Open a new connection. Coordinates are validated before any I/O.
    async fn connect(&self, coords: &ConnectCoordinates) -> Result<Arc<dyn Connection>>;
}
