//! Error types for sqlrig

use std::time::Duration;

use thiserror::Error;

use crate::DatasetGroup;

/// Boxed error cause carried inside [`RigError`] variants.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for sqlrig operations.
///
/// Every variant that wraps a lower-level failure keeps it reachable via
/// `std::error::Error::source` so test diagnostics see the original cause.
#[derive(Error, Debug)]
pub enum RigError {
    /// The engine never accepted a connection within the wait budget.
    #[error("engine did not accept connections within {budget:?}")]
    ReadinessTimeout {
        budget: Duration,
        #[source]
        cause: Option<BoxedCause>,
    },

    /// No seed script exists for the requested scenario/group/engine.
    #[error("no seed script for scenario {scenario:?} ({group} data, engine {engine})")]
    ScenarioNotFound {
        scenario: Option<String>,
        group: DatasetGroup,
        engine: String,
    },

    /// A seed script declares the same logical database twice.
    #[error("duplicate database name {name:?} declared in {script}")]
    DuplicateDatabaseName { name: String, script: String },

    /// Host, port or credentials are malformed for the engine.
    #[error("invalid connection configuration: {0}")]
    ConnectionConfigError(String),

    /// The container failed to reach the running state.
    #[error("container {container} failed to start")]
    ContainerStartFailed {
        container: String,
        #[source]
        cause: BoxedCause,
    },

    /// Building a datasource during provisioning failed.
    #[error("provisioning datasource {database:?} failed")]
    ProvisioningFailed {
        database: String,
        #[source]
        cause: BoxedCause,
    },

    /// A lifecycle method was called from a state that does not allow it.
    #[error("cannot {operation} while container is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// The sandbox runtime rejected or lost the managed process.
    #[error("sandbox runtime failure: {context}")]
    Sandbox {
        context: String,
        #[source]
        cause: Option<BoxedCause>,
    },

    /// Connection-level failure reported by a driver.
    #[error("connection error: {context}")]
    Connection {
        context: String,
        #[source]
        cause: Option<BoxedCause>,
    },

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RigError {
    /// Connection error with an underlying driver cause.
    pub fn connection(
        context: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            context: context.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Connection error with no recoverable cause.
    pub fn connection_msg(context: impl Into<String>) -> Self {
        Self::Connection {
            context: context.into(),
            cause: None,
        }
    }

    /// Sandbox failure wrapping a runtime error.
    pub fn sandbox(
        context: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Sandbox {
            context: context.into(),
            cause: Some(Box::new(cause)),
        }
    }
}

/// Result type alias for sqlrig operations
pub type Result<T> = std::result::Result<T, RigError>;
