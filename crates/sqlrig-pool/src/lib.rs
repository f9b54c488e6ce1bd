//! sqlrig pool - pooled datasource construction
//!
//! Provides the connection pool used by every provisioned datasource and
//! the factory that applies the rig's fixed pool policy (bounded size,
//! read-committed sessions, lazy connection).

mod config;
mod datasource;
mod pool;
mod stats;

#[cfg(test)]
mod tests;

pub use config::PoolConfig;
pub use datasource::{DatasourceFactory, DatasourceHandle};
pub use pool::{ConnectionFactory, ConnectionPool, PooledConnection};
pub use stats::PoolStats;
