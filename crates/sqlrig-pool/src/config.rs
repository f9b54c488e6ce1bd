//! Pool configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sizing and acquire-timeout policy for a connection pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of connections the pool may hold.
    max_size: usize,
    /// Timeout in milliseconds when acquiring a connection.
    acquire_timeout_ms: u64,
}

impl PoolConfig {
    /// Create a configuration with the given maximum size.
    ///
    /// # Panics
    ///
    /// Panics if `max_size` is 0.
    pub fn new(max_size: usize) -> Self {
        assert!(max_size > 0, "max_size must be greater than 0");
        Self {
            max_size,
            acquire_timeout_ms: 30_000,
        }
    }

    pub fn with_acquire_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.acquire_timeout_ms = timeout_ms;
        self
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(10)
    }
}
