//! Pool statistics

use serde::{Deserialize, Serialize};

/// Snapshot of a pool's connection counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    idle: usize,
    active: usize,
    waiting: usize,
}

impl PoolStats {
    pub fn new(idle: usize, active: usize, waiting: usize) -> Self {
        Self {
            idle,
            active,
            waiting,
        }
    }

    /// Connections currently held by the pool or its borrowers.
    pub fn total(&self) -> usize {
        self.idle + self.active
    }

    pub fn idle(&self) -> usize {
        self.idle
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Requests blocked waiting for a connection.
    pub fn waiting(&self) -> usize {
        self.waiting
    }

    /// Fraction of held connections currently borrowed, 0.0 when empty.
    pub fn utilization(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.active as f64 / self.total() as f64
    }
}
