//! Tests for pool and datasource construction

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use sqlrig_core::{
    ConnectCoordinates, Connection, Credentials, DatabaseDriver, EngineIdentity, Result, RigError,
};

use super::config::PoolConfig;
use super::datasource::DatasourceFactory;
use super::pool::{ConnectionFactory, ConnectionPool};

struct MockConnection {
    executed: Arc<Mutex<Vec<String>>>,
    closed: AtomicBool,
}

impl MockConnection {
    fn new(executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            executed,
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        self.executed.lock().push(sql.to_string());
        Ok(0)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Factory counting how many connections it has created
struct MockFactory {
    created: AtomicUsize,
    executed: Arc<Mutex<Vec<String>>>,
}

impl MockFactory {
    fn new() -> Self {
        Self {
            created: AtomicUsize::new(0),
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionFactory for MockFactory {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockConnection::new(Arc::clone(&self.executed))))
    }
}

struct MockDriver {
    connects: AtomicUsize,
    executed: Arc<Mutex<Vec<String>>>,
}

impl MockDriver {
    fn new() -> Self {
        Self {
            connects: AtomicUsize::new(0),
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl DatabaseDriver for MockDriver {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn engine(&self) -> EngineIdentity {
        EngineIdentity::new("PostgreSQL")
    }

    async fn connect(&self, coords: &ConnectCoordinates) -> Result<Arc<dyn Connection>> {
        coords.validate()?;
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockConnection::new(Arc::clone(&self.executed))))
    }
}

fn coords() -> ConnectCoordinates {
    ConnectCoordinates::new("localhost", 32789, Credentials::new("root", "root"))
}

// =============================================================================
// PoolConfig
// =============================================================================

#[test]
fn pool_config_roundtrips_through_serde() {
    let config = PoolConfig::new(4).with_acquire_timeout_ms(5_000);
    let json = serde_json::to_string(&config).expect("serialize");
    let back: PoolConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.max_size(), 4);
    assert_eq!(back.acquire_timeout(), Duration::from_millis(5_000));
}

#[test]
#[should_panic(expected = "max_size must be greater than 0")]
fn pool_config_rejects_zero_max_size() {
    PoolConfig::new(0);
}

#[test]
fn pool_stats_utilization() {
    use super::stats::PoolStats;

    assert!((PoolStats::new(2, 2, 0).utilization() - 0.5).abs() < 0.001);
    assert!((PoolStats::new(0, 4, 1).utilization() - 1.0).abs() < 0.001);
    assert!((PoolStats::new(0, 0, 0).utilization()).abs() < 0.001);
}

// =============================================================================
// ConnectionPool
// =============================================================================

#[tokio::test]
async fn pool_connects_lazily_and_reuses_idle() {
    let factory = Arc::new(MockFactory::new());
    let pool = ConnectionPool::new(PoolConfig::new(4), Arc::clone(&factory));
    assert_eq!(factory.created(), 0);

    {
        let conn = pool.get().await.expect("get connection");
        assert_eq!(conn.driver_name(), "mock");
        assert_eq!(pool.stats().active(), 1);
    }

    assert_eq!(pool.stats().active(), 0);
    assert_eq!(pool.stats().idle(), 1);

    let _again = pool.get().await.expect("get connection");
    assert_eq!(factory.created(), 1);
}

#[tokio::test]
async fn pool_enforces_max_size_with_timeout() {
    let config = PoolConfig::new(2).with_acquire_timeout_ms(50);
    let pool = ConnectionPool::new(config, MockFactory::new());

    let _c1 = pool.get().await.expect("first");
    let _c2 = pool.get().await.expect("second");

    let err = pool.get().await.expect_err("third must time out");
    assert!(matches!(err, RigError::Timeout(_)));
}

#[tokio::test]
async fn pool_discards_stale_idle_connections() {
    let factory = Arc::new(MockFactory::new());
    let pool = ConnectionPool::new(PoolConfig::new(4), Arc::clone(&factory));

    {
        let conn = pool.get().await.expect("get");
        conn.close().await.expect("close underlying");
    }

    // The closed connection fails validation, so a fresh one is created.
    let _conn = pool.get().await.expect("get");
    assert_eq!(factory.created(), 2);
}

#[tokio::test]
async fn close_all_closes_idle_and_refuses_new_borrows() {
    let pool = ConnectionPool::new(PoolConfig::new(4), MockFactory::new());
    {
        let _conn = pool.get().await.expect("get");
    }
    assert_eq!(pool.stats().idle(), 1);

    pool.close_all().await;
    pool.close_all().await; // second call is a no-op
    assert!(pool.is_closed());
    assert_eq!(pool.stats().idle(), 0);
    assert!(pool.get().await.is_err());
}

// =============================================================================
// DatasourceFactory / DatasourceHandle
// =============================================================================

#[tokio::test]
async fn datasource_creation_performs_no_io() {
    let driver = Arc::new(MockDriver::new());
    let factory = DatasourceFactory::new(driver.clone());

    let handle = factory
        .create_datasource(&coords(), "ds_0")
        .expect("create datasource");

    assert_eq!(handle.name(), "ds_0");
    assert_eq!(handle.url(), "jdbc:postgresql://localhost:32789/ds_0");
    assert_eq!(driver.connects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn datasource_applies_read_committed_on_first_use() {
    let driver = Arc::new(MockDriver::new());
    let factory = DatasourceFactory::new(driver.clone());
    let handle = factory.create_datasource(&coords(), "ds_0").expect("create");

    let _conn = handle.acquire().await.expect("acquire");
    assert_eq!(driver.connects.load(Ordering::SeqCst), 1);

    let executed = driver.executed.lock().clone();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].contains("READ COMMITTED"));
}

#[tokio::test]
async fn datasource_pool_is_capped_at_four() {
    let driver = Arc::new(MockDriver::new());
    let handle = DatasourceFactory::new(driver)
        .create_datasource(&coords(), "ds_0")
        .expect("create");

    let mut held = Vec::new();
    for _ in 0..4 {
        held.push(handle.acquire().await.expect("acquire"));
    }
    assert_eq!(handle.stats().active(), 4);

    let fifth = tokio::time::timeout(Duration::from_millis(50), handle.acquire()).await;
    assert!(fifth.is_err(), "fifth acquire should block at the cap");
}

#[tokio::test]
async fn malformed_coordinates_fail_fast() {
    let factory = DatasourceFactory::new(Arc::new(MockDriver::new()));
    let bad = ConnectCoordinates::new("", 32789, Credentials::new("root", "root"));

    let err = factory.create_datasource(&bad, "ds_0").unwrap_err();
    assert!(matches!(err, RigError::ConnectionConfigError(_)));
}

#[tokio::test]
async fn datasource_close_is_idempotent() {
    let driver = Arc::new(MockDriver::new());
    let handle = DatasourceFactory::new(driver)
        .create_datasource(&coords(), "ds_0")
        .expect("create");

    {
        let _conn = handle.acquire().await.expect("acquire");
    }
    handle.close().await;
    handle.close().await;
    assert!(handle.is_closed());
    assert!(handle.acquire().await.is_err());
}
