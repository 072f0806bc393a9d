//! Embedded PostgreSQL databases for adapter tests.
//!
//! Every test gets its own temporary database on the process-wide cluster
//! from `pg-embed-setup-unpriv`. Where the cluster cannot start, set
//! `SKIP_TEST_CLUSTER=1`: setup then returns `None` and the test exits early
//! instead of failing.

use std::fmt::Display;
use std::time::Duration;

use foodshare::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};

const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Whether `SKIP_TEST_CLUSTER` is `1`, `true` or `yes` (any case).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when allowed, otherwise fail loudly so CI breakage is not masked.
#[expect(clippy::print_stderr, reason = "skip marker for test logs")]
pub fn handle_cluster_setup_failure<T>(reason: impl Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= CLUSTER_RETRIES => return Err(format!("{error:?}")),
            Err(_) => {
                std::thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Create an empty temporary database on the shared cluster.
///
/// Call this outside any async runtime; the cluster bootstrap blocks.
pub fn temporary_database() -> Option<TemporaryDatabase> {
    let cluster = match cluster() {
        Ok(cluster) => cluster,
        Err(reason) => return handle_cluster_setup_failure(reason),
    };
    let name = format!("test_{}", uuid::Uuid::new_v4().simple());
    match cluster.temporary_database(name.as_str()) {
        Ok(database) => Some(database),
        Err(error) => handle_cluster_setup_failure(format!("create database: {error:?}")),
    }
}

/// Apply the schema migrations to `database` and open a pool on it.
pub async fn migrated_pool(database: &TemporaryDatabase, max_size: u32) -> Option<DbPool> {
    let url = database.url().to_owned();
    if let Err(error) = run_migrations(&url).await {
        return handle_cluster_setup_failure(error);
    }
    match DbPool::new(PoolConfig::new(url).with_max_size(max_size)).await {
        Ok(pool) => Some(pool),
        Err(error) => handle_cluster_setup_failure(error),
    }
}
