pub mod schema;

use anyhow::{Context, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Pool of SQLite connections shared by all repository calls.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Milliseconds a connection waits on a locked database before failing.
pub const BUSY_TIMEOUT_MS: u64 = 5000;

/// Per-connection setup, run once for each connection the pool opens.
fn init_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open (or create) the database at the given path and return a pool of
/// `pool_size` connections with the schema initialized.
pub fn open_database(path: impl AsRef<Path>, pool_size: u32) -> Result<DbPool> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let manager = SqliteConnectionManager::file(path).with_init(init_connection);
    let pool = Pool::builder()
        .max_size(pool_size)
        .build(manager)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    let conn = pool.get().context("failed to check out a connection")?;
    // WAL lets readers proceed while a writer holds the lock
    conn.pragma_update(None, "journal_mode", "WAL")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;

    tracing::info!(path = %path.display(), pool_size, "database initialized");
    Ok(pool)
}

/// Open a private in-memory database shared by all connections of the
/// returned pool. Each call gets its own database.
pub fn open_memory_database() -> Result<DbPool> {
    let name = uuid::Uuid::new_v4();
    let manager = SqliteConnectionManager::file(format!("file:saypi-{name}?mode=memory&cache=shared"))
        .with_init(init_connection);

    // The database lives only as long as one of its connections, so the pool
    // must never reap idle ones.
    let pool = Pool::builder()
        .max_size(2)
        .min_idle(Some(1))
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)
        .context("failed to open in-memory database")?;

    let conn = pool.get().context("failed to check out a connection")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    Ok(pool)
}
