use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::{Connection, SqliteConnection};
use diesel_migrations::RunMigrationsError;
use std::path::Path;
use std::time::Instant;

pub type InnerConnType = SqliteConnection;
pub type ConnType = PooledConnection<ConnectionManager<InnerConnType>>;
pub type PoolType = Pool<ConnectionManager<InnerConnType>>;

const CONNECTION_INIT: &str = "PRAGMA busy_timeout = 5000; \
    PRAGMA synchronous = NORMAL; \
    PRAGMA journal_mode = WAL; \
    PRAGMA foreign_keys = ON;";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),
    #[error("Database query error: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("Database migration error: {0}")]
    Migration(#[from] RunMigrationsError),
    #[error("Runtime error: {0}")]
    Runtime(#[from] tokio::task::JoinError),
}

/// Constructs a DAO borrowing the pool it runs its queries on.
pub trait AsDao<'a> {
    fn as_dao(pool: &'a PoolType) -> Self;
}

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<InnerConnType, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut InnerConnType) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(CONNECTION_INIT)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Process-wide handle to the connection pool.
///
/// Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct DbExecutor {
    pub pool: PoolType,
}

impl DbExecutor {
    pub fn new<S: Into<String>>(database_url: S) -> Result<Self, Error> {
        let database_url = database_url.into();
        log::debug!("Opening database: {}", database_url);
        let manager = ConnectionManager::new(database_url);
        let pool = Pool::builder()
            .connection_customizer(Box::new(ConnectionOptions))
            .build(manager)?;
        Ok(DbExecutor { pool })
    }

    /// Transient database living as long as the executor.
    ///
    /// Every SQLite `:memory:` connection is a separate database, so the pool
    /// is limited to a single connection.
    pub fn in_memory() -> Result<Self, Error> {
        let manager = ConnectionManager::new(":memory:");
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_customizer(Box::new(ConnectionOptions))
            .build(manager)?;
        Ok(DbExecutor { pool })
    }

    pub fn from_data_dir(data_dir: &Path, name: &str) -> Result<Self, Error> {
        let db = data_dir.join(name).with_extension("db");
        Self::new(db.to_string_lossy())
    }

    pub fn conn(&self) -> Result<ConnType, Error> {
        Ok(self.pool.get()?)
    }

    pub fn as_dao<'a, T: AsDao<'a>>(&'a self) -> T {
        AsDao::as_dao(&self.pool)
    }

    pub fn apply_migration<T>(&self, migration: T) -> Result<(), Error>
    where
        T: FnOnce(&InnerConnType, &mut dyn std::io::Write) -> Result<(), RunMigrationsError>,
    {
        let conn = self.conn()?;
        let mut output = Vec::new();
        migration(&*conn, &mut output)?;

        for line in String::from_utf8_lossy(&output).lines() {
            log::info!("{}", line);
        }
        Ok(())
    }
}

/// Runs `f` in a read-write (`BEGIN IMMEDIATE`) transaction on the blocking pool.
///
/// The transaction commits when `f` returns `Ok` and rolls back otherwise.
/// The connection goes back to the pool on every exit path.
pub async fn do_with_transaction<R, E, F>(
    pool: &PoolType,
    label: &'static str,
    f: F,
) -> Result<R, E>
where
    F: FnOnce(&ConnType) -> Result<R, E> + Send + 'static,
    R: Send + 'static,
    E: From<diesel::result::Error>
        + From<r2d2::Error>
        + From<tokio::task::JoinError>
        + Send
        + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let conn = pool.get()?;
        let result = conn.immediate_transaction(|| f(&conn));
        log::trace!("{} took {:?}", label, started.elapsed());
        result
    })
    .await?
}

/// Like [`do_with_transaction`] but opens a deferred transaction, which never
/// takes the write lock unless `f` writes.
pub async fn readonly_transaction<R, E, F>(
    pool: &PoolType,
    label: &'static str,
    f: F,
) -> Result<R, E>
where
    F: FnOnce(&ConnType) -> Result<R, E> + Send + 'static,
    R: Send + 'static,
    E: From<diesel::result::Error>
        + From<r2d2::Error>
        + From<tokio::task::JoinError>
        + Send
        + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let conn = pool.get()?;
        let result = conn.transaction(|| f(&conn));
        log::trace!("{} took {:?}", label, started.elapsed());
        result
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::RunQueryDsl;

    const SCHEMA: &str = "CREATE TABLE parent (id INTEGER PRIMARY KEY NOT NULL); \
        CREATE TABLE child (id INTEGER PRIMARY KEY NOT NULL, \
            parent_id INTEGER NOT NULL REFERENCES parent(id));";

    fn prepare(db: &DbExecutor) -> anyhow::Result<()> {
        db.conn()?.batch_execute(SCHEMA)?;
        Ok(())
    }

    fn insert_parent(conn: &ConnType, id: i32) -> Result<usize, Error> {
        Ok(diesel::sql_query(format!("INSERT INTO parent (id) VALUES ({})", id)).execute(conn)?)
    }

    #[actix_rt::test]
    async fn failed_transaction_is_rolled_back() -> anyhow::Result<()> {
        let dir = tempdir::TempDir::new("executor")?;
        let db = DbExecutor::from_data_dir(dir.path(), "test")?;
        prepare(&db)?;

        let result: Result<(), Error> = do_with_transaction(&db.pool, "test", |conn| {
            insert_parent(conn, 1)?;
            Err(diesel::result::Error::RollbackTransaction.into())
        })
        .await;
        assert!(result.is_err());

        // the first insert did not survive, so the same key is free again
        let inserted: usize =
            do_with_transaction(&db.pool, "test", |conn| insert_parent(conn, 1)).await?;
        assert_eq!(inserted, 1);
        Ok(())
    }

    #[actix_rt::test]
    async fn foreign_keys_are_enforced() -> anyhow::Result<()> {
        let db = DbExecutor::in_memory()?;
        prepare(&db)?;

        let result: Result<usize, Error> = do_with_transaction(&db.pool, "test", |conn| {
            Ok(
                diesel::sql_query("INSERT INTO child (id, parent_id) VALUES (1, 42)")
                    .execute(conn)?,
            )
        })
        .await;
        assert!(matches!(result, Err(Error::Query(_))));
        Ok(())
    }

    #[actix_rt::test]
    async fn readonly_transaction_sees_committed_rows() -> anyhow::Result<()> {
        let db = DbExecutor::in_memory()?;
        prepare(&db)?;

        do_with_transaction(&db.pool, "test", |conn| insert_parent(conn, 7)).await?;
        let duplicate: Result<usize, Error> =
            readonly_transaction(&db.pool, "test", |conn| insert_parent(conn, 7)).await;
        assert!(duplicate.is_err());
        Ok(())
    }
}
