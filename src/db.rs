//! SQLite connection pool plumbing shared by the application and tests.

use diesel::SqliteConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};

/// Connection pool over the SQLite database.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
/// Single pooled connection checked out of a [`DbPool`].
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Builds an r2d2 pool for the given database URL (a file path for SQLite).
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder().build(manager)
}
