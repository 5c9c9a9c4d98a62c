use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use tokio::fs;

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

/// Create the sqlx pool used for audit writes and seeding.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<OrmConn> {
    let conn = Database::connect(database_url).await?;
    Ok(conn)
}

/// Apply the `.sql` files in `migrations/` in filename order.
///
/// Applied files are recorded in `schema_migrations` and skipped on later
/// runs. The whole run holds an advisory lock so concurrent callers apply
/// each file once.
pub async fn run_migrations(conn: &OrmConn) -> Result<()> {
    const MIGRATION_LOCK: i64 = 0x6576_656e_7473;

    let mut files: Vec<PathBuf> = Vec::new();
    let mut entries = fs::read_dir("migrations").await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();

    let backend = conn.get_database_backend();
    let txn = conn.begin().await?;
    txn.execute(Statement::from_sql_and_values(
        backend,
        "SELECT pg_advisory_xact_lock($1)",
        [MIGRATION_LOCK.into()],
    ))
    .await?;
    txn.execute(Statement::from_string(
        backend,
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            filename TEXT PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    ))
    .await?;

    for file in files {
        let name = file
            .file_name()
            .and_then(|name| name.to_str())
            .context("migration file name is not valid UTF-8")?
            .to_string();

        let applied = txn
            .query_one(Statement::from_sql_and_values(
                backend,
                "SELECT 1 FROM schema_migrations WHERE filename = $1",
                [name.clone().into()],
            ))
            .await?;
        if applied.is_some() {
            continue;
        }

        tracing::debug!(file = %name, "applying migration");
        let sql = fs::read_to_string(&file).await?;
        // One command per prepared statement.
        for stmt in sql.split(';').map(str::trim).filter(|stmt| !stmt.is_empty()) {
            txn.execute(Statement::from_string(backend, stmt.to_string()))
                .await
                .with_context(|| format!("migration {name} failed"))?;
        }
        txn.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO schema_migrations (filename) VALUES ($1)",
            [name.clone().into()],
        ))
        .await?;
        tracing::info!(file = %name, "migration applied");
    }

    txn.commit().await?;
    Ok(())
}
