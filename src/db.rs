use crate::config::DatabaseConfig;
use crate::error::{FarmError, Result};
use libsql::{Builder, Connection, Database};
use std::env;
use tracing::info;

pub struct DatabaseManager {
    db: Database,
}

fn db_error(context: &str) -> impl Fn(libsql::Error) -> FarmError + '_ {
    move |e| FarmError::Database {
        message: format!("{context}: {e}"),
    }
}

impl DatabaseManager {
    /// Open the configured database: a local file when `local_path` is set,
    /// otherwise Turso via `LIBSQL_URL` / `LIBSQL_AUTH_TOKEN`.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = match &config.local_path {
            Some(path) => {
                info!("Opening local libSQL database at {}", path);
                Builder::new_local(path)
                    .build()
                    .await
                    .map_err(db_error("Failed to open database"))?
            }
            None => {
                let url = env::var("LIBSQL_URL").map_err(|_| FarmError::Database {
                    message: "LIBSQL_URL environment variable not set".to_string(),
                })?;
                let auth_token = env::var("LIBSQL_AUTH_TOKEN").map_err(|_| FarmError::Database {
                    message: "LIBSQL_AUTH_TOKEN environment variable not set".to_string(),
                })?;

                info!("Connecting to Turso database at {}", url);
                Builder::new_remote(url, auth_token)
                    .build()
                    .await
                    .map_err(db_error("Failed to connect to database"))?
            }
        };

        Ok(Self { db })
    }

    /// Get a connection to the database
    pub fn get_connection(&self) -> Result<Connection> {
        self.db
            .connect()
            .map_err(db_error("Failed to get database connection"))
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        let conn = self.get_connection()?;
        let migration_sql = include_str!("../migrations/001_create_records.sql");
        conn.execute_batch(migration_sql)
            .await
            .map_err(db_error("Failed to run migrations"))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Create or replace a record row, keeping its original position and
    /// creation time.
    pub async fn upsert_record(&self, kind: &str, id: &str, data: &str) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO records (id, kind, data, seq, created_at, updated_at) \
             VALUES (?1, ?2, ?3, (SELECT COALESCE(MAX(seq), 0) + 1 FROM records), datetime('now'), datetime('now')) \
             ON CONFLICT (kind, id) DO UPDATE SET data = excluded.data, updated_at = datetime('now')",
            libsql::params![id, kind, data],
        )
        .await
        .map_err(db_error("Failed to upsert record"))?;

        Ok(())
    }

    pub async fn get_record(&self, kind: &str, id: &str) -> Result<Option<String>> {
        let conn = self.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT data FROM records WHERE kind = ?1 AND id = ?2",
                libsql::params![kind, id],
            )
            .await
            .map_err(db_error("Failed to query record"))?;

        match rows.next().await.map_err(db_error("Failed to read row"))? {
            Some(row) => {
                let data: String = row.get(0).map_err(db_error("Failed to get data"))?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    pub async fn list_records(&self, kind: &str) -> Result<Vec<String>> {
        let conn = self.get_connection()?;
        let mut rows = conn
            .query(
                "SELECT data FROM records WHERE kind = ?1 ORDER BY seq",
                libsql::params![kind],
            )
            .await
            .map_err(db_error("Failed to query records"))?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_error("Failed to read row"))? {
            let data: String = row.get(0).map_err(db_error("Failed to get data"))?;
            results.push(data);
        }
        Ok(results)
    }

    pub async fn delete_record(&self, kind: &str, id: &str) -> Result<bool> {
        let conn = self.get_connection()?;
        let affected = conn
            .execute(
                "DELETE FROM records WHERE kind = ?1 AND id = ?2",
                libsql::params![kind, id],
            )
            .await
            .map_err(db_error("Failed to delete record"))?;
        Ok(affected > 0)
    }

    /// Clear all data from the database (useful for development)
    pub async fn clear_all_data(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute("DELETE FROM records", libsql::params![])
            .await
            .map_err(db_error("Failed to clear records"))?;

        info!("Cleared all data from database");
        Ok(())
    }
}
