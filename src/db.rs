use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::error::Result;
use crate::models::DEFAULT_MESSAGES;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database file at `path`
    pub async fn new(path: &str, max_connections: u32) -> Result<Self> {
        let url = format!("sqlite:{}?mode=rwc", path);
        Self::connect(&url, max_connections).await
    }

    /// Connect to an arbitrary SQLite URL, e.g. `sqlite::memory:`
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        // AUTOINCREMENT keeps ids from being reused after deletes
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                data TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        self.seed_messages().await?;

        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Insert the default messages unless the table has ever held a row
    async fn seed_messages(&self) -> Result<()> {
        let sequence: Option<i64> =
            sqlx::query_scalar("SELECT seq FROM sqlite_sequence WHERE name = 'messages'")
                .fetch_optional(&self.pool)
                .await?;

        if sequence.is_some() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for text in DEFAULT_MESSAGES {
            sqlx::query("INSERT INTO messages (text) VALUES (?)")
                .bind(text)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        tracing::info!("Seeded {} default messages", DEFAULT_MESSAGES.len());
        Ok(())
    }
}
