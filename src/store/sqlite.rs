use async_trait::async_trait;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Image, Message, PageRequest};
use crate::store::ContentStore;

/// Durable table-backed store
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn list_images(&self, page: PageRequest) -> Result<(Vec<Image>, u64)> {
        // Page and total come from the same snapshot
        let mut tx = self.db.pool().begin().await?;

        let images: Vec<Image> =
            sqlx::query_as("SELECT id, filename, data FROM images ORDER BY id LIMIT ? OFFSET ?")
                .bind(i64::from(page.limit))
                .bind(page.offset() as i64)
                .fetch_all(&mut *tx)
                .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM images")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((images, total as u64))
    }

    async fn count_images(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM images")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count as u64)
    }

    async fn add_image(&self, filename: &str, data: &str, max_files: u64) -> Result<Option<Image>> {
        // One statement, so SQLite evaluates the count and the insert under the same write lock
        let image: Option<Image> = sqlx::query_as(
            r#"
            INSERT INTO images (filename, data)
            SELECT ?, ? WHERE (SELECT COUNT(*) FROM images) < ?
            RETURNING id, filename, data
            "#,
        )
        .bind(filename)
        .bind(data)
        .bind(i64::try_from(max_files).unwrap_or(i64::MAX))
        .fetch_optional(self.db.pool())
        .await?;

        Ok(image)
    }

    async fn delete_image(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM images WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn image_data_bytes(&self) -> Result<u64> {
        let bytes: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(LENGTH(data)), 0) FROM images")
            .fetch_one(self.db.pool())
            .await?;
        Ok(bytes as u64)
    }

    async fn list_messages(&self) -> Result<Vec<Message>> {
        let messages: Vec<Message> = sqlx::query_as("SELECT id, text FROM messages ORDER BY id")
            .fetch_all(self.db.pool())
            .await?;
        Ok(messages)
    }

    async fn count_messages(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count as u64)
    }

    async fn add_message(&self, text: &str) -> Result<Message> {
        let message: Message =
            sqlx::query_as("INSERT INTO messages (text) VALUES (?) RETURNING id, text")
                .bind(text)
                .fetch_one(self.db.pool())
                .await?;
        Ok(message)
    }

    async fn delete_message(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
