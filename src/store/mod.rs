pub mod memory;
pub mod provider;
pub mod sqlite;

pub use memory::*;
pub use provider::*;
pub use sqlite::*;

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, Result};

/// Persistence backend selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Some(StoreBackend::Sqlite),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

/// Build the content store named by the configuration
pub async fn create_store(config: &Config) -> Result<Arc<dyn ContentStore>> {
    let backend = StoreBackend::from_str(&config.storage.backend).ok_or_else(|| {
        AppError::Internal(format!("Unknown storage backend: {}", config.storage.backend))
    })?;

    match backend {
        StoreBackend::Sqlite => {
            let db = Database::new(&config.database.path, config.database.max_connections).await?;
            db.run_migrations().await?;
            tracing::info!("Using SQLite store at {}", config.database.path);
            Ok(Arc::new(SqliteStore::new(db)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; content is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PageRequest, DEFAULT_MESSAGES};

    async fn sqlite_store() -> SqliteStore {
        let db = Database::connect("sqlite::memory:", 1).await.unwrap();
        db.run_migrations().await.unwrap();
        SqliteStore::new(db)
    }

    async fn backends() -> Vec<Box<dyn ContentStore>> {
        let memory: Box<dyn ContentStore> = Box::new(MemoryStore::new());
        let sqlite: Box<dyn ContentStore> = Box::new(sqlite_store().await);
        vec![memory, sqlite]
    }

    async fn fill(store: &dyn ContentStore, n: usize) -> Vec<i64> {
        let mut ids = Vec::new();
        for i in 0..n {
            let image = store
                .add_image(&format!("img{}.png", i), "aGVsbG8=", u64::MAX)
                .await
                .unwrap()
                .unwrap();
            ids.push(image.id);
        }
        ids
    }

    #[test]
    fn backend_names_parse() {
        assert_eq!(StoreBackend::from_str(" SQLite "), Some(StoreBackend::Sqlite));
        assert_eq!(StoreBackend::from_str("memory"), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::from_str("postgres"), None);
        assert_eq!(StoreBackend::Memory.as_str(), "memory");
    }

    #[tokio::test]
    async fn unknown_backend_fails_startup() {
        let mut config = Config::default();
        config.storage.backend = "redis".to_string();
        assert!(create_store(&config).await.is_err());
    }

    #[tokio::test]
    async fn image_ids_increase_and_are_never_reused() {
        for store in backends().await {
            let ids = fill(store.as_ref(), 3).await;
            assert!(ids.windows(2).all(|w| w[0] < w[1]), "{}", store.backend_name());

            assert!(store.delete_image(ids[2]).await.unwrap());
            let next = fill(store.as_ref(), 1).await;
            assert!(next[0] > ids[2], "{} reused an id", store.backend_name());
        }
    }

    #[tokio::test]
    async fn add_image_refuses_when_full() {
        for store in backends().await {
            fill(store.as_ref(), 2).await;
            let refused = store.add_image("extra.png", "eA==", 2).await.unwrap();
            assert!(refused.is_none(), "{}", store.backend_name());
            assert_eq!(store.count_images().await.unwrap(), 2);

            let accepted = store.add_image("extra.png", "eA==", 3).await.unwrap();
            assert!(accepted.is_some());
            assert_eq!(store.count_images().await.unwrap(), 3);
        }
    }

    #[tokio::test]
    async fn pages_slice_the_collection() {
        for store in backends().await {
            let ids = fill(store.as_ref(), 15).await;

            let (first, total) = store.list_images(PageRequest { page: 1, limit: 10 }).await.unwrap();
            assert_eq!(total, 15);
            assert_eq!(first.len(), 10);
            assert_eq!(first[0].id, ids[0]);

            let (second, _) = store.list_images(PageRequest { page: 2, limit: 10 }).await.unwrap();
            assert_eq!(second.len(), 5);
            assert_eq!(second[4].id, ids[14]);

            let (beyond, total) = store.list_images(PageRequest { page: 9, limit: 10 }).await.unwrap();
            assert!(beyond.is_empty());
            assert_eq!(total, 15);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sqlite_listing_total_matches_page_under_concurrent_inserts() {
        let store = Arc::new(sqlite_store().await);

        let writers: Vec<_> = (0..40)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .add_image(&format!("w{}.png", i), "eA==", u64::MAX)
                        .await
                        .unwrap();
                })
            })
            .collect();

        let readers: Vec<_> = (0..40)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let (images, total) = store
                        .list_images(PageRequest { page: 1, limit: 100 })
                        .await
                        .unwrap();
                    assert_eq!(images.len() as u64, total);
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.await.unwrap();
        }
        assert_eq!(store.count_images().await.unwrap(), 40);
    }

    #[tokio::test]
    async fn deleting_absent_rows_changes_nothing() {
        for store in backends().await {
            fill(store.as_ref(), 2).await;
            assert!(!store.delete_image(999).await.unwrap());
            assert_eq!(store.count_images().await.unwrap(), 2);

            assert!(!store.delete_message(999).await.unwrap());
            assert_eq!(
                store.count_messages().await.unwrap(),
                DEFAULT_MESSAGES.len() as u64
            );
        }
    }

    #[tokio::test]
    async fn messages_round_trip() {
        for store in backends().await {
            let seeded = store.list_messages().await.unwrap();
            assert_eq!(seeded.len(), DEFAULT_MESSAGES.len());

            let added = store.add_message("ribbit").await.unwrap();
            assert!(seeded.iter().all(|m| m.id < added.id));
            assert_eq!(added.text, "ribbit");

            assert!(store.delete_message(added.id).await.unwrap());
            assert!(!store.delete_message(added.id).await.unwrap());
        }
    }

    #[tokio::test]
    async fn data_bytes_sum_stored_text() {
        for store in backends().await {
            assert_eq!(store.image_data_bytes().await.unwrap(), 0);
            fill(store.as_ref(), 2).await;
            assert_eq!(store.image_data_bytes().await.unwrap(), 16);
        }
    }
}
