use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Database;
use crate::Result;

/// Entry in the feed catalog served over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CatalogedFeed {
    pub id: i64,
    pub name: String,
    pub url: String,
}

/// Data required to add a catalog entry; missing fields read as empty
#[derive(Debug, Clone, Deserialize)]
pub struct NewCatalogFeed {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Minimal List/Insert contract over the catalog store
#[async_trait::async_trait]
pub trait FeedCatalog: Send + Sync {
    /// All entries in insertion order
    async fn list(&self) -> Result<Vec<CatalogedFeed>>;

    /// Store a new entry and return its assigned id
    async fn insert(&self, feed: &NewCatalogFeed) -> Result<i64>;
}

/// Catalog backed by the SQLite `feeds` table
pub struct SqliteFeedCatalog {
    db: Database,
}

impl SqliteFeedCatalog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl FeedCatalog for SqliteFeedCatalog {
    async fn list(&self) -> Result<Vec<CatalogedFeed>> {
        let feeds: Vec<CatalogedFeed> =
            sqlx::query_as("SELECT id, name, url FROM feeds ORDER BY id ASC")
                .fetch_all(self.db.pool())
                .await?;

        Ok(feeds)
    }

    async fn insert(&self, feed: &NewCatalogFeed) -> Result<i64> {
        let result = sqlx::query("INSERT INTO feeds (name, url) VALUES (?, ?)")
            .bind(&feed.name)
            .bind(&feed.url)
            .execute(self.db.pool())
            .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn catalog() -> SqliteFeedCatalog {
        SqliteFeedCatalog::new(Database::in_memory().await.unwrap())
    }

    fn new_feed(name: &str, url: &str) -> NewCatalogFeed {
        NewCatalogFeed {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_catalog_lists_nothing() {
        assert!(catalog().await.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let catalog = catalog().await;

        let first = catalog.insert(&new_feed("One", "https://one.example/feed")).await.unwrap();
        let second = catalog.insert(&new_feed("Two", "https://two.example/feed")).await.unwrap();
        assert!(first > 0);
        assert!(second > first);

        let feeds = catalog.list().await.unwrap();
        assert_eq!(
            feeds,
            vec![
                CatalogedFeed { id: first, name: "One".into(), url: "https://one.example/feed".into() },
                CatalogedFeed { id: second, name: "Two".into(), url: "https://two.example/feed".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_file_backed_catalog_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog").join("feedsync.db");

        {
            let catalog = SqliteFeedCatalog::new(Database::open(&path).await.unwrap());
            catalog.insert(&new_feed("One", "https://one.example/feed")).await.unwrap();
        }

        let catalog = SqliteFeedCatalog::new(Database::open(&path).await.unwrap());
        assert_eq!(catalog.list().await.unwrap().len(), 1);
    }
}
