use crate::feed::{FeedSource, FeedSubscription, FetchedItem};
use crate::pocket::ArticlePublisher;
use crate::Result;

/// Result of synchronizing one feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSyncOutcome {
    pub link: String,
    pub published: usize,
    pub cursor_moved: bool,
}

/// Summary of a full sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub feeds: Vec<FeedSyncOutcome>,
}

impl SyncReport {
    pub fn total_published(&self) -> usize {
        self.feeds.iter().map(|f| f.published).sum()
    }
}

/// Pushes unseen feed items to the read-later service, tracking a per-feed cursor.
///
/// Feeds are processed one at a time and items strictly in fetched order. Any
/// fetch or publish error aborts the whole run and no updated cursors are
/// returned, so the caller has nothing to persist.
pub struct SyncEngine<S, P> {
    source: S,
    publisher: P,
}

impl<S: FeedSource, P: ArticlePublisher> SyncEngine<S, P> {
    pub fn new(source: S, publisher: P) -> Self {
        Self { source, publisher }
    }

    /// Synchronize every subscription, returning the updated list in the same order
    pub async fn sync_all(
        &self,
        subscriptions: &[FeedSubscription],
    ) -> Result<(Vec<FeedSubscription>, SyncReport)> {
        let mut updated = Vec::with_capacity(subscriptions.len());
        let mut report = SyncReport::default();

        for subscription in subscriptions {
            let (next, outcome) = self.sync_feed(subscription).await?;
            updated.push(next);
            report.feeds.push(outcome);
        }

        tracing::info!(
            "Sync complete: {} feeds, {} articles published",
            report.feeds.len(),
            report.total_published()
        );

        Ok((updated, report))
    }

    /// Synchronize a single subscription
    pub async fn sync_feed(
        &self,
        subscription: &FeedSubscription,
    ) -> Result<(FeedSubscription, FeedSyncOutcome)> {
        tracing::info!("Syncing feed: {}", subscription.link);

        let items = self.source.fetch(&subscription.link).await?;
        let (cursor, published) = self.publish_unseen(subscription, &items).await?;

        let outcome = FeedSyncOutcome {
            link: subscription.link.clone(),
            published,
            cursor_moved: cursor != subscription.cursor,
        };

        tracing::info!("Feed '{}': {} new articles", subscription.link, published);

        Ok((
            FeedSubscription {
                link: subscription.link.clone(),
                cursor,
            },
            outcome,
        ))
    }

    async fn publish_unseen(
        &self,
        subscription: &FeedSubscription,
        items: &[FetchedItem],
    ) -> Result<(Option<String>, usize)> {
        let stored = subscription.cursor.as_deref();
        let mut candidate: Option<String> = None;
        let mut published = 0;

        for item in items {
            if stored == Some(item.link.as_str()) {
                break;
            }

            self.publisher.publish(&item.link).await?;
            published += 1;
            tracing::debug!(
                "Published {} ({})",
                item.link,
                item.title.as_deref().unwrap_or("untitled")
            );

            if candidate.is_none() {
                candidate = Some(item.link.clone());
            }

            // First sync only takes the newest item, not the whole backlog
            if stored.is_none() {
                break;
            }
        }

        Ok((candidate.or_else(|| subscription.cursor.clone()), published))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct StaticSource {
        feeds: HashMap<String, Vec<FetchedItem>>,
    }

    impl StaticSource {
        fn with(mut self, link: &str, items: &[&str]) -> Self {
            self.feeds.insert(
                link.to_string(),
                items.iter().map(|l| FetchedItem::new(*l)).collect(),
            );
            self
        }
    }

    #[async_trait::async_trait]
    impl FeedSource for StaticSource {
        async fn fetch(&self, link: &str) -> Result<Vec<FetchedItem>> {
            self.feeds
                .get(link)
                .cloned()
                .ok_or_else(|| Error::Service { status: 404, detail: Some(link.to_string()) })
        }
    }

    #[derive(Default, Clone)]
    struct RecordingPublisher {
        published: Arc<Mutex<Vec<String>>>,
        fail_on: Option<String>,
    }

    impl RecordingPublisher {
        fn failing_on(link: &str) -> Self {
            Self {
                published: Arc::default(),
                fail_on: Some(link.to_string()),
            }
        }

        fn published(&self) -> Vec<String> {
            self.published.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ArticlePublisher for RecordingPublisher {
        async fn publish(&self, url: &str) -> Result<()> {
            if self.fail_on.as_deref() == Some(url) {
                return Err(Error::Service { status: 503, detail: None });
            }
            self.published.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    const FEED: &str = "https://example.com/feed";

    fn abc_source() -> StaticSource {
        StaticSource::default().with(FEED, &["a", "b", "c"])
    }

    #[tokio::test]
    async fn test_bootstrap_publishes_only_newest() {
        let publisher = RecordingPublisher::default();
        let engine = SyncEngine::new(abc_source(), publisher.clone());

        let (updated, report) = engine.sync_all(&[FeedSubscription::new(FEED)]).await.unwrap();

        assert_eq!(publisher.published(), vec!["a".to_string()]);
        assert_eq!(updated, vec![FeedSubscription::with_cursor(FEED, "a")]);
        assert_eq!(report.total_published(), 1);
    }

    #[tokio::test]
    async fn test_incremental_publishes_items_before_cursor() {
        let publisher = RecordingPublisher::default();
        let engine = SyncEngine::new(abc_source(), publisher.clone());

        let (updated, _) = engine
            .sync_all(&[FeedSubscription::with_cursor(FEED, "b")])
            .await
            .unwrap();

        assert_eq!(publisher.published(), vec!["a".to_string()]);
        assert_eq!(updated[0].cursor.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_cursor_at_newest_is_noop() {
        let publisher = RecordingPublisher::default();
        let engine = SyncEngine::new(abc_source(), publisher.clone());
        let subs = vec![FeedSubscription::with_cursor(FEED, "a")];

        let (updated, report) = engine.sync_all(&subs).await.unwrap();

        assert!(publisher.published().is_empty());
        assert_eq!(updated, subs);
        assert!(!report.feeds[0].cursor_moved);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let publisher = RecordingPublisher::default();
        let source = StaticSource::default().with(FEED, &["a", "b", "c", "d"]);
        let engine = SyncEngine::new(source, publisher.clone());

        let (first, _) = engine
            .sync_all(&[FeedSubscription::with_cursor(FEED, "c")])
            .await
            .unwrap();
        assert_eq!(publisher.published(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(first[0].cursor.as_deref(), Some("a"));

        let (second, report) = engine.sync_all(&first).await.unwrap();
        assert_eq!(publisher.published().len(), 2);
        assert_eq!(second, first);
        assert_eq!(report.total_published(), 0);
    }

    #[tokio::test]
    async fn test_cursor_missing_from_feed_publishes_everything() {
        let publisher = RecordingPublisher::default();
        let engine = SyncEngine::new(abc_source(), publisher.clone());

        let (updated, _) = engine
            .sync_all(&[FeedSubscription::with_cursor(FEED, "gone")])
            .await
            .unwrap();

        assert_eq!(publisher.published(), vec!["a", "b", "c"]);
        assert_eq!(updated[0].cursor.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_empty_feed_leaves_cursor_unset() {
        let publisher = RecordingPublisher::default();
        let source = StaticSource::default().with(FEED, &[]);
        let engine = SyncEngine::new(source, publisher.clone());

        let (updated, _) = engine.sync_all(&[FeedSubscription::new(FEED)]).await.unwrap();
        assert!(updated[0].is_bootstrap());
    }

    #[tokio::test]
    async fn test_publish_failure_aborts_run() {
        let publisher = RecordingPublisher::failing_on("b");
        let source = abc_source().with("https://other.example/feed", &["x", "y"]);
        let engine = SyncEngine::new(source, publisher.clone());

        let subs = vec![
            FeedSubscription::with_cursor("https://other.example/feed", "y"),
            FeedSubscription::with_cursor(FEED, "c"),
        ];
        let err = engine.sync_all(&subs).await.unwrap_err();

        assert!(matches!(err, Error::Service { status: 503, .. }));
        // "x" went out before the failure on the second feed
        assert_eq!(publisher.published(), vec!["x", "a"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_before_later_feeds() {
        let publisher = RecordingPublisher::default();
        let engine = SyncEngine::new(abc_source(), publisher.clone());

        let subs = vec![
            FeedSubscription::new("https://missing.example/feed"),
            FeedSubscription::new(FEED),
        ];
        let err = engine.sync_all(&subs).await.unwrap_err();

        assert!(matches!(err, Error::Service { status: 404, .. }));
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_feeds_are_independent() {
        let publisher = RecordingPublisher::default();
        let source = abc_source().with("https://other.example/feed", &["x", "y"]);
        let engine = SyncEngine::new(source, publisher.clone());

        let subs = vec![
            FeedSubscription::with_cursor(FEED, "b"),
            FeedSubscription::new("https://other.example/feed"),
        ];
        let (updated, report) = engine.sync_all(&subs).await.unwrap();

        assert_eq!(publisher.published(), vec!["a", "x"]);
        assert_eq!(
            updated,
            vec![
                FeedSubscription::with_cursor(FEED, "a"),
                FeedSubscription::with_cursor("https://other.example/feed", "x"),
            ]
        );
        assert_eq!(report.feeds.len(), 2);
    }
}
