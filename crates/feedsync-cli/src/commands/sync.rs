use anyhow::Result;

use feedsync_core::{AppConfig, Session};

use super::build_engine;

pub async fn run(session: &mut Session, config: &AppConfig) -> Result<()> {
    let engine = build_engine(config, session.credentials())?;

    if session.subscriptions().is_empty() {
        println!("No subscriptions to sync.");
        return Ok(());
    }

    println!("Syncing {} feeds...\n", session.subscriptions().len());

    // Nothing is persisted unless every feed succeeds
    let (updated, report) = engine.sync_all(session.subscriptions()).await?;
    session.replace_subscriptions(updated);
    session.save()?;

    for outcome in &report.feeds {
        println!("  {}: {} new", outcome.link, outcome.published);
    }
    println!("\nSync complete. {} articles sent.", report.total_published());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{config_for, rss, session};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn feed_server(links: &[&str]) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(ResponseTemplate::new(200).set_body_string(rss(links)))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_sync_persists_cursor() {
        let feeds = feed_server(&["https://x.example/2", "https://x.example/1"]).await;
        let pocket = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/add"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&pocket)
            .await;

        let (dir, mut session) = session(true);
        session.add(&format!("{}/feed", feeds.uri())).unwrap();

        run(&mut session, &config_for(&pocket.uri())).await.unwrap();

        let reopened = Session::open(dir.path().join("config.json")).unwrap();
        assert_eq!(
            reopened.subscriptions()[0].cursor.as_deref(),
            Some("https://x.example/2")
        );
    }

    #[tokio::test]
    async fn test_failed_run_persists_nothing() {
        let feeds = feed_server(&["https://x.example/3", "https://x.example/2", "https://x.example/1"]).await;
        let pocket = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/add"))
            .respond_with(ResponseTemplate::new(500).insert_header("X-Error", "down"))
            .mount(&pocket)
            .await;

        let (dir, mut session) = session(true);
        let link = format!("{}/feed", feeds.uri());
        session.add(&link).unwrap();
        let mut subs = session.subscriptions().to_vec();
        subs[0].cursor = Some("https://x.example/1".into());
        session.replace_subscriptions(subs);
        session.save().unwrap();

        let err = run(&mut session, &config_for(&pocket.uri())).await.unwrap_err();
        assert!(err.to_string().contains("500"));

        let reopened = Session::open(dir.path().join("config.json")).unwrap();
        assert_eq!(
            reopened.subscriptions()[0].cursor.as_deref(),
            Some("https://x.example/1")
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_sync_is_rejected() {
        let (_dir, mut session) = session(false);
        session.add("https://a.example/feed").unwrap();

        let err = run(&mut session, &AppConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("Not authenticated"));
    }
}
