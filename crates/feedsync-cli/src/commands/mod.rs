pub mod add;
pub mod authenticate;
pub mod list;
pub mod remove;
pub mod sync;

use feedsync_core::{
    feed::FeedFetcher,
    pocket::{Credentials, PocketClient},
    AppConfig, Error, SyncEngine,
};

/// Build a sync engine that publishes with the stored credentials
pub(crate) fn build_engine(
    config: &AppConfig,
    credentials: Credentials,
) -> feedsync_core::Result<SyncEngine<FeedFetcher, PocketClient>> {
    if !credentials.is_authorized() {
        return Err(Error::validation(
            "Not authenticated. Run `feedsync authenticate` first.",
        ));
    }

    let fetcher = FeedFetcher::new(config)?;
    let client = PocketClient::new(&config.pocket)?.with_credentials(credentials);
    Ok(SyncEngine::new(fetcher, client))
}

#[cfg(test)]
pub(crate) mod test_support {
    use feedsync_core::{pocket::Credentials, AppConfig, Session};

    /// Fresh session in a temp dir, optionally carrying an access token
    pub fn session(authorized: bool) -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::open(dir.path().join("config.json")).unwrap();
        if authorized {
            session.set_credentials(Credentials {
                consumer_key: "key".into(),
                access_token: "token".into(),
                username: "reader".into(),
            });
        }
        (dir, session)
    }

    pub fn config_for(pocket_base_url: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.pocket.base_url = pocket_base_url.to_string();
        config
    }

    pub fn rss(links: &[&str]) -> String {
        let items: String = links
            .iter()
            .map(|l| format!("<item><title>{l}</title><link>{l}</link></item>"))
            .collect();
        format!(r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title>{items}</channel></rss>"#)
    }
}
