use anyhow::Result;

use feedsync_core::{AppConfig, Session};

use super::build_engine;

pub async fn run(session: &mut Session, config: &AppConfig, link: &str, sync: bool) -> Result<()> {
    let position = session.add(link)?;
    session.save()?;
    println!("Subscribed to {} [{}]", link.trim(), position);

    if !sync {
        return Ok(());
    }

    let mut subscriptions = session.subscriptions().to_vec();
    let index = position - 1;

    let result = match build_engine(config, session.credentials()) {
        Ok(engine) => engine.sync_feed(&subscriptions[index]).await,
        Err(e) => Err(e),
    };

    match result {
        Ok((updated, outcome)) => {
            subscriptions[index] = updated;
            session.replace_subscriptions(subscriptions);
            session.save()?;
            println!("Synced {} new articles.", outcome.published);
            Ok(())
        }
        Err(e) => {
            println!("The subscription was created, but the initial sync failed.");
            println!("Try running 'feedsync sync' later.");
            Err(e.into())
        }
    }
}
