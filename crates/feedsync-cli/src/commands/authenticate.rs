use anyhow::Result;

use feedsync_core::{AppConfig, AuthorizationCoordinator, Error, Session};

pub async fn run(
    session: &mut Session,
    config: &AppConfig,
    overwrite: bool,
    consumer_key: Option<String>,
) -> Result<()> {
    let consumer_key = resolve_consumer_key(session, overwrite, consumer_key)?;

    let coordinator = AuthorizationCoordinator::from_config(config)?;
    let credentials = coordinator
        .authorize(&consumer_key, |url| {
            println!("Go to {} to continue", url);
            if let Err(e) = open::that(url.as_str()) {
                tracing::warn!("Could not open a browser: {}", e);
            }
        })
        .await?;

    let username = credentials.username.clone();
    session.set_credentials(credentials);
    let path = session.save()?;

    println!("Username: {}", username);
    println!("\nConfiguration written to {}", path.display());

    Ok(())
}

/// Pick the consumer key to authenticate with, refusing to clobber a working token
fn resolve_consumer_key(
    session: &Session,
    overwrite: bool,
    consumer_key: Option<String>,
) -> feedsync_core::Result<String> {
    let existing = session.credentials();

    if existing.is_authorized() && !overwrite {
        return Err(Error::validation(format!(
            "Already authenticated as '{}'. Use --overwrite to replace the stored credentials.",
            existing.username
        )));
    }

    consumer_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| Some(existing.consumer_key).filter(|k| !k.is_empty()))
        .ok_or_else(|| {
            Error::validation("No consumer key configured. Pass --consumer-key=<key>.")
        })
}
