use anyhow::Result;

use feedsync_core::Session;

pub fn run(session: &Session) -> Result<()> {
    let feeds = session.subscriptions();

    if feeds.is_empty() {
        println!("No subscriptions yet.");
        println!("\nTo subscribe to a feed, run:");
        println!("  feedsync add <link>");
        return Ok(());
    }

    println!("Subscriptions ({}):\n", feeds.len());

    for (i, feed) in feeds.iter().enumerate() {
        println!("  [{}] {}", i + 1, feed.link);
        match &feed.cursor {
            Some(last) => println!("      Last synced: {}", last),
            None => println!("      Never synced"),
        }
    }

    Ok(())
}
