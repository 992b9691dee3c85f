use anyhow::Result;

use feedsync_core::Session;

pub fn run(session: &mut Session, index: usize) -> Result<()> {
    let removed = session.remove(index)?;
    session.save()?;

    println!("Unsubscribed from: {}", removed.link);
    Ok(())
}
