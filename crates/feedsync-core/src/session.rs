use std::path::{Path, PathBuf};

use url::Url;

use crate::feed::FeedSubscription;
use crate::pocket::Credentials;
use crate::state::StateFile;
use crate::{Error, Result};

/// Working copy of the persisted state for one command invocation.
///
/// Mutations stay in memory until [`Session::save`] is called, so a failed
/// operation never touches the file on disk.
pub struct Session {
    state: StateFile,
    path: PathBuf,
}

impl Session {
    /// Load the state at `path`, creating an empty record if none exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = StateFile::load_or_create(&path)?;
        Ok(Self { state, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn subscriptions(&self) -> &[FeedSubscription] {
        &self.state.feeds
    }

    /// Subscribe to `link`, returning its 1-based position
    pub fn add(&mut self, link: &str) -> Result<usize> {
        let link = link.trim();
        if link.is_empty() {
            return Err(Error::validation("Feed link must not be empty"));
        }
        Url::parse(link).map_err(|e| Error::validation(format!("Invalid feed link '{}': {}", link, e)))?;

        if self.state.feeds.iter().any(|f| f.link == link) {
            return Err(Error::validation(format!("Already subscribed to {}", link)));
        }

        self.state.feeds.push(FeedSubscription::new(link));
        Ok(self.state.feeds.len())
    }

    /// Remove the subscription at a 1-based position as shown by `list`
    pub fn remove(&mut self, index: usize) -> Result<FeedSubscription> {
        let len = self.state.feeds.len();
        if index == 0 || index > len {
            return Err(Error::validation(format!(
                "No subscription at index {} (have {})",
                index, len
            )));
        }
        Ok(self.state.feeds.remove(index - 1))
    }

    pub fn credentials(&self) -> Credentials {
        self.state.credentials()
    }

    /// Replace credentials, keeping subscriptions intact
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.state.set_credentials(credentials);
    }

    /// Install the cursors produced by a completed sync run
    pub fn replace_subscriptions(&mut self, subscriptions: Vec<FeedSubscription>) {
        self.state.feeds = subscriptions;
    }

    /// Persist the current state
    pub fn save(&self) -> Result<PathBuf> {
        self.state.save(&self.path)
    }
}
