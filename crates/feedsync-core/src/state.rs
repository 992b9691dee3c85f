//! Persisted subscription state (`config.json`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::feed::FeedSubscription;
use crate::pocket::Credentials;
use crate::{Error, Result};

/// On-disk record holding credentials and every feed's cursor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub feeds: Vec<FeedSubscription>,
}

// A record written before any feed was added may carry `"feeds": null`
fn null_as_empty<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<FeedSubscription>, D::Error> {
    Ok(Option::<Vec<FeedSubscription>>::deserialize(deserializer)?.unwrap_or_default())
}

impl StateFile {
    /// Read the record at `path`, writing an empty default one if it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        match std::fs::read(path) {
            Ok(buf) => serde_json::from_slice(&buf).map_err(|e| {
                Error::Persistence(format!("Invalid state file {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No state file at {}, creating an empty one", path.display());
                let state = Self::default();
                state.save(path)?;
                Ok(state)
            }
            Err(e) => Err(Error::Persistence(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Write the record to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Persistence(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let buf = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, buf)
            .map_err(|e| Error::Persistence(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(path.to_path_buf())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            consumer_key: self.consumer_key.clone(),
            access_token: self.access_token.clone(),
            username: self.username.clone(),
        }
    }

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.consumer_key = credentials.consumer_key;
        self.access_token = credentials.access_token;
        self.username = credentials.username;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_creates_default_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedsync").join("config.json");

        let state = StateFile::load_or_create(&path).unwrap();
        assert_eq!(state, StateFile::default());
        assert!(path.exists());
    }

    #[test]
    fn test_reads_legacy_record_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"consumer_key":"key","access_token":"tok","username":"me",
               "feeds":[{"link":"https://a.example/feed","last_link":""},
                        {"link":"https://b.example/feed","last_link":"https://b.example/1"}]}"#,
        )
        .unwrap();

        let state = StateFile::load_or_create(&path).unwrap();
        assert_eq!(state.credentials().access_token, "tok");
        assert_eq!(
            state.feeds,
            vec![
                FeedSubscription::new("https://a.example/feed"),
                FeedSubscription::with_cursor("https://b.example/feed", "https://b.example/1"),
            ]
        );
    }

    #[test]
    fn test_null_feeds_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"consumer_key":"","access_token":"","username":"","feeds":null}"#)
            .unwrap();

        let state = StateFile::load_or_create(&path).unwrap();
        assert!(state.feeds.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = StateFile::load_or_create(&path).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut state = StateFile::default();
        state.feeds.push(FeedSubscription::with_cursor(
            "https://a.example/feed",
            "https://a.example/3",
        ));
        state.save(&path).unwrap();

        assert_eq!(StateFile::load_or_create(&path).unwrap(), state);
    }
}
