use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A tracked feed plus the cursor marking how far it has been synchronized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSubscription {
    pub link: String,
    /// Link of the most recently synchronized article; `None` until the first sync
    #[serde(
        rename = "last_link",
        default,
        serialize_with = "serialize_cursor",
        deserialize_with = "deserialize_cursor"
    )]
    pub cursor: Option<String>,
}

impl FeedSubscription {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            cursor: None,
        }
    }

    pub fn with_cursor(link: impl Into<String>, cursor: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            cursor: Some(cursor.into()),
        }
    }

    /// Check if the feed has never been synchronized
    pub fn is_bootstrap(&self) -> bool {
        self.cursor.is_none()
    }
}

/// An item as returned by a feed fetch, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedItem {
    pub link: String,
    pub title: Option<String>,
}

impl FetchedItem {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: None,
        }
    }
}

// The state record stores "never synchronized" as an empty string
fn serialize_cursor<S: Serializer>(cursor: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(cursor.as_deref().unwrap_or(""))
}

fn deserialize_cursor<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
