mod fetcher;
mod models;
mod parser;

pub use fetcher::{FeedFetcher, FeedSource};
pub use models::{FeedSubscription, FetchedItem};
pub use parser::parse_feed;
