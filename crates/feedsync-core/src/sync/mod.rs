mod engine;

pub use engine::{FeedSyncOutcome, SyncEngine, SyncReport};
