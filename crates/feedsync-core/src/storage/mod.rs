mod catalog;
mod database;

pub use catalog::{CatalogedFeed, FeedCatalog, NewCatalogFeed, SqliteFeedCatalog};
pub use database::Database;
