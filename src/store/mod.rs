//! Record model and the table-storage seam.
//!
//! [`RecordStore`] is the async trait both flows depend on; [`DynamoStore`]
//! implements it against AWS DynamoDB.

mod dynamodb;

pub use dynamodb::DynamoStore;

use anyhow::Result;
use chrono::{DateTime, Utc};

/// The persisted name/secret/timestamp triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub secret: String,
    pub recorded_at: DateTime<Utc>,
}

/// Abstraction over the key-value table holding [`Record`]s.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Writes one record. Repeated writes under the same name are allowed;
    /// deduplication is the table's concern, not this trait's.
    async fn put(&self, record: &Record) -> Result<()>;

    /// Returns the secret stored under `name`, or `None` when nothing
    /// matches. When several entries share the name, the most recently
    /// recorded one wins.
    async fn find_secret(&self, name: &str) -> Result<Option<String>>;
}
