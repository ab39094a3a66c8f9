//! Object-storage access.
//!
//! [`ObjectFetcher`] is the async trait for reading one stored object in
//! full; [`S3Fetcher`] implements it against AWS S3.

mod s3;

pub use s3::S3Fetcher;

use anyhow::Result;

/// Fetches the complete content of one stored object.
#[async_trait::async_trait]
pub trait ObjectFetcher: Send + Sync {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}
