use anyhow::{Context, Result};

use super::ObjectFetcher;

/// Reads objects from AWS S3.
pub struct S3Fetcher {
    client: aws_sdk_s3::Client,
}

impl S3Fetcher {
    /// Creates a fetcher using the ambient AWS configuration already loaded
    /// by `aws_config::load_from_env`.
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
        }
    }
}

#[async_trait::async_trait]
impl ObjectFetcher for S3Fetcher {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("GetObject failed for 's3://{bucket}/{key}'"))?;

        let body = resp
            .body
            .collect()
            .await
            .with_context(|| format!("Reading body failed for 's3://{bucket}/{key}'"))?;

        Ok(body.into_bytes().to_vec())
    }
}
