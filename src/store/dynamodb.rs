use anyhow::{Context, Result};
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use super::{Record, RecordStore};

/// [`RecordStore`] backed by a DynamoDB table with `Name`, `Secret` and
/// `Date` string attributes.
pub struct DynamoStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoStore {
    /// Creates a store using the ambient AWS configuration (env vars,
    /// instance profile, etc.) already loaded by `aws_config::load_from_env`.
    pub fn new(config: &aws_config::SdkConfig, table_name: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_dynamodb::Client::new(config),
            table_name: table_name.into(),
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for DynamoStore {
    async fn put(&self, record: &Record) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("Name", AttributeValue::S(record.name.clone()))
            .item("Secret", AttributeValue::S(record.secret.clone()))
            .item("Date", AttributeValue::S(record.recorded_at.to_rfc3339()))
            .send()
            .await
            .with_context(|| format!("PutItem failed for '{}'", record.name))?;

        Ok(())
    }

    async fn find_secret(&self, name: &str) -> Result<Option<String>> {
        // The search term is bound as an expression attribute value, never
        // spliced into the expression string, so raw-mode terms cannot
        // change the filter shape.
        let resp = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("#n = :name")
            .expression_attribute_names("#n", "Name")
            .expression_attribute_values(":name", AttributeValue::S(name.to_string()))
            .send()
            .await
            .with_context(|| format!("Scan failed for '{name}'"))?;

        let items = resp.items();
        debug!(name, matches = items.len(), "Scan complete");

        // Re-ingesting the same name writes a fresh item, so several may
        // match; the greatest Date (RFC 3339 sorts lexicographically) wins.
        let latest = items
            .iter()
            .filter_map(|item| {
                let secret = item.get("Secret")?.as_s().ok()?;
                let date = item.get("Date").and_then(|v| v.as_s().ok());
                Some((date.cloned(), secret.clone()))
            })
            .max_by(|a, b| a.0.cmp(&b.0));

        Ok(latest.map(|(_, secret)| secret))
    }
}
