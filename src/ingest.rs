//! Ingest flow: storage notification batch → CSV rows → table records.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::event::{NotificationRecord, Response};
use crate::object::ObjectFetcher;
use crate::store::{Record, RecordStore};

/// One CSV row as ingested. Only the `Name` and `Secret` columns are
/// recognized; all other columns are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Secret", default)]
    secret: Option<String>,
}

/// Processes one storage-notification batch: fetches each referenced
/// object, parses it as CSV with a header row, and writes one record per
/// row carrying both a non-empty `Name` and a non-empty `Secret`.
///
/// The timestamp is taken once here and shared across every row of every
/// notification record in the invocation. Rows missing either column are
/// skipped; fetch, decode, and store failures are fatal.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub async fn run(
    records: &[NotificationRecord],
    fetcher: &dyn ObjectFetcher,
    store: &dyn RecordStore,
) -> Result<Response> {
    let recorded_at = Utc::now();

    for record in records {
        let s3 = record
            .s3
            .as_ref()
            .context("notification record has no s3 entity")?;
        let bucket = &s3.bucket.name;
        let key = &s3.object.key;

        let bytes = fetcher.fetch(bucket, key).await?;
        let data = String::from_utf8(bytes)
            .with_context(|| format!("object 's3://{bucket}/{key}' is not valid UTF-8"))?;

        let mut written = 0usize;
        let mut skipped = 0usize;

        let mut reader = csv::Reader::from_reader(data.as_bytes());
        for row in reader.deserialize::<CsvRow>() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    debug!(error = %e, "Skipping malformed CSV row");
                    skipped += 1;
                    continue;
                }
            };

            match (row.name, row.secret) {
                (Some(name), Some(secret)) if !name.is_empty() && !secret.is_empty() => {
                    store.put(&Record { name, secret, recorded_at }).await?;
                    written += 1;
                }
                _ => {
                    skipped += 1;
                }
            }
        }

        info!(bucket = %bucket, key = %key, written, skipped, "Object ingested");
    }

    Ok(Response::ok(json!("Success")))
}
