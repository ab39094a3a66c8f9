//! Event dispatcher: routes one invocation to the ingest or query flow.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::event::{Event, Response};
use crate::object::ObjectFetcher;
use crate::store::RecordStore;
use crate::{ingest, query};

/// Holds the process-wide storage handles, constructed once at startup and
/// reused for every invocation.
pub struct Handler {
    fetcher: Arc<dyn ObjectFetcher>,
    store: Arc<dyn RecordStore>,
}

impl Handler {
    pub fn new(fetcher: Arc<dyn ObjectFetcher>, store: Arc<dyn RecordStore>) -> Self {
        Self { fetcher, store }
    }

    /// Dispatches one event: a storage-notification batch runs the ingest
    /// flow, anything else is treated as a direct query request.
    #[tracing::instrument(skip_all)]
    pub async fn handle(&self, event: &Event) -> Result<Response> {
        if event.is_storage_notification() {
            let records = event.records.as_deref().unwrap_or_default();
            info!(records = records.len(), "Dispatching storage notification");
            ingest::run(records, self.fetcher.as_ref(), self.store.as_ref()).await
        } else {
            info!("Dispatching direct request");
            query::run(event, self.store.as_ref()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Record;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeFetcher {
        objects: HashMap<(String, String), Vec<u8>>,
    }

    #[async_trait::async_trait]
    impl ObjectFetcher for FakeFetcher {
        async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
            self.objects
                .get(&(bucket.to_string(), key.to_string()))
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no such object 's3://{bucket}/{key}'"))
        }
    }

    #[derive(Default)]
    struct MemStore {
        records: Mutex<Vec<Record>>,
    }

    #[async_trait::async_trait]
    impl RecordStore for MemStore {
        async fn put(&self, record: &Record) -> Result<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn find_secret(&self, name: &str) -> Result<Option<String>> {
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .filter(|r| r.name == name)
                .max_by_key(|r| r.recorded_at)
                .map(|r| r.secret.clone()))
        }
    }

    fn handler_with_object(bucket: &str, key: &str, content: &[u8]) -> (Handler, Arc<MemStore>) {
        let mut objects = HashMap::new();
        objects.insert((bucket.to_string(), key.to_string()), content.to_vec());
        let store = Arc::new(MemStore::default());
        let handler = Handler::new(Arc::new(FakeFetcher { objects }), store.clone());
        (handler, store)
    }

    #[tokio::test]
    async fn test_notification_event_routes_to_ingest() {
        let (handler, store) =
            handler_with_object("b", "k", b"Name,Secret\nalice,topsecret\n");
        let event: Event = serde_json::from_value(json!({
            "Records": [{
                "eventSource": "aws:s3",
                "s3": {"bucket": {"name": "b"}, "object": {"key": "k"}}
            }]
        }))
        .unwrap();

        let response = handler.handle(&event).await.unwrap();

        assert_eq!(response, Response::ok(json!("Success")));
        assert_eq!(store.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_direct_request_routes_to_query() {
        let (handler, store) = handler_with_object("b", "k", b"");
        store.records.lock().unwrap().push(Record {
            name: "alice".to_string(),
            secret: "topsecret".to_string(),
            recorded_at: chrono::Utc::now(),
        });
        let event: Event =
            serde_json::from_value(json!({"body": "{\"search\":\"alice\"}"})).unwrap();

        let response = handler.handle(&event).await.unwrap();

        assert_eq!(response, Response::ok(json!("topsecret")));
    }

    #[tokio::test]
    async fn test_records_without_storage_source_fall_through_to_query() {
        let (handler, _store) = handler_with_object("b", "k", b"");
        let event: Event = serde_json::from_value(json!({
            "Records": [{"eventSource": "aws:sqs"}]
        }))
        .unwrap();

        // No body either, so the query flow answers its own 400.
        let response = handler.handle(&event).await.unwrap();

        assert_eq!(response, Response::bad_request("Invalid search query"));
    }
}
