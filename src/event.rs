//! Typed model of the invocation event and the response envelope.
//!
//! One [`Event`] type covers both shapes the dispatcher must tell apart:
//! a storage-notification batch (`Records`) and a direct request (`body`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared source of an object-storage notification record.
pub const S3_EVENT_SOURCE: &str = "aws:s3";

/// One incoming invocation event.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    #[serde(rename = "Records", default)]
    pub records: Option<Vec<NotificationRecord>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "isRaw", default)]
    pub is_raw: Option<bool>,
}

impl Event {
    /// True when the event is a storage-notification batch: `Records` is
    /// present and at least one record declares the object-storage source.
    pub fn is_storage_notification(&self) -> bool {
        self.records
            .as_deref()
            .is_some_and(|records| records.iter().any(|r| r.event_source == S3_EVENT_SOURCE))
    }

    /// Builds the storage-notification shape for a single created object.
    pub fn storage_notification(bucket: &str, key: &str) -> Self {
        Self {
            records: Some(vec![NotificationRecord {
                event_source: S3_EVENT_SOURCE.to_string(),
                s3: Some(S3Entity {
                    bucket: BucketRef {
                        name: bucket.to_string(),
                    },
                    object: ObjectRef {
                        key: key.to_string(),
                    },
                }),
            }]),
            body: None,
            is_raw: None,
        }
    }

    /// Builds the direct-request shape around an already JSON-encoded body.
    pub fn direct_request(body: &str, is_raw: bool) -> Self {
        Self {
            records: None,
            body: Some(body.to_string()),
            is_raw: Some(is_raw),
        }
    }
}

/// One entry in a storage-change notification describing a created object.
///
/// `s3` is optional at the type level so that batches with foreign sources
/// still deserialize; the ingest flow fails if it is absent on a record it
/// has to process.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRecord {
    #[serde(rename = "eventSource")]
    pub event_source: String,
    #[serde(default)]
    pub s3: Option<S3Entity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

/// The structured invocation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: ResponseBody,
}

/// Response body: either a result value (which may be JSON null) or an
/// error message, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Result { result: Value },
    Error { error: String },
}

impl Response {
    pub fn ok(result: Value) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody::Result { result },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status_code: 400,
            body: ResponseBody::Error {
                error: message.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_storage_notification_shape() {
        let event: Event = serde_json::from_value(json!({
            "Records": [
                {
                    "eventSource": "aws:s3",
                    "s3": {"bucket": {"name": "b"}, "object": {"key": "k"}}
                }
            ]
        }))
        .unwrap();

        assert!(event.is_storage_notification());
        let records = event.records.unwrap();
        assert_eq!(records.len(), 1);
        let s3 = records[0].s3.as_ref().unwrap();
        assert_eq!(s3.bucket.name, "b");
        assert_eq!(s3.object.key, "k");
    }

    #[test]
    fn test_deserialize_direct_request_shape() {
        let event: Event = serde_json::from_value(json!({
            "body": "{\"search\":\"alice\"}",
            "isRaw": true
        }))
        .unwrap();

        assert!(!event.is_storage_notification());
        assert_eq!(event.body.as_deref(), Some("{\"search\":\"alice\"}"));
        assert_eq!(event.is_raw, Some(true));
    }

    #[test]
    fn test_records_with_foreign_source_are_not_a_notification() {
        // A record from another source has no s3 entity; the batch still
        // deserializes and falls through to the query path.
        let event: Event = serde_json::from_value(json!({
            "Records": [{"eventSource": "aws:sqs"}]
        }))
        .unwrap();

        assert!(!event.is_storage_notification());
    }

    #[test]
    fn test_mixed_sources_count_as_notification() {
        let event: Event = serde_json::from_value(json!({
            "Records": [
                {"eventSource": "aws:sqs"},
                {
                    "eventSource": "aws:s3",
                    "s3": {"bucket": {"name": "b"}, "object": {"key": "k"}}
                }
            ]
        }))
        .unwrap();

        assert!(event.is_storage_notification());
    }

    #[test]
    fn test_ok_response_serializes_null_result() {
        let response = Response::ok(Value::Null);
        let serialized = serde_json::to_value(&response).unwrap();
        assert_eq!(
            serialized,
            json!({"statusCode": 200, "body": {"result": null}})
        );
    }

    #[test]
    fn test_bad_request_response_serializes_error() {
        let response = Response::bad_request("Invalid search query");
        let serialized = serde_json::to_value(&response).unwrap();
        assert_eq!(
            serialized,
            json!({"statusCode": 400, "body": {"error": "Invalid search query"}})
        );
    }

    #[test]
    fn test_synthesized_notification_matches_wire_shape() {
        let event = Event::storage_notification("uploads", "pairs.csv");
        assert!(event.is_storage_notification());
    }
}
