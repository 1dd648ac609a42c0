use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

pub const PROCESSED_BODY: &str = "Successfully processed event";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComputeAck {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record {index}: storage notification is missing {field}")]
    MissingStorageField { index: usize, field: &'static str },
    #[error("record {index}: queue message is missing a string body")]
    MissingQueueBody { index: usize },
}

/// What the compute function saw in a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedRecord {
    ObjectCreated { bucket: String, key: String },
    QueueMessage { body: String },
    Other,
}

/// Logs the event and every storage or queue record it carries.
///
/// A malformed storage or queue record is logged and returned as an error so
/// the Lambda runtime reports the invocation as failed.
pub fn handle_pipeline_event(event: &Value) -> Result<ComputeAck, RecordError> {
    info!("received event: {event}");

    let records = event
        .get("Records")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for (index, record) in records.iter().enumerate() {
        match classify_record(index, record) {
            Ok(ObservedRecord::ObjectCreated { bucket, key }) => {
                info!("object created in bucket {bucket} with key {key}");
            }
            Ok(ObservedRecord::QueueMessage { body }) => {
                info!("queue message received: {body}");
            }
            Ok(ObservedRecord::Other) => {
                debug!(index, "ignoring record with unrecognized shape");
            }
            Err(err) => {
                error!("error processing event: {err}");
                return Err(err);
            }
        }
    }

    Ok(ComputeAck {
        status_code: 200,
        body: Value::from(PROCESSED_BODY).to_string(),
    })
}

pub fn classify_record(index: usize, record: &Value) -> Result<ObservedRecord, RecordError> {
    if let Some(notification) = record.get("s3") {
        let bucket = notification
            .pointer("/bucket/name")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingStorageField {
                index,
                field: "bucket.name",
            })?;
        let key = notification
            .pointer("/object/key")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingStorageField {
                index,
                field: "object.key",
            })?;
        return Ok(ObservedRecord::ObjectCreated {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
    }

    if is_queue_record(record) {
        let body = record
            .get("body")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingQueueBody { index })?;
        return Ok(ObservedRecord::QueueMessage {
            body: body.to_string(),
        });
    }

    Ok(ObservedRecord::Other)
}

fn is_queue_record(record: &Value) -> bool {
    record.get("sqs").is_some()
        || record
            .get("eventSource")
            .and_then(Value::as_str)
            .map(|source| source == "aws:sqs")
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn acknowledges_synthetic_trigger_without_records() {
        let ack = handle_pipeline_event(&json!({"test": "run-1-message-0", "timestamp": 1.5}))
            .expect("plain event should succeed");

        assert_eq!(ack.status_code, 200);
        assert_eq!(ack.body, "\"Successfully processed event\"");
        assert_eq!(
            serde_json::to_value(&ack).expect("ack should serialize"),
            json!({"statusCode": 200, "body": "\"Successfully processed event\""})
        );
    }

    #[test]
    fn classifies_storage_and_queue_records() {
        let storage = json!({
            "eventSource": "aws:s3",
            "s3": {"bucket": {"name": "log-archive"}, "object": {"key": "logs/part-0000.gz"}}
        });
        let queue = json!({"eventSource": "aws:sqs", "body": "{\"hello\":1}"});
        let other = json!({"eventSource": "aws:sns"});

        assert_eq!(
            classify_record(0, &storage),
            Ok(ObservedRecord::ObjectCreated {
                bucket: "log-archive".to_string(),
                key: "logs/part-0000.gz".to_string(),
            })
        );
        assert_eq!(
            classify_record(1, &queue),
            Ok(ObservedRecord::QueueMessage {
                body: "{\"hello\":1}".to_string(),
            })
        );
        assert_eq!(classify_record(2, &other), Ok(ObservedRecord::Other));
    }

    #[test]
    fn malformed_storage_record_is_returned_as_error() {
        let event = json!({
            "Records": [
                {"eventSource": "aws:sqs", "body": "ok"},
                {"s3": {"bucket": {"name": "log-archive"}}}
            ]
        });

        let error = handle_pipeline_event(&event).expect_err("missing key should fail");

        assert_eq!(
            error,
            RecordError::MissingStorageField {
                index: 1,
                field: "object.key",
            }
        );
        assert_eq!(
            error.to_string(),
            "record 1: storage notification is missing object.key"
        );
    }

    #[test]
    fn queue_record_without_body_is_rejected() {
        let event = json!({"Records": [{"sqs": {}, "body": 42}]});

        let error = handle_pipeline_event(&event).expect_err("non-string body should fail");

        assert_eq!(error, RecordError::MissingQueueBody { index: 0 });
    }
}
