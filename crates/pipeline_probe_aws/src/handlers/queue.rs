use std::time::Duration;

use pipeline_probe_core::contract::StageOutcome;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::adapters::queue::QueueReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeekPolicy {
    pub max_messages: i32,
    pub wait: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueCheckReport {
    pub outcome: StageOutcome,
    pub received: usize,
    pub released: usize,
    pub sample: Option<Value>,
}

/// Long-polls the queue once and hands every received message straight back.
///
/// Visibility is reset for each message even when the sample body does not
/// parse or an earlier reset failed; nothing is ever deleted.
pub fn peek_queue(
    reader: &dyn QueueReader,
    queue_url: &str,
    policy: PeekPolicy,
) -> QueueCheckReport {
    info!(stage = "queue", queue_url, "checking for messages in queue {queue_url}");

    let messages = match reader.receive(queue_url, policy.max_messages, policy.wait) {
        Ok(value) => value,
        Err(err) => {
            error!(stage = "queue", queue_url, "error receiving messages: {err}");
            return QueueCheckReport {
                outcome: StageOutcome::Faulted(err),
                received: 0,
                released: 0,
                sample: None,
            };
        }
    };

    if messages.is_empty() {
        warn!(stage = "queue", queue_url, "no messages found in queue");
        return QueueCheckReport {
            outcome: StageOutcome::NotObserved,
            received: 0,
            released: 0,
            sample: None,
        };
    }
    info!(
        stage = "queue",
        count = messages.len(),
        "found {} messages in queue",
        messages.len()
    );

    let sample = sample_body(&messages[0].body, &messages[0].message_id);

    let mut released = 0usize;
    let mut reset_errors = Vec::new();
    for message in &messages {
        match reader.reset_visibility(queue_url, &message.receipt_handle) {
            Ok(()) => released += 1,
            Err(err) => {
                error!(
                    stage = "queue",
                    message_id = message.message_id.as_str(),
                    "failed to return message to queue: {err}"
                );
                reset_errors.push(err);
            }
        }
    }

    let outcome = if reset_errors.is_empty() {
        StageOutcome::Observed
    } else {
        StageOutcome::Faulted(reset_errors.join("; "))
    };

    QueueCheckReport {
        outcome,
        received: messages.len(),
        released,
        sample,
    }
}

fn sample_body(body: &str, message_id: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            let rendered =
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string());
            info!(stage = "queue", message_id, "sample message: {rendered}");
            Some(value)
        }
        Err(err) => {
            warn!(
                stage = "queue",
                message_id,
                "sample message body is not valid JSON: {err}"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pipeline_probe_core::contract::QueueMessage;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct RecordingQueue {
        messages: Vec<QueueMessage>,
        receive_error: Option<String>,
        failing_handles: Vec<String>,
        receives: Mutex<Vec<(i32, Duration)>>,
        resets: Mutex<Vec<String>>,
    }

    impl RecordingQueue {
        fn with_bodies(bodies: &[&str]) -> Self {
            Self {
                messages: bodies
                    .iter()
                    .enumerate()
                    .map(|(index, body)| QueueMessage {
                        message_id: format!("id-{index}"),
                        body: body.to_string(),
                        receipt_handle: format!("receipt-{index}"),
                    })
                    .collect(),
                ..Self::default()
            }
        }

        fn resets(&self) -> Vec<String> {
            self.resets.lock().expect("poisoned mutex").clone()
        }
    }

    impl QueueReader for RecordingQueue {
        fn receive(
            &self,
            _queue_url: &str,
            max_messages: i32,
            wait: Duration,
        ) -> Result<Vec<QueueMessage>, String> {
            self.receives
                .lock()
                .expect("poisoned mutex")
                .push((max_messages, wait));
            if let Some(err) = &self.receive_error {
                return Err(err.clone());
            }
            Ok(self.messages.clone())
        }

        fn reset_visibility(&self, _queue_url: &str, receipt_handle: &str) -> Result<(), String> {
            self.resets
                .lock()
                .expect("poisoned mutex")
                .push(receipt_handle.to_string());
            if self.failing_handles.iter().any(|handle| handle == receipt_handle) {
                return Err(format!("failed to change visibility of {receipt_handle}"));
            }
            Ok(())
        }
    }

    const QUEUE_URL: &str = "https://sqs.ap-northeast-1.amazonaws.com/123456789012/log-archive";

    fn policy() -> PeekPolicy {
        PeekPolicy {
            max_messages: 10,
            wait: Duration::from_secs(10),
        }
    }

    #[test]
    fn resets_every_message_exactly_once() {
        let queue = RecordingQueue::with_bodies(&[
            r#"{"Records":[{"s3":{"object":{"key":"a"}}}]}"#,
            "{}",
            "{}",
        ]);

        let report = peek_queue(&queue, QUEUE_URL, policy());

        assert_eq!(report.outcome, StageOutcome::Observed);
        assert_eq!(report.received, 3);
        assert_eq!(report.released, 3);
        assert_eq!(queue.resets(), vec!["receipt-0", "receipt-1", "receipt-2"]);
        assert_eq!(
            report.sample,
            Some(json!({"Records": [{"s3": {"object": {"key": "a"}}}]}))
        );
        assert_eq!(
            *queue.receives.lock().expect("poisoned mutex"),
            vec![(10, Duration::from_secs(10))]
        );
    }

    #[test]
    fn unparseable_sample_still_releases_messages() {
        let queue = RecordingQueue::with_bodies(&["not json", "{}"]);

        let report = peek_queue(&queue, QUEUE_URL, policy());

        assert_eq!(report.outcome, StageOutcome::Observed);
        assert!(report.sample.is_none());
        assert_eq!(queue.resets(), vec!["receipt-0", "receipt-1"]);
    }

    #[test]
    fn empty_receive_is_not_observed() {
        let queue = RecordingQueue::default();

        let report = peek_queue(&queue, QUEUE_URL, policy());

        assert_eq!(report.outcome, StageOutcome::NotObserved);
        assert!(queue.resets().is_empty());
    }

    #[test]
    fn failed_reset_does_not_skip_remaining_messages() {
        let mut queue = RecordingQueue::with_bodies(&["{}", "{}", "{}"]);
        queue.failing_handles = vec!["receipt-1".to_string()];

        let report = peek_queue(&queue, QUEUE_URL, policy());

        match &report.outcome {
            StageOutcome::Faulted(detail) => assert!(detail.contains("receipt-1")),
            other => panic!("expected a fault, got {other:?}"),
        }
        assert_eq!(report.released, 2);
        assert_eq!(queue.resets(), vec!["receipt-0", "receipt-1", "receipt-2"]);
    }

    #[test]
    fn receive_fault_collapses_to_faulted() {
        let queue = RecordingQueue {
            receive_error: Some("failed to receive messages: AccessDenied".to_string()),
            ..RecordingQueue::default()
        };

        let report = peek_queue(&queue, QUEUE_URL, policy());

        assert!(matches!(report.outcome, StageOutcome::Faulted(_)));
        assert!(queue.resets().is_empty());
    }
}
