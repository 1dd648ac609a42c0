use std::sync::Mutex;
use std::time::Duration;

use pipeline_probe_aws::adapters::invoke::InvocationSubmitter;
use pipeline_probe_aws::adapters::log_reader::LogReader;
use pipeline_probe_aws::adapters::object_store::ObjectLister;
use pipeline_probe_aws::adapters::queue::QueueReader;
use pipeline_probe_core::clock::ManualClock;
use pipeline_probe_core::config::{PipelineTargets, ProbeConfig};
use pipeline_probe_core::contract::{
    LogEvent, ObjectDescriptor, QueueMessage, StorageListing, SubmissionAck,
};

pub fn sample_config() -> ProbeConfig {
    ProbeConfig::new(PipelineTargets {
        function_name: "log-emitter".to_string(),
        log_group: "/aws/lambda/log-emitter".to_string(),
        bucket: "log-archive".to_string(),
        queue_url: "https://sqs.ap-northeast-1.amazonaws.com/123456789012/log-archive"
            .to_string(),
        region: "ap-northeast-1".to_string(),
    })
}

pub struct AcceptingSubmitter {
    pub status_code: i32,
    pub submitted_at: Mutex<Vec<Duration>>,
    clock: &'static ManualClock,
}

impl AcceptingSubmitter {
    pub fn new(clock: &'static ManualClock) -> Self {
        Self {
            status_code: 202,
            submitted_at: Mutex::new(Vec::new()),
            clock,
        }
    }

    pub fn count(&self) -> usize {
        self.submitted_at.lock().expect("poisoned mutex").len()
    }
}

impl InvocationSubmitter for AcceptingSubmitter {
    fn submit(&self, _target: &str, _payload: &[u8]) -> Result<SubmissionAck, String> {
        self.submitted_at
            .lock()
            .expect("poisoned mutex")
            .push(self.clock.elapsed());
        Ok(SubmissionAck {
            status_code: self.status_code,
        })
    }
}

#[derive(Default)]
pub struct StaticLogReader {
    pub streams: Vec<String>,
    pub events: Vec<LogEvent>,
    pub read_at: Mutex<Vec<Duration>>,
    clock: Option<&'static ManualClock>,
}

impl StaticLogReader {
    pub fn with_one_event(clock: &'static ManualClock) -> Self {
        Self {
            streams: vec!["2026/10/19/[$LATEST]abc".to_string()],
            events: vec![LogEvent {
                timestamp_ms: 1_700_000_000_000,
                message: "received event".to_string(),
            }],
            read_at: Mutex::new(Vec::new()),
            clock: Some(clock),
        }
    }

    pub fn without_streams() -> Self {
        Self::default()
    }
}

impl LogReader for StaticLogReader {
    fn recent_streams(&self, _group: &str, _limit: i32) -> Result<Vec<String>, String> {
        if let Some(clock) = self.clock {
            self.read_at
                .lock()
                .expect("poisoned mutex")
                .push(clock.elapsed());
        }
        Ok(self.streams.clone())
    }

    fn recent_events(
        &self,
        _group: &str,
        _stream: &str,
        _limit: i32,
    ) -> Result<Vec<LogEvent>, String> {
        Ok(self.events.clone())
    }
}

/// Bucket that receives one object once `arrival` of virtual time has passed
/// since the clock was created.
pub struct ArrivingBucket {
    pub arrival: Option<Duration>,
    clock: &'static ManualClock,
}

impl ArrivingBucket {
    pub fn new(clock: &'static ManualClock, arrival: Option<Duration>) -> Self {
        Self { arrival, clock }
    }
}

impl ObjectLister for ArrivingBucket {
    fn list(&self, _bucket: &str) -> Result<StorageListing, String> {
        match self.arrival {
            Some(at) if self.clock.elapsed() >= at => {
                Ok(StorageListing::from_objects(vec![ObjectDescriptor {
                    key: "logs/2026/10/19/part-0000.gz".to_string(),
                    size: 2048,
                    last_modified: Some("2026-10-19T10:15:00Z".to_string()),
                }]))
            }
            _ => Ok(StorageListing::default()),
        }
    }
}

#[derive(Default)]
pub struct PeekableQueue {
    pub messages: Vec<QueueMessage>,
    pub resets: Mutex<Vec<String>>,
}

impl PeekableQueue {
    pub fn with_messages(count: usize) -> Self {
        Self {
            messages: (0..count)
                .map(|index| QueueMessage {
                    message_id: format!("id-{index}"),
                    body: format!("{{\"Records\":[{{\"index\":{index}}}]}}"),
                    receipt_handle: format!("receipt-{index}"),
                })
                .collect(),
            resets: Mutex::new(Vec::new()),
        }
    }

    pub fn resets(&self) -> Vec<String> {
        self.resets.lock().expect("poisoned mutex").clone()
    }
}

impl QueueReader for PeekableQueue {
    fn receive(
        &self,
        _queue_url: &str,
        _max_messages: i32,
        _wait: Duration,
    ) -> Result<Vec<QueueMessage>, String> {
        Ok(self.messages.clone())
    }

    fn reset_visibility(&self, _queue_url: &str, receipt_handle: &str) -> Result<(), String> {
        self.resets
            .lock()
            .expect("poisoned mutex")
            .push(receipt_handle.to_string());
        Ok(())
    }
}

/// Leaks a fresh clock so fakes can hold a `'static` reference to it.
pub fn leaked_clock() -> &'static ManualClock {
    Box::leak(Box::new(ManualClock::new()))
}
