use std::time::Duration;

use pipeline_probe_core::contract::QueueMessage;

/// Read access to a queue that never consumes what it reads.
pub trait QueueReader {
    fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait: Duration,
    ) -> Result<Vec<QueueMessage>, String>;

    /// Makes a received message immediately visible to other consumers again.
    fn reset_visibility(&self, queue_url: &str, receipt_handle: &str) -> Result<(), String>;
}
