use pipeline_probe_core::contract::{LogEvent, StageOutcome};
use tracing::{debug, error, info};

use crate::adapters::log_reader::LogReader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCheckReport {
    pub outcome: StageOutcome,
    pub stream: Option<String>,
    pub events: Vec<LogEvent>,
}

impl LogCheckReport {
    fn not_observed(stream: Option<String>) -> Self {
        Self {
            outcome: StageOutcome::NotObserved,
            stream,
            events: Vec::new(),
        }
    }

    fn faulted(stream: Option<String>, detail: String) -> Self {
        Self {
            outcome: StageOutcome::Faulted(detail),
            stream,
            events: Vec::new(),
        }
    }
}

/// Single-shot check that the most recently active stream of `group` holds
/// at least one event.
pub fn check_recent_logs(
    reader: &dyn LogReader,
    group: &str,
    stream_limit: i32,
    event_limit: i32,
) -> LogCheckReport {
    info!(stage = "logs", log_group = group, "checking for logs in log group {group}");

    let streams = match reader.recent_streams(group, stream_limit) {
        Ok(value) => value,
        Err(err) => {
            error!(stage = "logs", log_group = group, "error listing log streams: {err}");
            return LogCheckReport::faulted(None, err);
        }
    };

    let Some(stream) = streams.into_iter().next() else {
        error!(stage = "logs", log_group = group, "no log streams found in log group");
        return LogCheckReport::not_observed(None);
    };
    debug!(stage = "logs", log_stream = stream.as_str(), "reading most recent stream");

    let events = match reader.recent_events(group, &stream, event_limit) {
        Ok(value) => value,
        Err(err) => {
            error!(
                stage = "logs",
                log_stream = stream.as_str(),
                "error reading log events: {err}"
            );
            return LogCheckReport::faulted(Some(stream), err);
        }
    };

    if events.is_empty() {
        error!(
            stage = "logs",
            log_stream = stream.as_str(),
            "no log events found in the most recent log stream"
        );
        return LogCheckReport::not_observed(Some(stream));
    }

    info!(
        stage = "logs",
        log_stream = stream.as_str(),
        count = events.len(),
        "found {} log events",
        events.len()
    );
    LogCheckReport {
        outcome: StageOutcome::Observed,
        stream: Some(stream),
        events,
    }
}
