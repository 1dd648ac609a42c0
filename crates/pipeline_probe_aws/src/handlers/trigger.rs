use std::time::Duration;

use pipeline_probe_core::clock::Clock;
use pipeline_probe_core::contract::{StageOutcome, TriggerPayload};
use tracing::{error, info};

use crate::adapters::invoke::InvocationSubmitter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest<'a> {
    pub target: &'a str,
    pub run_id: &'a str,
    pub count: usize,
    pub spacing: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerReport {
    pub outcome: StageOutcome,
    /// Tags of every submission that was issued, accepted or not.
    pub issued_tags: Vec<String>,
}

/// Submits `count` synthetic events one at a time. A rejected acknowledgment
/// fails the step but the remaining submissions are still issued; a
/// submission fault stops immediately.
pub fn submit_triggers(
    request: &TriggerRequest<'_>,
    submitter: &dyn InvocationSubmitter,
    clock: &dyn Clock,
) -> TriggerReport {
    info!(
        stage = "trigger",
        function = request.target,
        count = request.count,
        "invoking function {} {} times",
        request.target,
        request.count
    );

    let mut issued_tags = Vec::with_capacity(request.count);
    let mut rejected = 0usize;
    for index in 0..request.count {
        if index > 0 {
            clock.sleep(request.spacing);
        }

        let payload = TriggerPayload::new(request.run_id, index, clock.unix_seconds());
        let body = match serde_json::to_vec(&payload) {
            Ok(value) => value,
            Err(err) => {
                let detail = format!("failed to serialize trigger payload: {err}");
                error!(stage = "trigger", "{detail}");
                return TriggerReport {
                    outcome: StageOutcome::Faulted(detail),
                    issued_tags,
                };
            }
        };

        let result = submitter.submit(request.target, &body);
        issued_tags.push(payload.tag);
        let position = index + 1;

        match result {
            Ok(ack) if ack.is_accepted() => {
                info!(
                    stage = "trigger",
                    status_code = ack.status_code,
                    "invocation {position}/{} accepted",
                    request.count
                );
            }
            Ok(ack) => {
                error!(
                    stage = "trigger",
                    status_code = ack.status_code,
                    "invocation {position}/{} rejected",
                    request.count
                );
                rejected += 1;
            }
            Err(err) => {
                error!(
                    stage = "trigger",
                    "invocation {position}/{} faulted: {err}", request.count
                );
                return TriggerReport {
                    outcome: StageOutcome::Faulted(err),
                    issued_tags,
                };
            }
        }
    }

    if rejected > 0 {
        error!(
            stage = "trigger",
            rejected,
            "{rejected} of {} invocations rejected",
            request.count
        );
        return TriggerReport {
            outcome: StageOutcome::NotObserved,
            issued_tags,
        };
    }

    info!(stage = "trigger", count = request.count, "all invocations accepted");
    TriggerReport {
        outcome: StageOutcome::Observed,
        issued_tags,
    }
}
