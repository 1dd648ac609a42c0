use pipeline_probe_core::clock::Clock;
use pipeline_probe_core::config::ProbeConfig;
use pipeline_probe_core::verdict::{Severity, Stage, Verdict, VerdictStatus};
use tracing::{error, info, warn};

use crate::adapters::invoke::InvocationSubmitter;
use crate::adapters::log_reader::LogReader;
use crate::adapters::object_store::ObjectLister;
use crate::adapters::queue::QueueReader;
use crate::handlers::logs::{check_recent_logs, LogCheckReport};
use crate::handlers::objects::{watch_for_objects, ObjectWatchReport, WatchPolicy};
use crate::handlers::queue::{peek_queue, PeekPolicy, QueueCheckReport};
use crate::handlers::trigger::{submit_triggers, TriggerReport, TriggerRequest};

pub struct ProbeCollaborators<'a> {
    pub submitter: &'a dyn InvocationSubmitter,
    pub logs: &'a dyn LogReader,
    pub objects: &'a dyn ObjectLister,
    pub queue: &'a dyn QueueReader,
    pub clock: &'a dyn Clock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub run_id: String,
    pub trigger: TriggerReport,
    pub logs: LogCheckReport,
    pub objects: ObjectWatchReport,
    pub queue: QueueCheckReport,
    pub verdict: Verdict,
}

/// Identifier embedded in every trigger tag, e.g. `probe-20261019T101500-1a2b3c4d`.
pub fn new_run_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "probe-{}-{}",
        chrono::Utc::now().format("%Y%m%dT%H%M%S"),
        &suffix[..8]
    )
}

/// Runs every stage in order and aggregates a verdict. A failed stage never
/// short-circuits the ones after it.
pub fn run_probe(
    config: &ProbeConfig,
    run_id: &str,
    deps: &ProbeCollaborators<'_>,
) -> ProbeReport {
    let targets = &config.targets;
    let mut verdict = Verdict::new(config.severity_policy());

    let trigger = submit_triggers(
        &TriggerRequest {
            target: &targets.function_name,
            run_id,
            count: config.invocations,
            spacing: config.submission_spacing,
        },
        deps.submitter,
        deps.clock,
    );
    verdict.record(Stage::TriggerSubmitted, trigger.outcome.clone());

    info!(
        settle_secs = config.settle_delay.as_secs(),
        "waiting for logs to appear in the log group"
    );
    deps.clock.sleep(config.settle_delay);

    let logs = check_recent_logs(
        deps.logs,
        &targets.log_group,
        config.log_stream_limit,
        config.log_event_limit,
    );
    verdict.record(Stage::LogsObserved, logs.outcome.clone());

    let objects = watch_for_objects(
        deps.objects,
        deps.clock,
        &targets.bucket,
        WatchPolicy {
            max_wait: config.object_wait,
            poll_interval: config.object_poll_interval,
        },
    );
    verdict.record(Stage::ObjectsObserved, objects.outcome.clone());

    let queue = peek_queue(
        deps.queue,
        &targets.queue_url,
        PeekPolicy {
            max_messages: config.queue_max_messages,
            wait: config.queue_wait,
        },
    );
    verdict.record(Stage::QueueObserved, queue.outcome.clone());

    log_verdict(&verdict);

    ProbeReport {
        run_id: run_id.to_string(),
        trigger,
        logs,
        objects,
        queue,
        verdict,
    }
}

fn log_verdict(verdict: &Verdict) {
    for (stage, severity) in verdict.unobserved() {
        let outcome = verdict
            .outcome(stage)
            .map(|outcome| outcome.label())
            .unwrap_or("missing");
        match severity {
            Severity::Hard => error!(stage = stage.as_str(), outcome, "stage {stage} failed"),
            Severity::Soft => warn!(
                stage = stage.as_str(),
                outcome,
                "stage {stage} not observed; this might be expected if delivery is still in flight"
            ),
        }
    }

    match verdict.status() {
        VerdictStatus::Passed => info!(status = "passed", "all checks completed successfully"),
        VerdictStatus::Degraded => warn!(
            status = "degraded",
            "required checks passed with degraded stages; check the logs for details"
        ),
        VerdictStatus::Failed => error!(
            status = "failed",
            "some checks failed; check the logs for details"
        ),
    }
}
