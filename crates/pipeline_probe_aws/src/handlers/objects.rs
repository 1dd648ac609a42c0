//! Deadline-bounded polling of an object store listing.
//!
//! The deadline is computed once on entry and compared against the clock on
//! every iteration. Sleeps are clamped to the remaining time so the final poll
//! lands on the deadline instead of overrunning it by a whole interval.

use std::time::Duration;

use pipeline_probe_core::clock::Clock;
use pipeline_probe_core::contract::{StageOutcome, StorageListing};
use tracing::{error, info};

use crate::adapters::object_store::ObjectLister;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchPolicy {
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectWatchReport {
    pub outcome: StageOutcome,
    /// Empty unless the outcome is `Observed`.
    pub listing: StorageListing,
    pub polls: usize,
    pub elapsed: Duration,
}

pub fn watch_for_objects(
    lister: &dyn ObjectLister,
    clock: &dyn Clock,
    bucket: &str,
    policy: WatchPolicy,
) -> ObjectWatchReport {
    info!(
        stage = "objects",
        bucket,
        "waiting up to {}s for objects to appear in bucket {bucket}",
        policy.max_wait.as_secs()
    );

    let started_at = clock.now();
    // `None` when the wait is too large for the clock to represent.
    let deadline = started_at.checked_add(policy.max_wait);
    let mut polls = 0usize;

    let outcome = loop {
        polls += 1;
        match lister.list(bucket) {
            Ok(listing) if !listing.is_empty() => {
                info!(
                    stage = "objects",
                    bucket,
                    count = listing.key_count,
                    "found {} objects in bucket",
                    listing.key_count
                );
                return ObjectWatchReport {
                    outcome: StageOutcome::Observed,
                    listing,
                    polls,
                    elapsed: clock.now().saturating_duration_since(started_at),
                };
            }
            Ok(_) => {}
            Err(err) => {
                error!(stage = "objects", bucket, "error listing objects: {err}");
                break StageOutcome::Faulted(err);
            }
        }

        let now = clock.now();
        if deadline.is_some_and(|deadline| now >= deadline) {
            error!(
                stage = "objects",
                bucket, "timed out waiting for objects to appear in bucket"
            );
            break StageOutcome::NotObserved;
        }

        info!(stage = "objects", bucket, "no objects found yet, waiting...");
        let remaining = deadline.map_or(policy.poll_interval, |deadline| {
            deadline.saturating_duration_since(now)
        });
        clock.sleep(policy.poll_interval.min(remaining));
    };

    ObjectWatchReport {
        outcome,
        listing: StorageListing::default(),
        polls,
        elapsed: clock.now().saturating_duration_since(started_at),
    }
}
