//! Stage severity rules and verdict aggregation.
//!
//! Each stage contributes a [`StageOutcome`]. The [`SeverityPolicy`] table
//! decides whether a stage that was not observed fails the run (hard) or only
//! degrades it (soft). Aggregation is independent of the order in which
//! stages are recorded.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contract::StageOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    TriggerSubmitted,
    LogsObserved,
    ObjectsObserved,
    QueueObserved,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::TriggerSubmitted,
        Stage::LogsObserved,
        Stage::ObjectsObserved,
        Stage::QueueObserved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TriggerSubmitted => "trigger_submitted",
            Self::LogsObserved => "logs_observed",
            Self::ObjectsObserved => "objects_observed",
            Self::QueueObserved => "queue_observed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Hard,
    Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityPolicy {
    pub trigger: Severity,
    pub logs: Severity,
    pub objects: Severity,
    pub queue: Severity,
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self {
            trigger: Severity::Hard,
            logs: Severity::Hard,
            objects: Severity::Hard,
            queue: Severity::Soft,
        }
    }
}

impl SeverityPolicy {
    pub fn with_queue(queue: Severity) -> Self {
        Self {
            queue,
            ..Self::default()
        }
    }

    pub fn severity(&self, stage: Stage) -> Severity {
        match stage {
            Stage::TriggerSubmitted => self.trigger,
            Stage::LogsObserved => self.logs,
            Stage::ObjectsObserved => self.objects,
            Stage::QueueObserved => self.queue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Passed,
    Degraded,
    Failed,
}

impl VerdictStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Passed | Self::Degraded => 0,
            Self::Failed => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    policy: SeverityPolicy,
    stages: BTreeMap<Stage, StageOutcome>,
}

impl Verdict {
    pub fn new(policy: SeverityPolicy) -> Self {
        Self {
            policy,
            stages: BTreeMap::new(),
        }
    }

    /// Records the outcome for `stage`, replacing any earlier outcome.
    pub fn record(&mut self, stage: Stage, outcome: StageOutcome) {
        self.stages.insert(stage, outcome);
    }

    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages.get(&stage)
    }

    /// Stages that were recorded but not observed, in stage order.
    pub fn unobserved(&self) -> Vec<(Stage, Severity)> {
        self.stages
            .iter()
            .filter(|(_, outcome)| !outcome.is_observed())
            .map(|(stage, _)| (*stage, self.policy.severity(*stage)))
            .collect()
    }

    /// A stage that was never recorded counts as not observed.
    pub fn status(&self) -> VerdictStatus {
        let mut degraded = false;
        for stage in Stage::ALL {
            let observed = self
                .stages
                .get(&stage)
                .map(StageOutcome::is_observed)
                .unwrap_or(false);
            if observed {
                continue;
            }
            match self.policy.severity(stage) {
                Severity::Hard => return VerdictStatus::Failed,
                Severity::Soft => degraded = true,
            }
        }

        if degraded {
            VerdictStatus::Degraded
        } else {
            VerdictStatus::Passed
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.status().exit_code()
    }
}
