use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::verdict::{Severity, SeverityPolicy};

pub const DEFAULT_REGION: &str = "ap-northeast-1";
pub const DEFAULT_INVOCATIONS: usize = 5;
pub const DEFAULT_SUBMISSION_SPACING: Duration = Duration::from_secs(1);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(10);
pub const DEFAULT_OBJECT_WAIT: Duration = Duration::from_secs(180);
pub const DEFAULT_OBJECT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_LOG_STREAM_LIMIT: i32 = 5;
pub const DEFAULT_LOG_EVENT_LIMIT: i32 = 10;
pub const DEFAULT_QUEUE_WAIT: Duration = Duration::from_secs(10);
pub const DEFAULT_QUEUE_MAX_MESSAGES: i32 = 10;
/// Service-side ceilings for a single SQS receive.
pub const MAX_QUEUE_WAIT: Duration = Duration::from_secs(20);
pub const MAX_QUEUE_MESSAGES: i32 = 10;
pub const MAX_OBJECT_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeConfigError {
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),
    #[error("object poll interval must be greater than zero")]
    ZeroPollInterval,
    #[error("queue max messages must be between 1 and {}, got {}", MAX_QUEUE_MESSAGES, .0)]
    QueueBatchOutOfRange(i32),
    #[error("queue wait must be at most {}s, got {}s", MAX_QUEUE_WAIT.as_secs(), .0.as_secs())]
    QueueWaitTooLong(Duration),
    #[error("object wait must be at most {}s, got {}s", MAX_OBJECT_WAIT.as_secs(), .0.as_secs())]
    ObjectWaitTooLong(Duration),
    #[error("{name} must be positive, got {value}")]
    NonPositiveLimit { name: &'static str, value: i32 },
}

/// Identifiers of the resources under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTargets {
    pub function_name: String,
    pub log_group: String,
    pub bucket: String,
    pub queue_url: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub targets: PipelineTargets,
    pub invocations: usize,
    pub submission_spacing: Duration,
    pub settle_delay: Duration,
    pub object_wait: Duration,
    pub object_poll_interval: Duration,
    pub log_stream_limit: i32,
    pub log_event_limit: i32,
    pub queue_wait: Duration,
    pub queue_max_messages: i32,
    pub queue_severity: Severity,
}

impl ProbeConfig {
    pub fn new(targets: PipelineTargets) -> Self {
        Self {
            targets,
            invocations: DEFAULT_INVOCATIONS,
            submission_spacing: DEFAULT_SUBMISSION_SPACING,
            settle_delay: DEFAULT_SETTLE_DELAY,
            object_wait: DEFAULT_OBJECT_WAIT,
            object_poll_interval: DEFAULT_OBJECT_POLL_INTERVAL,
            log_stream_limit: DEFAULT_LOG_STREAM_LIMIT,
            log_event_limit: DEFAULT_LOG_EVENT_LIMIT,
            queue_wait: DEFAULT_QUEUE_WAIT,
            queue_max_messages: DEFAULT_QUEUE_MAX_MESSAGES,
            queue_severity: Severity::Soft,
        }
    }

    pub fn severity_policy(&self) -> SeverityPolicy {
        SeverityPolicy::with_queue(self.queue_severity)
    }

    pub fn validate(&self) -> Result<(), ProbeConfigError> {
        let identifiers = [
            ("function name", &self.targets.function_name),
            ("log group", &self.targets.log_group),
            ("bucket", &self.targets.bucket),
            ("queue url", &self.targets.queue_url),
            ("region", &self.targets.region),
        ];
        for (name, value) in identifiers {
            if value.trim().is_empty() {
                return Err(ProbeConfigError::EmptyIdentifier(name));
            }
        }

        if self.object_poll_interval.is_zero() {
            return Err(ProbeConfigError::ZeroPollInterval);
        }
        if self.object_wait > MAX_OBJECT_WAIT {
            return Err(ProbeConfigError::ObjectWaitTooLong(self.object_wait));
        }
        if !(1..=MAX_QUEUE_MESSAGES).contains(&self.queue_max_messages) {
            return Err(ProbeConfigError::QueueBatchOutOfRange(
                self.queue_max_messages,
            ));
        }
        if self.queue_wait > MAX_QUEUE_WAIT {
            return Err(ProbeConfigError::QueueWaitTooLong(self.queue_wait));
        }
        for (name, value) in [
            ("log stream limit", self.log_stream_limit),
            ("log event limit", self.log_event_limit),
        ] {
            if value <= 0 {
                return Err(ProbeConfigError::NonPositiveLimit { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_targets() -> PipelineTargets {
        PipelineTargets {
            function_name: "log-emitter".to_string(),
            log_group: "/aws/lambda/log-emitter".to_string(),
            bucket: "log-archive".to_string(),
            queue_url: "https://sqs.ap-northeast-1.amazonaws.com/123456789012/log-archive"
                .to_string(),
            region: DEFAULT_REGION.to_string(),
        }
    }

    #[test]
    fn defaults_validate() {
        let config = ProbeConfig::new(sample_targets());

        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.invocations, 5);
        assert_eq!(config.object_wait, Duration::from_secs(180));
        assert_eq!(config.severity_policy().queue, Severity::Soft);
    }

    #[test]
    fn rejects_blank_identifier() {
        let mut targets = sample_targets();
        targets.bucket = "  ".to_string();

        assert_eq!(
            ProbeConfig::new(targets).validate(),
            Err(ProbeConfigError::EmptyIdentifier("bucket"))
        );
    }

    #[test]
    fn rejects_queue_settings_beyond_service_limits() {
        let mut config = ProbeConfig::new(sample_targets());
        config.queue_max_messages = 11;
        assert_eq!(
            config.validate(),
            Err(ProbeConfigError::QueueBatchOutOfRange(11))
        );

        config.queue_max_messages = 10;
        config.queue_wait = Duration::from_secs(21);
        let error = config.validate().expect_err("wait above 20s should fail");
        assert_eq!(error.to_string(), "queue wait must be at most 20s, got 21s");
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let mut config = ProbeConfig::new(sample_targets());
        config.object_poll_interval = Duration::ZERO;

        assert_eq!(config.validate(), Err(ProbeConfigError::ZeroPollInterval));
    }

    #[test]
    fn zero_invocations_and_zero_wait_are_allowed() {
        let mut config = ProbeConfig::new(sample_targets());
        config.invocations = 0;
        config.object_wait = Duration::ZERO;

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_object_wait_beyond_a_day() {
        let mut config = ProbeConfig::new(sample_targets());
        config.object_wait = MAX_OBJECT_WAIT;
        assert_eq!(config.validate(), Ok(()));

        config.object_wait = Duration::from_secs(u64::MAX);
        assert_eq!(
            config.validate(),
            Err(ProbeConfigError::ObjectWaitTooLong(Duration::from_secs(
                u64::MAX
            )))
        );
    }
}
