use std::time::Duration;

use clap::Parser;
use pipeline_probe_core::config::{
    PipelineTargets, ProbeConfig, ProbeConfigError, DEFAULT_REGION,
};
use pipeline_probe_core::verdict::Severity;

/// Verify the Lambda -> CloudWatch Logs -> S3 -> SQS pipeline end to end.
#[derive(Debug, Parser)]
#[command(name = "verify_pipeline", version, about)]
pub struct VerifyArgs {
    /// Lambda function name or ARN to invoke
    #[arg(long, env = "PIPELINE_PROBE_FUNCTION")]
    pub lambda_function: String,

    /// CloudWatch log group written by the function
    #[arg(long, env = "PIPELINE_PROBE_LOG_GROUP")]
    pub log_group: String,

    /// Bucket the log delivery stream writes to
    #[arg(long, env = "PIPELINE_PROBE_BUCKET")]
    pub s3_bucket: String,

    /// Queue receiving the bucket notifications
    #[arg(long, env = "PIPELINE_PROBE_QUEUE_URL")]
    pub sqs_queue_url: String,

    #[arg(long, env = "PIPELINE_PROBE_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Seconds to wait for objects to appear in the bucket
    #[arg(long, default_value_t = 180)]
    pub wait_time: u64,

    /// Number of synthetic invocations
    #[arg(long, default_value_t = 5)]
    pub invocations: usize,

    /// Seconds to wait after invoking before reading logs
    #[arg(long, default_value_t = 10)]
    pub settle_delay: u64,

    /// Seconds between bucket listings
    #[arg(long, default_value_t = 10)]
    pub poll_interval: u64,

    /// Long-poll seconds for the queue receive (at most 20)
    #[arg(long, default_value_t = 10)]
    pub queue_wait: u64,

    #[arg(long, default_value_t = 10)]
    pub queue_max_messages: i32,

    /// Fail the run when no queue message is observed
    #[arg(long)]
    pub require_queue_messages: bool,
}

impl VerifyArgs {
    pub fn into_config(self) -> Result<ProbeConfig, ProbeConfigError> {
        let mut config = ProbeConfig::new(PipelineTargets {
            function_name: self.lambda_function,
            log_group: self.log_group,
            bucket: self.s3_bucket,
            queue_url: self.sqs_queue_url,
            region: self.region,
        });
        config.object_wait = Duration::from_secs(self.wait_time);
        config.invocations = self.invocations;
        config.settle_delay = Duration::from_secs(self.settle_delay);
        config.object_poll_interval = Duration::from_secs(self.poll_interval);
        config.queue_wait = Duration::from_secs(self.queue_wait);
        config.queue_max_messages = self.queue_max_messages;
        if self.require_queue_messages {
            config.queue_severity = Severity::Hard;
        }

        config.validate()?;
        Ok(config)
    }
}
