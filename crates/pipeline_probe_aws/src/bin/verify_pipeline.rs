use std::process::ExitCode;
use std::time::Duration;

use aws_sdk_cloudwatchlogs::types::OrderBy;
use aws_sdk_lambda::types::InvocationType;
use aws_sdk_s3::primitives::DateTimeFormat;
use clap::Parser;
use pipeline_probe_aws::adapters::invoke::InvocationSubmitter;
use pipeline_probe_aws::adapters::log_reader::LogReader;
use pipeline_probe_aws::adapters::object_store::ObjectLister;
use pipeline_probe_aws::adapters::queue::QueueReader;
use pipeline_probe_aws::cli::VerifyArgs;
use pipeline_probe_aws::error::ProbeError;
use pipeline_probe_aws::handlers::orchestrator::{
    new_run_id, run_probe, ProbeCollaborators, ProbeReport,
};
use pipeline_probe_aws::logging;
use pipeline_probe_core::clock::SystemClock;
use pipeline_probe_core::config::ProbeConfig;
use pipeline_probe_core::contract::{
    LogEvent, ObjectDescriptor, QueueMessage, StorageListing, SubmissionAck,
};
use tracing::{error, info};

struct AwsLambdaSubmitter {
    lambda_client: aws_sdk_lambda::Client,
}

impl InvocationSubmitter for AwsLambdaSubmitter {
    fn submit(&self, target: &str, payload: &[u8]) -> Result<SubmissionAck, String> {
        let request_payload = payload.to_vec();
        let client = self.lambda_client.clone();
        let function_name = target.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .invoke()
                    .function_name(function_name)
                    .invocation_type(InvocationType::Event)
                    .set_payload(Some(request_payload.into()))
                    .send()
                    .await
                    .map(|output| SubmissionAck {
                        status_code: output.status_code(),
                    })
                    .map_err(|error| format!("failed to invoke function: {error}"))
            })
        })
    }
}

struct CloudWatchLogReader {
    logs_client: aws_sdk_cloudwatchlogs::Client,
}

impl LogReader for CloudWatchLogReader {
    fn recent_streams(&self, group: &str, limit: i32) -> Result<Vec<String>, String> {
        let client = self.logs_client.clone();
        let log_group = group.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .describe_log_streams()
                    .log_group_name(log_group)
                    .order_by(OrderBy::LastEventTime)
                    .descending(true)
                    .limit(limit)
                    .send()
                    .await
                    .map_err(|error| format!("failed to describe log streams: {error}"))?;
                Ok(output
                    .log_streams()
                    .iter()
                    .filter_map(|stream| stream.log_stream_name().map(str::to_string))
                    .collect())
            })
        })
    }

    fn recent_events(
        &self,
        group: &str,
        stream: &str,
        limit: i32,
    ) -> Result<Vec<LogEvent>, String> {
        let client = self.logs_client.clone();
        let log_group = group.to_string();
        let log_stream = stream.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .get_log_events()
                    .log_group_name(log_group)
                    .log_stream_name(log_stream)
                    .limit(limit)
                    .send()
                    .await
                    .map_err(|error| format!("failed to get log events: {error}"))?;
                Ok(output
                    .events()
                    .iter()
                    .map(|event| LogEvent {
                        timestamp_ms: event.timestamp().unwrap_or_default(),
                        message: event.message().unwrap_or_default().to_string(),
                    })
                    .collect())
            })
        })
    }
}

struct S3ObjectLister {
    s3_client: aws_sdk_s3::Client,
}

impl ObjectLister for S3ObjectLister {
    fn list(&self, bucket: &str) -> Result<StorageListing, String> {
        let client = self.s3_client.clone();
        let bucket = bucket.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .list_objects_v2()
                    .bucket(bucket)
                    .send()
                    .await
                    .map_err(|error| format!("failed to list objects: {error}"))?;
                let objects: Vec<ObjectDescriptor> = output
                    .contents()
                    .iter()
                    .map(|object| ObjectDescriptor {
                        key: object.key().unwrap_or_default().to_string(),
                        size: object.size().unwrap_or_default(),
                        last_modified: object
                            .last_modified()
                            .and_then(|time| time.fmt(DateTimeFormat::DateTime).ok()),
                    })
                    .collect();
                let key_count = output
                    .key_count()
                    .and_then(|count| usize::try_from(count).ok())
                    .unwrap_or(objects.len());
                Ok(StorageListing { key_count, objects })
            })
        })
    }
}

struct SqsQueueReader {
    sqs_client: aws_sdk_sqs::Client,
}

impl QueueReader for SqsQueueReader {
    fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait: Duration,
    ) -> Result<Vec<QueueMessage>, String> {
        let client = self.sqs_client.clone();
        let queue_url = queue_url.to_string();
        let wait_seconds = i32::try_from(wait.as_secs()).unwrap_or(i32::MAX);

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .receive_message()
                    .queue_url(queue_url)
                    .max_number_of_messages(max_messages)
                    .wait_time_seconds(wait_seconds)
                    .send()
                    .await
                    .map_err(|error| format!("failed to receive messages: {error}"))?;
                Ok(output
                    .messages()
                    .iter()
                    .map(|message| QueueMessage {
                        message_id: message.message_id().unwrap_or_default().to_string(),
                        body: message.body().unwrap_or_default().to_string(),
                        receipt_handle: message.receipt_handle().unwrap_or_default().to_string(),
                    })
                    .collect())
            })
        })
    }

    fn reset_visibility(&self, queue_url: &str, receipt_handle: &str) -> Result<(), String> {
        let client = self.sqs_client.clone();
        let queue_url = queue_url.to_string();
        let receipt_handle = receipt_handle.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .change_message_visibility()
                    .queue_url(queue_url)
                    .receipt_handle(receipt_handle)
                    .visibility_timeout(0)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to return message to queue: {error}"))
            })
        })
    }
}

struct RuntimeDependencies {
    submitter: AwsLambdaSubmitter,
    logs: CloudWatchLogReader,
    objects: S3ObjectLister,
    queue: SqsQueueReader,
}

impl RuntimeDependencies {
    fn new(aws_config: &aws_config::SdkConfig) -> Self {
        Self {
            submitter: AwsLambdaSubmitter {
                lambda_client: aws_sdk_lambda::Client::new(aws_config),
            },
            logs: CloudWatchLogReader {
                logs_client: aws_sdk_cloudwatchlogs::Client::new(aws_config),
            },
            objects: S3ObjectLister {
                s3_client: aws_sdk_s3::Client::new(aws_config),
            },
            queue: SqsQueueReader {
                sqs_client: aws_sdk_sqs::Client::new(aws_config),
            },
        }
    }
}

async fn run(config: ProbeConfig) -> Result<ProbeReport, ProbeError> {
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.targets.region.clone()))
        .load()
        .await;
    let deps = RuntimeDependencies::new(&aws_config);
    let run_id = new_run_id();
    info!(
        run_id = run_id.as_str(),
        region = config.targets.region.as_str(),
        "starting pipeline probe"
    );

    // Stages block on SDK calls and sleeps; keep them off the async workers.
    tokio::task::spawn_blocking(move || {
        let collaborators = ProbeCollaborators {
            submitter: &deps.submitter,
            logs: &deps.logs,
            objects: &deps.objects,
            queue: &deps.queue,
            clock: &SystemClock,
        };
        run_probe(&config, &run_id, &collaborators)
    })
    .await
    .map_err(|error| ProbeError::Task(error.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(error) = logging::init_tracing_from_env() {
        eprintln!("{error}");
        return ExitCode::from(error.exit_code());
    }

    let config = match VerifyArgs::parse().into_config() {
        Ok(value) => value,
        Err(error) => {
            let error = ProbeError::from(error);
            error!("{error}");
            return ExitCode::from(error.exit_code());
        }
    };

    match run(config).await {
        Ok(report) => ExitCode::from(report.verdict.exit_code()),
        Err(error) => {
            error!("{error}");
            ExitCode::from(error.exit_code())
        }
    }
}
