use lambda_runtime::{service_fn, Error, LambdaEvent};
use pipeline_probe_aws::handlers::compute::{handle_pipeline_event, ComputeAck};
use pipeline_probe_aws::logging;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ComputeAck, Error> {
    handle_pipeline_event(&event.payload).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init_tracing_from_env()?;
    lambda_runtime::run(service_fn(handle_request)).await
}
