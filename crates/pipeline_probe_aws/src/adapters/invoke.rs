use pipeline_probe_core::contract::SubmissionAck;

/// Fire-and-forget submission of a payload to the compute function.
pub trait InvocationSubmitter {
    fn submit(&self, target: &str, payload: &[u8]) -> Result<SubmissionAck, String>;
}
