use pipeline_probe_core::contract::LogEvent;

pub trait LogReader {
    /// Stream names ordered by last event time, most recent first.
    fn recent_streams(&self, group: &str, limit: i32) -> Result<Vec<String>, String>;

    fn recent_events(&self, group: &str, stream: &str, limit: i32)
        -> Result<Vec<LogEvent>, String>;
}
