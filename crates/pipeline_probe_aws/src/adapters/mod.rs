pub mod invoke;
pub mod log_reader;
pub mod object_store;
pub mod queue;
