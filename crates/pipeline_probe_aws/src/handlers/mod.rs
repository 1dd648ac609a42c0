pub mod compute;
pub mod logs;
pub mod objects;
pub mod orchestrator;
pub mod queue;
pub mod trigger;
