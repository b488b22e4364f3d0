pub mod coordinator;
pub mod error;
pub mod model;
pub mod progress;
pub mod report;
pub mod request;
pub mod signal;
pub mod telemetry;
pub mod worker;
