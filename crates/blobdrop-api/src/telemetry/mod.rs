//! Telemetry module for logging and tracing

mod init;

pub use init::init_telemetry;
