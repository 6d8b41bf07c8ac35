pub mod config;
pub mod error;
pub mod postings;
pub mod sources;
pub mod telemetry;
