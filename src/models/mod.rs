//! Data models and structures for the network benchmark

pub mod config;
pub mod sample;

// Re-export main model types
pub use config::Config;
pub use sample::{RunSequence, Sample, SessionOutcome, SessionState};
