pub mod config;
pub mod error;
pub mod client;

pub use config::{ProbeConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECONDS};
pub use error::{ConfigError, ProbeError};
pub use client::{Probe, ProbeOutcome, ProbeReport};
pub use wsprobe_core::{ProbeMessage, UNKNOWN_TYPE};
