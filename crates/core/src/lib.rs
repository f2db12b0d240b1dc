pub mod message;

pub use message::{ProbeMessage, UNKNOWN_TYPE};
