use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Anything that makes a probe run fail. A receive timeout is not one of them.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Connect(#[source] tungstenite::Error),
    #[error("receive failed: {0}")]
    Receive(#[source] tungstenite::Error),
    #[error("connection closed before a message arrived")]
    Closed,
    #[error("payload is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported endpoint scheme {0:?} (expected ws or wss)")]
    UnsupportedScheme(String),
    #[error("endpoint {0:?} has no host")]
    MissingHost(String),
    #[error("timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),
}
