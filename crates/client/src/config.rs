use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8000/ws";
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// WebSocket URI to probe.
    pub endpoint: String,
    /// How long to wait for the first inbound message.
    pub timeout_seconds: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ProbeConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Empty or
    /// unparsable values keep the default.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = ProbeConfig::default();

        if let Some(v) = lookup("WS_PROBE_ENDPOINT") {
            if !v.is_empty() {
                cfg.endpoint = v;
            }
        }
        if let Some(v) = lookup("WS_PROBE_TIMEOUT_SECONDS") {
            if let Ok(s) = v.trim().parse::<f64>() {
                cfg.timeout_seconds = s;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            source,
        })?;
        match url.scheme() {
            "ws" | "wss" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingHost(self.endpoint.clone()));
        }
        timeout_duration(self.timeout_seconds)?;
        Ok(())
    }

    /// Receive window as a `Duration`. Out-of-range values clamp to the
    /// default; call [`ProbeConfig::validate`] first to reject them instead.
    pub fn receive_timeout(&self) -> Duration {
        timeout_duration(self.timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECONDS))
    }
}

fn timeout_duration(seconds: f64) -> Result<Duration, ConfigError> {
    if seconds.is_nan() || seconds <= 0.0 {
        return Err(ConfigError::InvalidTimeout(seconds));
    }
    Duration::try_from_secs_f64(seconds).map_err(|_| ConfigError::InvalidTimeout(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_target_local_ws_with_ten_second_window() {
        let cfg = ProbeConfig::default();
        assert_eq!(cfg.endpoint, "ws://localhost:8000/ws");
        assert_eq!(cfg.receive_timeout(), Duration::from_secs(10));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn env_overrides_apply() {
        let cfg = ProbeConfig::from_vars(vars(&[
            ("WS_PROBE_ENDPOINT", "wss://feed.example.com/stream"),
            ("WS_PROBE_TIMEOUT_SECONDS", "2.5"),
        ]));
        assert_eq!(cfg.endpoint, "wss://feed.example.com/stream");
        assert_eq!(cfg.receive_timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn empty_or_garbage_env_keeps_defaults() {
        let cfg = ProbeConfig::from_vars(vars(&[
            ("WS_PROBE_ENDPOINT", ""),
            ("WS_PROBE_TIMEOUT_SECONDS", "soon"),
        ]));
        assert_eq!(cfg, ProbeConfig::default());
    }

    #[test]
    fn rejects_non_websocket_schemes() {
        let cfg = ProbeConfig {
            endpoint: "http://localhost:8000/ws".into(),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::UnsupportedScheme(s)) if s == "http"));
    }

    #[test]
    fn rejects_unparsable_endpoint() {
        let cfg = ProbeConfig {
            endpoint: "localhost:8000/ws".into(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidEndpoint { .. }) | Err(ConfigError::UnsupportedScheme(_))
        ));
        let cfg = ProbeConfig {
            endpoint: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidEndpoint { .. })));
    }

    #[test]
    fn rejects_bad_timeouts() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e30] {
            let cfg = ProbeConfig {
                timeout_seconds: bad,
                ..Default::default()
            };
            assert!(
                matches!(cfg.validate(), Err(ConfigError::InvalidTimeout(_))),
                "accepted {bad}"
            );
            assert_eq!(cfg.receive_timeout(), Duration::from_secs(10));
        }
    }
}
