use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};
use wsprobe_core::ProbeMessage;

use crate::config::ProbeConfig;
use crate::error::ProbeError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug)]
pub enum ProbeOutcome {
    /// A data message arrived inside the receive window.
    Received(ProbeMessage),
    /// The window expired quietly. Still counts as a pass.
    NoMessage,
    Failed(ProbeError),
}

#[derive(Debug)]
pub struct ProbeReport {
    pub outcome: ProbeOutcome,
    pub elapsed: Duration,
}

impl ProbeReport {
    pub fn passed(&self) -> bool {
        !matches!(self.outcome, ProbeOutcome::Failed(_))
    }

    pub fn message(&self) -> Option<&ProbeMessage> {
        match &self.outcome {
            ProbeOutcome::Received(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match &self.outcome {
            ProbeOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// One-shot connectivity check: connect, wait for a single message, close.
#[derive(Debug, Clone)]
pub struct Probe {
    config: ProbeConfig,
}

impl Probe {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Runs the probe once, writing progress lines to `out`.
    ///
    /// Never returns early with an error: every failure ends up in the
    /// report as [`ProbeOutcome::Failed`].
    pub async fn run<W: Write>(&self, out: &mut W) -> ProbeReport {
        let started = Instant::now();
        say(out, format_args!("Connecting to {}...", self.config.endpoint));
        info!(endpoint = %self.config.endpoint, "Probing WebSocket endpoint");

        let outcome = match self.session(out).await {
            Ok(Some(msg)) => ProbeOutcome::Received(msg),
            Ok(None) => ProbeOutcome::NoMessage,
            Err(err) => {
                error!(error = %err, endpoint = %self.config.endpoint, "WebSocket probe failed");
                say(out, format_args!("✗ WebSocket connection failed: {}", err));
                ProbeOutcome::Failed(err)
            }
        };

        let report = ProbeReport {
            outcome,
            elapsed: started.elapsed(),
        };
        debug!(passed = report.passed(), elapsed_ms = report.elapsed.as_millis() as u64, "Probe finished");
        report
    }

    async fn session<W: Write>(&self, out: &mut W) -> Result<Option<ProbeMessage>, ProbeError> {
        let (mut ws, response) = connect_async(self.config.endpoint.as_str())
            .await
            .map_err(ProbeError::Connect)?;
        debug!(status = %response.status(), "WebSocket handshake complete");
        say(out, format_args!("✓ Connected to WebSocket"));

        // No `?` between here and release so every path closes the socket
        let received = self.listen(&mut ws, out).await;
        release(ws).await;
        let received = received?;

        say(out, format_args!("\n✓ WebSocket connection test passed"));
        Ok(received)
    }

    async fn listen<W: Write>(
        &self,
        ws: &mut WsStream,
        out: &mut W,
    ) -> Result<Option<ProbeMessage>, ProbeError> {
        let window = self.config.receive_timeout();
        say(
            out,
            format_args!("Listening for messages ({} seconds)...", self.config.timeout_seconds),
        );

        match timeout(window, next_payload(ws)).await {
            Ok(payload) => {
                let msg = payload?;
                info!(msg_type = %msg.message_type(), "Received WebSocket message");
                say(out, format_args!("✓ Received message (type: {})", msg.message_type()));
                say(out, format_args!("  Data: {}", msg.pretty()));
                Ok(Some(msg))
            }
            Err(_) => {
                warn!(timeout_secs = self.config.timeout_seconds, "No WebSocket message before timeout");
                say(
                    out,
                    format_args!(
                        "⚠ No messages received in {} seconds (this may be normal)",
                        self.config.timeout_seconds
                    ),
                );
                Ok(None)
            }
        }
    }
}

// Waits for the first data frame; control frames are skipped
async fn next_payload(ws: &mut WsStream) -> Result<ProbeMessage, ProbeError> {
    while let Some(frame) = ws.next().await {
        match frame.map_err(ProbeError::Receive)? {
            Message::Text(text) => return Ok(ProbeMessage::from_text(&text)?),
            Message::Binary(bytes) => return Ok(ProbeMessage::from_slice(&bytes)?),
            Message::Close(frame) => {
                debug!(?frame, "Server closed WebSocket before sending data");
                return Err(ProbeError::Closed);
            }
            other => trace!(?other, "Skipping control frame"),
        }
    }
    Err(ProbeError::Closed)
}

async fn release(mut ws: WsStream) {
    if let Err(err) = ws.close(None).await {
        debug!(error = %err, "WebSocket close did not complete cleanly");
    }
}

// Progress output is best effort; a broken stdout must not change the result
fn say<W: Write>(out: &mut W, line: fmt::Arguments<'_>) {
    if let Err(err) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        debug!(error = %err, "Failed to write probe output");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timeout_and_message_outcomes_pass() {
        let report = ProbeReport {
            outcome: ProbeOutcome::NoMessage,
            elapsed: Duration::from_secs(10),
        };
        assert!(report.passed());
        assert!(report.message().is_none());

        let report = ProbeReport {
            outcome: ProbeOutcome::Received(ProbeMessage::new(json!({"type": "ping"}))),
            elapsed: Duration::from_millis(3),
        };
        assert!(report.passed());
        assert_eq!(report.message().unwrap().message_type(), "ping");
        assert!(report.error().is_none());
    }

    #[test]
    fn failures_do_not_pass() {
        let report = ProbeReport {
            outcome: ProbeOutcome::Failed(ProbeError::Closed),
            elapsed: Duration::ZERO,
        };
        assert!(!report.passed());
        assert!(matches!(report.error(), Some(ProbeError::Closed)));
    }

    #[test]
    fn say_writes_one_line() {
        let mut out = Vec::new();
        say(&mut out, format_args!("Connecting to {}...", "ws://x/ws"));
        assert_eq!(String::from_utf8(out).unwrap(), "Connecting to ws://x/ws...\n");
    }
}
