use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;
use wsprobe_client::{Probe, ProbeConfig};

// Exit status when the configuration is rejected before probing
const EXIT_BAD_CONFIG: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "ws-smoke",
    version,
    about = "Connect to a WebSocket endpoint and wait for one message"
)]
struct Cli {
    /// WebSocket URI to probe [env: WS_PROBE_ENDPOINT] [default: ws://localhost:8000/ws]
    endpoint: Option<String>,

    /// Seconds to wait for the first message [env: WS_PROBE_TIMEOUT_SECONDS] [default: 10]
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<f64>,

    /// Log probe internals to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, mut cfg: ProbeConfig) -> ProbeConfig {
        if let Some(endpoint) = &self.endpoint {
            cfg.endpoint = endpoint.clone();
        }
        if let Some(secs) = self.timeout {
            cfg.timeout_seconds = secs;
        }
        cfg
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = cli.apply(ProbeConfig::from_env());
    if let Err(e) = cfg.validate() {
        tracing::error!(error = %e, "Invalid probe configuration");
        eprintln!("Invalid configuration: {}", e);
        return ExitCode::from(EXIT_BAD_CONFIG);
    }
    tracing::debug!(endpoint = %cfg.endpoint, timeout_secs = cfg.timeout_seconds, "Configured probe");

    let report = Probe::new(cfg).run(&mut std::io::stdout()).await;
    if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "debug,tungstenite=info,tokio_tungstenite=info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
