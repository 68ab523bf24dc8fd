//! Companion worker process.
//!
//! Line-oriented Unix-socket server the bridge talks to. Serves one client
//! at a time; each request is a single line and gets a single line back:
//!
//!   PING             → PONG
//!   CONNECT          → OK … | ERROR …
//!   PLACE <fields>   → OK … | ERROR …
//!   SHUTDOWN         → OK shutting down  (then exits)
//!
//! The broker connector behind the server is a stub; wiring a real broker
//! session in its place is deliberately out of scope here.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Deserialize)]
struct WorkerConfig {
    #[serde(default = "default_host")]
    broker_host: String,
    #[serde(default = "default_port")]
    broker_port: u16,
}

fn default_host() -> String {
    "sim.broker.invalid".to_string()
}
fn default_port() -> u16 {
    10_443
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            broker_host: default_host(),
            broker_port: default_port(),
        }
    }
}

impl WorkerConfig {
    fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        toml::from_str(&content).with_context(|| format!("parsing config {path}"))
    }
}

/// Canned broker connector used when no real broker SDK is available.
struct StubConnector {
    config: WorkerConfig,
}

impl StubConnector {
    fn connect(&self) -> String {
        format!(
            "OK stub connected (host={}:{})",
            self.config.broker_host, self.config.broker_port
        )
    }

    fn place_order(&self, fields: &str) -> String {
        format!("OK stub order placed: {fields}")
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,orderbridge_worker=debug"));
    fmt().with_env_filter(filter).with_target(false).init();

    let mut socket_arg: Option<String> = None;
    let mut config_arg: Option<String> = None;
    let args: Vec<String> = std::env::args().collect();
    for pair in args.windows(2) {
        match pair[0].as_str() {
            "--socket" => socket_arg = Some(pair[1].clone()),
            "--config" => config_arg = Some(pair[1].clone()),
            _ => {}
        }
    }
    let Some(socket_path) = socket_arg else {
        bail!("usage: orderbridge-worker --socket <path> [--config <path>]");
    };

    let config = WorkerConfig::load(config_arg.as_deref())?;
    info!(socket = %socket_path, "worker starting");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(&socket_path, StubConnector { config }))
}

async fn run(socket_path: &str, connector: StubConnector) -> Result<()> {
    // A previous run may have left its socket file behind.
    let _ = std::fs::remove_file(socket_path);
    let listener =
        UnixListener::bind(socket_path).with_context(|| format!("binding {socket_path}"))?;
    info!(socket = %socket_path, "listening");

    loop {
        let (stream, _) = listener.accept().await?;
        info!("client connected");
        match serve_client(stream, &connector).await {
            Ok(true) => break,
            Ok(false) => info!("client disconnected"),
            Err(e) => warn!(error = %e, "connection error"),
        }
    }

    let _ = std::fs::remove_file(socket_path);
    info!("worker exiting");
    Ok(())
}

/// Serve one connected client. Returns true on a SHUTDOWN request.
async fn serve_client(stream: UnixStream, connector: &StubConnector) -> Result<bool> {
    let mut channel = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        if channel.read_line(&mut line).await? == 0 {
            return Ok(false);
        }
        let request = line.trim();
        if request.is_empty() {
            continue;
        }

        let mut shutdown = false;
        let reply = match request {
            "PING" => "PONG".to_string(),
            "CONNECT" => connector.connect(),
            "SHUTDOWN" => {
                shutdown = true;
                "OK shutting down".to_string()
            }
            _ if request.starts_with("PLACE") => {
                let fields = request.strip_prefix("PLACE").unwrap_or("").trim_start();
                connector.place_order(fields)
            }
            _ => format!("ERROR unknown command: {request}"),
        };

        channel.write_all(reply.as_bytes()).await?;
        channel.write_all(b"\n").await?;
        channel.flush().await?;

        if shutdown {
            return Ok(true);
        }
    }
}
