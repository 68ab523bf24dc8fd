//! Out-of-process worker back-end.
//!
//! Owns one worker subprocess and one Unix-socket channel to it, paired as a
//! session. The session is established lazily on the first execute, survives
//! across calls, and is rebuilt from scratch after any failure.

use async_trait::async_trait;
use std::io::{self, ErrorKind};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

use crate::adapter::{BrokerAdapter, wire};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::types::{Command as OrderCommand, OrderRequest};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

type Channel = BufReader<UnixStream>;

/// Subprocess handle and channel handle, exclusively owned, replaced in
/// place on reconnection.
#[derive(Default)]
struct WorkerSession {
    child: Option<Child>,
    channel: Option<Channel>,
}

/// Adapter that forwards requests to a companion worker process over a
/// local byte-stream channel.
pub struct WorkerAdapter {
    socket_path: String,
    worker_path: String,
    autostart: bool,
    connect_timeout: Duration,
    retry_interval: Duration,
    connected: AtomicBool,
    // One in-flight request per session; also serializes reconnects.
    session: Mutex<WorkerSession>,
}

impl WorkerAdapter {
    pub fn new(cfg: &BridgeConfig) -> Self {
        Self {
            socket_path: cfg.socket_path.clone(),
            worker_path: cfg.worker_path.clone(),
            autostart: cfg.worker_autostart,
            connect_timeout: cfg.connect_timeout(),
            retry_interval: cfg.retry_interval(),
            connected: AtomicBool::new(false),
            session: Mutex::new(WorkerSession::default()),
        }
    }

    /// Establish the session if it is not already live. Idempotent; run at
    /// the start of every execute under the session lock.
    async fn ensure_connected(&self, session: &mut WorkerSession) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) && session.channel.is_some() {
            return Ok(());
        }

        if self.autostart {
            self.ensure_worker_process(session)?;
        }

        let deadline = Instant::now() + self.connect_timeout;
        let stream = self.open_channel(deadline).await?;

        // Liveness probe, bounded by what is left of the connect deadline.
        let mut channel = BufReader::new(stream);
        let remaining = deadline
            .saturating_duration_since(Instant::now())
            .max(self.retry_interval);
        match timeout(remaining, round_trip(&mut channel, wire::PING)).await {
            Ok(Ok(reply)) if reply == wire::PONG => {}
            Ok(Ok(reply)) => {
                warn!(%reply, "unexpected handshake reply");
                return Err(BridgeError::NotConnected);
            }
            Ok(Err(e)) => {
                warn!(error = %e, "handshake failed");
                return Err(BridgeError::NotConnected);
            }
            Err(_) => {
                warn!("handshake timed out");
                return Err(BridgeError::NotConnected);
            }
        }

        info!(socket = %self.socket_path, "worker session established");
        session.channel = Some(channel);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Reuse a still-live subprocess or spawn a fresh one.
    fn ensure_worker_process(&self, session: &mut WorkerSession) -> Result<()> {
        if let Some(child) = session.child.as_mut() {
            match child.try_wait() {
                Ok(None) => return Ok(()), // still running
                Ok(Some(status)) => {
                    warn!(%status, "worker process exited");
                    session.child = None;
                }
                Err(e) => {
                    warn!(error = %e, "lost track of worker process");
                    session.child = None;
                }
            }
        }

        let child = Command::new(&self.worker_path)
            .arg("--socket")
            .arg(&self.socket_path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                warn!(path = %self.worker_path, error = %e, "failed to spawn worker");
                BridgeError::NotConnected
            })?;
        info!(pid = child.id(), path = %self.worker_path, "spawned worker");
        session.child = Some(child);
        Ok(())
    }

    /// Connect to the socket, retrying while the worker is still coming up.
    async fn open_channel(&self, deadline: Instant) -> Result<UnixStream> {
        loop {
            match UnixStream::connect(&self.socket_path).await {
                Ok(stream) => {
                    debug!(socket = %self.socket_path, "channel open");
                    return Ok(stream);
                }
                // Socket not yet present or not yet accepting: keep retrying.
                Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::ConnectionRefused) => {
                    if Instant::now() + self.retry_interval >= deadline {
                        warn!(socket = %self.socket_path, "timed out waiting for worker channel");
                        return Err(BridgeError::NotConnected);
                    }
                    sleep(self.retry_interval).await;
                }
                Err(e) => {
                    warn!(socket = %self.socket_path, error = %e, "channel open failed");
                    return Err(BridgeError::NotConnected);
                }
            }
        }
    }

    /// Drop the channel and clear the connected flag; the next call re-runs
    /// the full connect sequence.
    fn invalidate(&self, session: &mut WorkerSession) {
        session.channel = None;
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Graceful worker termination: SHUTDOWN line, bounded wait, then kill.
    /// The channel handle is released regardless of prior state.
    pub async fn shutdown(&self) {
        let mut session = self.session.lock().await;

        if let Some(channel) = session.channel.as_mut() {
            let _ = timeout(SHUTDOWN_GRACE, round_trip(channel, wire::SHUTDOWN)).await;
        }
        self.invalidate(&mut session);

        if let Some(mut child) = session.child.take() {
            match timeout(SHUTDOWN_GRACE, child.wait()).await {
                Ok(_) => info!("worker exited"),
                Err(_) => {
                    warn!("worker did not exit in time, killing");
                    let _ = child.kill().await;
                }
            }
        }
    }
}

#[async_trait]
impl BrokerAdapter for WorkerAdapter {
    async fn execute(&self, req: &OrderRequest) -> Result<()> {
        let mut session = self.session.lock().await;
        self.ensure_connected(&mut session).await?;

        match req.command {
            OrderCommand::Place => {
                let line = wire::encode_place(req);
                let Some(channel) = session.channel.as_mut() else {
                    return Err(BridgeError::NotConnected);
                };
                match round_trip(channel, &line).await {
                    Ok(reply) if wire::is_ok(&reply) => {
                        debug!(%reply, "place accepted");
                        Ok(())
                    }
                    Ok(reply) => {
                        // Worker answered; the session stays up.
                        warn!(%reply, "place rejected by worker");
                        Err(BridgeError::Adapter(format!("worker rejected place: {reply}")))
                    }
                    Err(e) => {
                        warn!(error = %e, "channel fault, session invalidated");
                        self.invalidate(&mut session);
                        Err(BridgeError::Adapter(format!("worker channel fault: {e}")))
                    }
                }
            }
            // Only PLACE is carried on the wire so far; everything else is
            // acknowledged without contacting the worker.
            _ => {
                debug!(command = ?req.command, "command not forwarded to worker");
                Ok(())
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Write one request line, read one reply line.
async fn round_trip(channel: &mut Channel, request: &str) -> io::Result<String> {
    channel.write_all(request.as_bytes()).await?;
    channel.write_all(b"\n").await?;
    channel.flush().await?;

    let mut line = String::new();
    let n = channel.read_line(&mut line).await?;
    if n == 0 {
        return Err(io::Error::new(
            ErrorKind::UnexpectedEof,
            "worker closed the channel",
        ));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
