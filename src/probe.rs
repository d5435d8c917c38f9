//! Reachability probing.
//!
//! A probe answers one question: is `host:port` reachable right now?
//! DNS resolution and the TCP connect each run under a bounded timeout so a
//! hung network path can never stall the monitor loop beyond one timeout.
//! Failures are the expected case the whole tool exists to detect, so they
//! map to `false` rather than errors; retry cadence belongs to the caller.

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::warn;

/// Default bound on DNS resolution and on the connect attempt, each.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Source of reachability samples.
///
/// The monitor loop is generic over this so tests can script outcomes
/// without touching the network.
pub trait Probe: Send + Sync {
    /// Check reachability once. Must complete within a bounded time.
    fn check(&self) -> impl Future<Output = bool> + Send;
}

/// Probes by resolving the host and opening a TCP connection.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port, timeout: PROBE_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The `host:port` form this probe targets.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Probe for TcpProbe {
    async fn check(&self) -> bool {
        // Resolve first so a dead resolver reads as offline, not as a hang.
        let lookup = tokio::net::lookup_host((self.host.as_str(), self.port));
        let addrs = match timeout(self.timeout, lookup).await {
            Ok(Ok(addrs)) => addrs,
            Ok(Err(e)) => {
                warn!(host = %self.host, error = %e, "DNS resolution failed");
                return false;
            }
            Err(_) => {
                warn!(host = %self.host, "DNS resolution timed out");
                return false;
            }
        };

        for addr in addrs {
            match timeout(self.timeout, TcpStream::connect(addr)).await {
                Ok(Ok(_stream)) => return true,
                Ok(Err(e)) => {
                    warn!(%addr, error = %e, "connection failed");
                }
                Err(_) => {
                    warn!(%addr, "connection timed out");
                }
            }
        }
        false
    }
}
