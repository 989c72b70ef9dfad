//! Host health probing

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use playdeck_api_types::{HealthStatus, Host};
use playdeck_interfaces::{ConnectivityCheck, ConnectivityError};
use playdeck_storage::HostRegistry;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Reachability check through the automation tool's ad-hoc mode
///
/// Runs `<command> <hostname> -m <module>`; exit status zero means reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdHocPing {
    pub command: String,
    pub module: String,
}

impl AdHocPing {
    pub fn new(command: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            module: module.into(),
        }
    }
}

impl Default for AdHocPing {
    fn default() -> Self {
        Self::new("ansible", "ping")
    }
}

#[async_trait]
impl ConnectivityCheck for AdHocPing {
    async fn check(&self, hostname: &str) -> Result<(), ConnectivityError> {
        let output = Command::new(&self.command)
            .arg(hostname)
            .arg("-m")
            .arg(&self.module)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ConnectivityError::Invocation(e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            debug!(
                hostname,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Ping failed"
            );
            Err(ConnectivityError::Unreachable(output.status.to_string()))
        }
    }
}

/// Probes hosts and records their health
pub struct HostHealthProber {
    check: Arc<dyn ConnectivityCheck>,
    timeout: Option<Duration>,
}

impl HostHealthProber {
    /// `timeout` bounds each individual check; `None` waits indefinitely
    pub fn new(check: Arc<dyn ConnectivityCheck>, timeout: Option<Duration>) -> Self {
        Self { check, timeout }
    }

    /// Probe one host, updating its status and last-check time in place
    ///
    /// Any failure, including a timeout, marks the host unhealthy.
    pub async fn probe(&self, host: &mut Host) -> HealthStatus {
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.check.check(&host.hostname))
                .await
                .unwrap_or(Err(ConnectivityError::TimedOut(limit))),
            None => self.check.check(&host.hostname).await,
        };

        host.status = match result {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(host_id = host.id, hostname = %host.hostname, "Host probe failed: {}", e);
                HealthStatus::Unhealthy
            }
        };
        host.last_check = Utc::now();
        host.status
    }

    /// Probe every registered host in turn and return the updated inventory
    ///
    /// The registry lock is only taken to snapshot the hosts and to store each
    /// result, never while a check is running.
    pub async fn probe_all(&self, hosts: &HostRegistry) -> Vec<Host> {
        let snapshot = hosts.list();
        let total = snapshot.len();
        let mut healthy = 0;

        for mut host in snapshot {
            let status = self.probe(&mut host).await;
            if status == HealthStatus::Healthy {
                healthy += 1;
            }
            if let Err(e) = hosts.record_health(host.id, status, host.last_check) {
                warn!(host_id = host.id, "Could not record host health: {}", e);
            }
        }

        info!("Probed {} hosts, {} healthy", total, healthy);
        hosts.list()
    }
}
