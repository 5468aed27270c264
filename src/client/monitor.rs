//! Service reachability tracking
//!
//! Tracks whether the insight service is reachable, attempts one silent
//! recovery before surfacing an error, and re-probes periodically while
//! offline. Probes are epoch-stamped: a probe that was in flight when a
//! newer probe started may not overwrite the newer result (last-probe-wins).

use crate::client::api::ApiClient;
use crate::utils::lock_mutex_recover;
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Reachability states of the insight service as seen by this client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Unknown,
    Checking,
    Online,
    Starting,
    Offline,
}

/// Liveness probe. Injectable so tests can simulate outages, recoveries,
/// and slow probes deterministically.
pub type HealthProbe = Arc<dyn Fn() -> BoxFuture<'static, bool> + Send + Sync>;

const OFFLINE_MESSAGE: &str =
    "Cannot reach the insight service. Make sure it is running, then retry.";

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Grace period before re-probing during silent recovery
    pub grace_period: Duration,
    /// Interval between automatic re-probes while offline
    pub recheck_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(3),
            recheck_interval: Duration::from_secs(30),
        }
    }
}

struct MonitorInner {
    status: ServerStatus,
    last_checked: Option<DateTime<Utc>>,
    last_error: Option<String>,
    /// Epoch of the newest probe started so far. A finished probe applies
    /// its result only while it is still the newest.
    epoch: u64,
}

/// Resiliency state machine around the health probe
pub struct ServerMonitor {
    probe: HealthProbe,
    config: MonitorConfig,
    inner: Mutex<MonitorInner>,
}

impl ServerMonitor {
    pub fn new(probe: HealthProbe, config: MonitorConfig) -> Self {
        Self {
            probe,
            config,
            inner: Mutex::new(MonitorInner {
                status: ServerStatus::Unknown,
                last_checked: None,
                last_error: None,
                epoch: 0,
            }),
        }
    }

    /// Monitor probing a real service through the given client.
    pub fn for_client(client: &ApiClient, config: MonitorConfig) -> Self {
        let client = client.clone();
        let probe: HealthProbe = Arc::new(move || {
            let client = client.clone();
            Box::pin(async move { client.check_health().await })
        });
        Self::new(probe, config)
    }

    pub fn status(&self) -> ServerStatus {
        lock_mutex_recover(&self.inner).status
    }

    pub fn is_online(&self) -> bool {
        self.status() == ServerStatus::Online
    }

    /// User-actionable connectivity message, set when recovery fails and
    /// cleared on the next successful probe.
    pub fn last_error(&self) -> Option<String> {
        lock_mutex_recover(&self.inner).last_error.clone()
    }

    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        lock_mutex_recover(&self.inner).last_checked
    }

    /// Run a single probe and apply its result. This is also the manual
    /// retry affordance. Returns whether the service answered.
    pub async fn check(&self) -> bool {
        let (epoch, ok) = self.probe_once().await;
        self.apply(epoch, ok);
        ok
    }

    /// Make sure the service is online, attempting one silent recovery
    /// before giving up. Returns false when the service stays unreachable;
    /// callers are expected to fall back to local synthesis rather than
    /// block the user.
    pub async fn ensure_online(&self) -> bool {
        if self.is_online() {
            return true;
        }

        let (epoch, ok) = self.probe_once().await;
        if ok {
            self.apply(epoch, true);
            return true;
        }

        // First failure: silent recovery. Give the service a grace period
        // before deciding it is offline.
        {
            let mut inner = lock_mutex_recover(&self.inner);
            if inner.epoch != epoch {
                return inner.status == ServerStatus::Online;
            }
            inner.status = ServerStatus::Starting;
        }
        log::info!(
            "health probe failed, re-probing after {:?} grace period",
            self.config.grace_period
        );
        tokio::time::sleep(self.config.grace_period).await;

        let (epoch, ok) = self.probe_once().await;
        self.apply(epoch, ok);
        if !ok {
            log::warn!("silent recovery failed, insight service is offline");
        }
        self.status() == ServerStatus::Online
    }

    /// Spawn a background task that re-probes on a fixed interval while the
    /// service is offline. The task holds only a weak reference and exits
    /// once the monitor is dropped; the handle allows an earlier abort.
    pub fn start_recheck_task(monitor: &Arc<ServerMonitor>) -> tokio::task::JoinHandle<()> {
        let interval = monitor.config.recheck_interval;
        let weak = Arc::downgrade(monitor);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let Some(monitor) = weak.upgrade() else {
                    break;
                };
                if monitor.status() == ServerStatus::Offline && monitor.check().await {
                    log::info!("insight service is back online");
                }
            }
        })
    }

    async fn probe_once(&self) -> (u64, bool) {
        let epoch = {
            let mut inner = lock_mutex_recover(&self.inner);
            inner.epoch += 1;
            inner.status = ServerStatus::Checking;
            inner.epoch
        };
        let ok = (self.probe)().await;
        (epoch, ok)
    }

    fn apply(&self, epoch: u64, ok: bool) {
        let mut inner = lock_mutex_recover(&self.inner);
        if inner.epoch != epoch {
            log::debug!("discarding stale probe result (epoch {})", epoch);
            return;
        }
        inner.last_checked = Some(Utc::now());
        if ok {
            inner.status = ServerStatus::Online;
            inner.last_error = None;
        } else {
            inner.status = ServerStatus::Offline;
            inner.last_error = Some(OFFLINE_MESSAGE.to_string());
        }
    }
}
