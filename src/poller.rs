//! Cancellable periodic fetches
//!
//! A [`Poller`] runs a fetch immediately and then on a fixed interval on the
//! Tokio runtime, publishing each outcome on a watch channel. The background
//! task is aborted exactly once, by [`Poller::stop`] or on drop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::protocol::{
    Block, CrossChainTx, EcosystemHealth, NetworkStats, ProposalsResponse, Transaction,
};
use crate::traits::{ExplorerApi, HealthApi};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Latest outcome of a poller.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState<T> {
    /// No fetch has finished yet.
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> PollState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Handle to a periodic fetch task.
#[derive(Debug)]
pub struct Poller<T> {
    name: &'static str,
    state: watch::Receiver<PollState<T>>,
    task: Option<JoinHandle<()>>,
}

/// Clamps `interval` to the supported 10 to 30 second window.
pub fn clamp_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL)
}

impl<T: Clone + Send + Sync + 'static> Poller<T> {
    /// Starts polling `fetch` every `interval` (clamped to 10 to 30 seconds).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F, Fut>(name: &'static str, interval: Duration, mut fetch: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let interval = clamp_interval(interval);
        let (tx, rx) = watch::channel(PollState::Loading);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let next = match fetch().await {
                    Ok(data) => {
                        debug!(poller = name, event = "poll_succeeded");
                        PollState::Ready(data)
                    }
                    Err(e) => {
                        warn!(poller = name, error = %e, event = "poll_failed");
                        PollState::Failed(e.to_string())
                    }
                };

                if tx.send(next).is_err() {
                    // every receiver, including the handle's, is gone
                    break;
                }
            }
        });

        info!(
            poller = name,
            interval_secs = interval.as_secs(),
            event = "poller_started"
        );

        Self {
            name,
            state: rx,
            task: Some(task),
        }
    }

    pub fn state(&self) -> PollState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState<T>> {
        self.state.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl<T> Poller<T> {
    /// Aborts the background task.
    ///
    /// Returns `true` on the call that actually stopped it.
    pub fn stop(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                info!(poller = self.name, event = "poller_stopped");
                true
            }
            None => false,
        }
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Poller<NetworkStats> {
    pub fn network_stats<A: ExplorerApi + 'static>(api: Arc<A>, interval: Duration) -> Self {
        Self::spawn("network_stats", interval, move || {
            let api = Arc::clone(&api);
            async move { api.network_stats().await }
        })
    }
}

impl Poller<Block> {
    pub fn latest_block<A: ExplorerApi + 'static>(api: Arc<A>, interval: Duration) -> Self {
        Self::spawn("latest_block", interval, move || {
            let api = Arc::clone(&api);
            async move { api.latest_block().await }
        })
    }
}

impl Poller<Vec<Transaction>> {
    pub fn transactions<A: ExplorerApi + 'static>(api: Arc<A>, interval: Duration) -> Self {
        Self::spawn("transactions", interval, move || {
            let api = Arc::clone(&api);
            async move { api.transactions().await }
        })
    }
}

impl Poller<Vec<CrossChainTx>> {
    pub fn cross_chain<A: ExplorerApi + 'static>(api: Arc<A>, interval: Duration) -> Self {
        Self::spawn("cross_chain", interval, move || {
            let api = Arc::clone(&api);
            async move { api.cross_chain_transactions().await }
        })
    }
}

impl Poller<ProposalsResponse> {
    pub fn proposals<A: ExplorerApi + 'static>(api: Arc<A>, interval: Duration) -> Self {
        Self::spawn("proposals", interval, move || {
            let api = Arc::clone(&api);
            async move { api.proposals().await }
        })
    }
}

impl Poller<EcosystemHealth> {
    pub fn ecosystem_health<A: HealthApi + 'static>(api: Arc<A>, interval: Duration) -> Self {
        Self::spawn("ecosystem_health", interval, move || {
            let api = Arc::clone(&api);
            async move { EcosystemHealth::fetch(api.as_ref()).await }
        })
    }
}
