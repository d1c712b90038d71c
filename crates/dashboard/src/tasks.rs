//! Background poll loop management.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// The dashboard's poll loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollLoop {
    /// Stats, peers, chain validation and ledger
    Network,
    Rewards,
    Tokenomics,
    /// Fast stats refresh while mining is on
    Mining,
}

impl fmt::Display for PollLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PollLoop::Network => "network",
            PollLoop::Rewards => "rewards",
            PollLoop::Tokenomics => "tokenomics",
            PollLoop::Mining => "mining",
        };
        f.write_str(name)
    }
}

/// Owns the join handles of the running poll loops.
#[derive(Debug, Default)]
pub struct PollTasks {
    handles: Arc<RwLock<HashMap<PollLoop, JoinHandle<()>>>>,
}

impl PollTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `kind`, replacing a loop of the same kind if one is running.
    ///
    /// The first tick fires immediately. Every tick runs as its own task and
    /// the timer never waits for it, so slow requests overlap with later ticks.
    pub async fn start<F, Fut>(&self, kind: PollLoop, period: Duration, tick: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            debug!(poll_loop = %kind, period_ms = period.as_millis() as u64, "poll loop started");

            let mut timer = interval(period.max(MIN_PERIOD));
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                timer.tick().await;
                tokio::spawn(tick());
            }
        });

        if let Some(previous) = self.handles.write().await.insert(kind, handle) {
            previous.abort();
        }
    }

    /// Aborts `kind`. Requests already in flight run to completion.
    pub async fn stop(&self, kind: PollLoop) -> bool {
        match self.handles.write().await.remove(&kind) {
            Some(handle) => {
                handle.abort();
                debug!(poll_loop = %kind, "poll loop stopped");
                true
            }
            None => false,
        }
    }

    pub async fn stop_all(&self) {
        let mut handles = self.handles.write().await;
        let count = handles.len();
        for (_, handle) in handles.drain() {
            handle.abort();
        }
        if count > 0 {
            info!(count, "poll loops stopped");
        }
    }

    pub async fn is_running(&self, kind: PollLoop) -> bool {
        self.handles
            .read()
            .await
            .get(&kind)
            .is_some_and(|handle| !handle.is_finished())
    }
}
