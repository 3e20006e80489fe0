//! Supervisor - owns one long-lived background task and restarts it on failure
//!
//! Each run is produced by a factory so a restart starts from a fresh future.
//! A run that panics or returns `Err` is logged and restarted after a
//! bounded exponential backoff ([`RestartPolicy`]). A run that returns `Ok`
//! ends supervision. Dropping the [`Supervisor`] aborts the task.

use super::panic_guard::{execute_guarded, PanicGuardResult};
use crate::domain::RestartPolicy;
use crate::error::Result;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{error, info, warn};

/// Handle to a supervised background task
pub struct Supervisor {
    name: &'static str,
    handle: JoinHandle<()>,
    restarts: Arc<AtomicU32>,
}

impl Supervisor {
    /// Start supervising the runs produced by `factory`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F, Fut>(name: &'static str, policy: RestartPolicy, factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let restarts = Arc::new(AtomicU32::new(0));
        let handle = tokio::spawn(supervise(name, policy, factory, Arc::clone(&restarts)));

        Self {
            name,
            handle,
            restarts,
        }
    }

    /// Total restarts since spawn
    pub fn restarts(&self) -> u32 {
        self.restarts.load(Ordering::SeqCst)
    }

    /// True once supervision ended (clean stop or restart limit reached)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        info!(task = self.name, "Supervisor dropped, stopping task");
        self.handle.abort();
    }
}

async fn supervise<F, Fut>(
    name: &'static str,
    policy: RestartPolicy,
    factory: F,
    restarts: Arc<AtomicU32>,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let mut consecutive: u32 = 0;

    loop {
        let started = Instant::now();
        info!(task = name, "Task started");

        let fault = match execute_guarded(name, factory()).await {
            PanicGuardResult::Success(Ok(())) => {
                info!(task = name, "Task finished, supervision ended");
                return;
            }
            PanicGuardResult::Success(Err(e)) => e.to_string(),
            PanicGuardResult::Panicked(msg) => format!("panic: {}", msg),
        };

        if started.elapsed() >= policy.stable_after {
            consecutive = 0;
        }
        consecutive += 1;

        if policy.is_exhausted(consecutive) {
            error!(
                task = name,
                fault = %fault,
                restarts = consecutive - 1,
                "Task failed, restart limit reached; giving up"
            );
            return;
        }

        let delay = policy.delay_for(consecutive - 1);
        restarts.fetch_add(1, Ordering::SeqCst);
        warn!(
            task = name,
            fault = %fault,
            attempt = consecutive,
            delay_ms = delay.as_millis() as u64,
            "Task failed, restarting"
        );
        sleep(delay).await;
    }
}
