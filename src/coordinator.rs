//! Launches the worker pool, waits out the run, and shuts the pool down.

use crate::model::{RunConfig, Summary, WorkerConfig};
use crate::progress::Progress;
use crate::signal::{StopSignal, SuccessCounter};
use crate::worker::worker;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const PROGRESS_TICK: Duration = Duration::from_millis(100);

/// Runs one load session.
///
/// All `config.threads` workers are spawned on the runtime before the wait
/// starts. The wait ends when `config.duration` elapses, or when `interrupt`
/// resolves, whichever comes first; without a duration only `interrupt` ends
/// it. Either way the stop signal is raised once and every worker is awaited
/// for at most `config.grace`. Workers still running after that are left
/// detached, not aborted, and counted as stragglers.
///
/// The success count in the returned summary is read after the join phase.
/// Stragglers may still add to the shared counter afterwards; those late
/// successes are not reported.
pub async fn run<F>(config: RunConfig, progress: Progress, interrupt: F) -> Summary
where
    F: Future<Output = ()>,
{
    let stop = StopSignal::new();
    let counter = Arc::new(SuccessCounter::new());
    let shared = Arc::new(WorkerConfig {
        target: config.target.clone(),
        issuer: config.issuer.clone(),
        sleep: config.sleep,
        stop: stop.clone(),
        counter: counter.clone(),
        progress: progress.clone(),
    });

    let started_at = Utc::now();
    let start = Instant::now();

    let handles: Vec<JoinHandle<()>> = (0..config.threads)
        .map(|rank| tokio::spawn(worker(rank, shared.clone())))
        .collect();
    tracing::info!(
        workers = handles.len(),
        target = %config.target,
        "workers launched"
    );

    let interrupted = wait(config.duration, &progress, &counter, start, interrupt).await;

    stop.set();
    tracing::info!(interrupted, "stop signalled");

    let workers_launched = handles.len();
    let workers_joined = join_all(handles, config.grace).await;
    let stragglers = workers_launched - workers_joined;
    if stragglers > 0 {
        tracing::warn!(stragglers, grace = ?config.grace, "workers still running after grace period");
    }

    let elapsed = start.elapsed();
    progress.finish();

    Summary {
        target: config.target,
        threads: config.threads,
        workers_launched,
        workers_joined,
        stragglers,
        successful_requests: counter.get(),
        elapsed,
        started_at,
        interrupted,
    }
}

/// Returns `true` if the wait was cut short by `interrupt`.
async fn wait<F>(
    duration: Option<Duration>,
    progress: &Progress,
    counter: &SuccessCounter,
    start: Instant,
    interrupt: F,
) -> bool
where
    F: Future<Output = ()>,
{
    let deadline = async {
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);
    tokio::pin!(interrupt);

    let mut ticker = tokio::time::interval(PROGRESS_TICK);
    loop {
        tokio::select! {
            _ = &mut deadline => return false,
            _ = &mut interrupt => return true,
            _ = ticker.tick() => progress.update(counter.get(), start.elapsed()),
        }
    }
}

/// Awaits each handle in turn for at most `grace`. Returns how many finished.
async fn join_all(handles: Vec<JoinHandle<()>>, grace: Duration) -> usize {
    let mut joined = 0;
    for (rank, handle) in handles.into_iter().enumerate() {
        match tokio::time::timeout(grace, handle).await {
            Ok(Ok(())) => joined += 1,
            Ok(Err(e)) => {
                // A panicked worker has still terminated.
                tracing::error!(rank, error = %e, "worker task failed");
                joined += 1;
            }
            Err(_) => tracing::debug!(rank, "worker did not stop within grace period"),
        }
    }
    joined
}
