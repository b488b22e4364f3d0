use crate::model::WorkerConfig;
use crate::request;
use std::sync::Arc;
use std::time::Duration;

/// Pause after a failed attempt so an unreachable target is not hammered in a
/// tight loop.
pub const FAILURE_BACKOFF: Duration = Duration::from_millis(20);

/// Issues requests until the stop signal is raised.
///
/// The signal is only looked at between iterations; a request in flight runs
/// to completion first. Connection errors never escape, they just trigger the
/// backoff.
pub async fn worker(rank: usize, config: Arc<WorkerConfig>) {
    tracing::debug!(rank, "worker started");
    let mut attempts = 0u64;

    while !config.stop.is_set() {
        attempts += 1;
        match request::issue(&config.issuer, &config.target).await {
            Ok(()) => {
                config
                    .counter
                    .increment(|total| config.progress.milestone(total));
            }
            Err(e) => {
                tracing::debug!(rank, error = %e, "request failed");
                tokio::time::sleep(FAILURE_BACKOFF).await;
            }
        }
        tokio::time::sleep(config.sleep).await;
    }

    tracing::debug!(rank, attempts, "worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IssuerConfig, Target};
    use crate::progress::Progress;
    use crate::signal::{StopSignal, SuccessCounter};
    use tokio::net::TcpListener;

    fn config(port: u16) -> Arc<WorkerConfig> {
        Arc::new(WorkerConfig {
            target: Target {
                host: "127.0.0.1".to_string(),
                port,
            },
            issuer: IssuerConfig {
                read_timeout: Duration::from_millis(100),
                ..IssuerConfig::default()
            },
            sleep: Duration::from_millis(1),
            stop: StopSignal::new(),
            counter: Arc::new(SuccessCounter::new()),
            progress: Progress::hidden(),
        })
    }

    #[tokio::test]
    async fn exits_immediately_when_already_stopped() {
        let cfg = config(1);
        cfg.stop.set();
        tokio::time::timeout(Duration::from_secs(1), worker(0, cfg.clone()))
            .await
            .unwrap();
        assert_eq!(cfg.counter.get(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failures_do_not_count_and_do_not_crash() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let cfg = config(port);
        let handle = tokio::spawn(worker(0, cfg.clone()));
        tokio::time::sleep(Duration::from_millis(200)).await;
        cfg.stop.set();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cfg.counter.get(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn counts_each_completed_send() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 256];
                    let _ = tokio::io::AsyncReadExt::read(&mut sock, &mut buf).await;
                });
            }
        });

        let cfg = config(port);
        let handle = tokio::spawn(worker(0, cfg.clone()));
        tokio::time::sleep(Duration::from_millis(300)).await;
        cfg.stop.set();
        handle.await.unwrap();
        let total = cfg.counter.get();
        assert!(total > 0);
        assert_eq!(cfg.counter.get(), total);
    }
}
