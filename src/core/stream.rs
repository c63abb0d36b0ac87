use crate::core::primes::ReportingPrimes;
use crate::domain::model::{PrimeReport, StreamSettings, StreamSummary};
use crate::domain::ports::{PrimeSink, StreamConfigProvider};
use crate::utils::error::{Result, StreamError};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Finds primes on a worker thread and hands every `report_every`-th one to
/// a caller-supplied sink on the caller's task.
///
/// Only one run may be in progress per instance. Once a run completes the
/// instance can be started again.
#[derive(Debug)]
pub struct ThreadSafeAsyncStream {
    settings: StreamSettings,
    active: Arc<AtomicBool>,
    work: WorkFn,
}

type WorkFn = fn(StreamSettings, mpsc::Sender<PrimeReport>) -> WorkerOutcome;

/// Clears the busy flag when the run ends, however it ends.
struct RunGuard {
    active: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
struct WorkerOutcome {
    primes_found: u32,
    sent: u32,
    cancelled: bool,
}

impl ThreadSafeAsyncStream {
    pub fn new(settings: StreamSettings) -> Self {
        Self {
            settings,
            active: Arc::new(AtomicBool::new(false)),
            work: execute_work,
        }
    }

    #[cfg(test)]
    fn with_work(settings: StreamSettings, work: WorkFn) -> Self {
        Self {
            work,
            ..Self::new(settings)
        }
    }

    pub fn from_config<C: StreamConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(StreamSettings {
            prime_count: config.prime_count(),
            report_every: config.report_every(),
            queue_capacity: config.queue_capacity(),
        })
    }

    pub fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<RunGuard> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StreamError::StreamBusy)?;
        Ok(RunGuard {
            active: Arc::clone(&self.active),
        })
    }

    pub async fn run<S>(&self, sink: &mut S) -> Result<StreamSummary>
    where
        S: PrimeSink + ?Sized,
    {
        self.run_with_shutdown(sink, std::future::pending::<()>())
            .await
    }

    /// Like [`run`](Self::run), but stops receiving as soon as `shutdown`
    /// resolves. The worker then discards whatever it still had queued.
    pub async fn run_with_shutdown<S, F>(&self, sink: &mut S, shutdown: F) -> Result<StreamSummary>
    where
        S: PrimeSink + ?Sized,
        F: Future<Output = ()>,
    {
        let _guard = self.acquire()?;
        let started = Instant::now();
        let settings = self.settings;

        tracing::info!(
            "🚀 Starting prime stream: {} primes, reporting every {}",
            settings.prime_count,
            settings.report_every
        );

        let (tx, mut rx) = mpsc::channel::<PrimeReport>(settings.queue_capacity.max(1));
        let work = self.work;
        let worker = tokio::task::spawn_blocking(move || work(settings, tx));

        let mut delivered = 0u32;
        let mut last_prime = None;
        let mut sink_error = None;

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::warn!("🛑 Shutdown requested, stopping prime stream");
                    break;
                }
                report = rx.recv() => {
                    let Some(report) = report else { break };
                    tracing::debug!("Prime #{} = {} received", report.ordinal, report.value);
                    if let Err(e) = sink.deliver(report.value) {
                        sink_error = Some(e);
                        break;
                    }
                    delivered += 1;
                    last_prime = Some(report.value);
                }
            }
        }

        // 關閉接收端，worker 找到下一個質數時就會停下
        drop(rx);

        let outcome = worker.await.map_err(|e| StreamError::WorkerFailed {
            message: e.to_string(),
        })?;

        if let Some(e) = sink_error {
            tracing::error!("❌ Sink failed after {} deliveries: {}", delivered, e);
            return Err(e);
        }

        let summary = StreamSummary {
            primes_found: outcome.primes_found,
            delivered,
            last_prime,
            cancelled: outcome.cancelled,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            "✅ Prime stream finished: {} primes found, {} sent, {} delivered in {:?}",
            summary.primes_found,
            outcome.sent,
            summary.delivered,
            summary.elapsed
        );
        Ok(summary)
    }
}

impl Default for ThreadSafeAsyncStream {
    fn default() -> Self {
        Self::new(StreamSettings::default())
    }
}

// Runs on the blocking pool. Its only link back to the caller is `tx`.
fn execute_work(settings: StreamSettings, tx: mpsc::Sender<PrimeReport>) -> WorkerOutcome {
    let _span = tracing::debug_span!("prime_worker").entered();
    let mut primes = ReportingPrimes::new(settings.prime_count, settings.report_every);
    let mut sent = 0u32;

    while let Some(report) = primes.next_until(|| tx.is_closed()) {
        if tx.blocking_send(report).is_err() {
            tracing::debug!(
                "Receiver closed, dropping prime #{} and stopping",
                report.ordinal
            );
            return WorkerOutcome {
                primes_found: primes.primes_found(),
                sent,
                cancelled: true,
            };
        }
        sent += 1;
    }

    let cancelled = !primes.is_exhausted();
    if cancelled {
        tracing::debug!("Receiver closed after {} primes, stopping", primes.primes_found());
    } else {
        tracing::debug!("Worker done after {} primes", primes.primes_found());
    }
    WorkerOutcome {
        primes_found: primes.primes_found(),
        sent,
        cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::primes::MAX_PRIME_COUNT;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn settings(prime_count: u32, report_every: u32) -> StreamSettings {
        StreamSettings {
            prime_count,
            report_every,
            queue_capacity: 4,
        }
    }

    #[tokio::test]
    async fn test_delivers_in_order() {
        let stream = ThreadSafeAsyncStream::new(settings(3, 1));
        let mut received = Vec::new();
        let summary = stream.run(&mut |p: u32| received.push(p)).await.unwrap();

        assert_eq!(received, vec![2, 3, 5]);
        assert_eq!(summary.delivered, 3);
        assert_eq!(summary.primes_found, 3);
        assert_eq!(summary.last_prime, Some(5));
        assert!(!summary.cancelled);
    }

    #[tokio::test]
    async fn test_default_settings_deliver_ten_values() {
        let stream = ThreadSafeAsyncStream::default();
        let mut received = Vec::new();
        let summary = stream.run(&mut |p: u32| received.push(p)).await.unwrap();

        assert_eq!(received.len(), 10);
        assert_eq!(received.first(), Some(&7_919));
        assert_eq!(summary.last_prime, Some(104_729));
        assert!(received.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_zero_deliveries() {
        let stream = ThreadSafeAsyncStream::new(settings(5, 10));
        let mut calls = 0;
        let summary = stream.run(&mut |_: u32| calls += 1).await.unwrap();

        assert_eq!(calls, 0);
        assert_eq!(summary.delivered, 0);
        assert_eq!(summary.primes_found, 5);
        assert_eq!(summary.last_prime, None);
    }

    #[tokio::test]
    async fn test_busy_while_running_then_reusable() {
        let stream = ThreadSafeAsyncStream::new(settings(3, 1));
        let mut running_seen = None;
        let mut received = Vec::new();

        {
            let mut sink = |p: u32| {
                received.push(p);
                if running_seen.is_none() {
                    running_seen = Some(stream.is_running());
                }
            };
            stream.run(&mut sink).await.unwrap();
        }

        assert_eq!(running_seen, Some(true));
        assert!(!stream.is_running());

        let again = stream.run(&mut |_: u32| {}).await.unwrap();
        assert_eq!(again.delivered, 3);
    }

    #[tokio::test]
    async fn test_concurrent_run_is_rejected() {
        let stream = ThreadSafeAsyncStream::new(StreamSettings {
            prime_count: MAX_PRIME_COUNT,
            report_every: 1,
            queue_capacity: 1,
        });
        let started = Notify::new();
        let finished = Notify::new();

        let mut first_sink = |_: u32| started.notify_one();
        let mut second_sink = |_: u32| {};
        let first = stream.run_with_shutdown(&mut first_sink, finished.notified());
        let second = async {
            started.notified().await;
            let result = stream.run(&mut second_sink).await;
            finished.notify_one();
            result
        };

        let (first, second) = tokio::join!(first, second);
        assert!(matches!(second, Err(StreamError::StreamBusy)));
        assert!(first.unwrap().cancelled);
        assert!(!stream.is_running());
    }

    #[tokio::test]
    async fn test_shutdown_between_reports() {
        let stream = ThreadSafeAsyncStream::new(StreamSettings {
            prime_count: MAX_PRIME_COUNT,
            report_every: u32::MAX,
            queue_capacity: 1,
        });

        let mut calls = 0;
        let mut sink = |_: u32| calls += 1;
        let run = stream.run_with_shutdown(&mut sink, tokio::time::sleep(Duration::from_millis(20)));
        let summary = tokio::time::timeout(Duration::from_secs(3), run)
            .await
            .expect("worker did not stop after shutdown")
            .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.delivered, 0);
        assert!(summary.primes_found < MAX_PRIME_COUNT);
        assert!(!stream.is_running());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_worker_panic_reported() {
        fn exploding_work(_: StreamSettings, _: mpsc::Sender<PrimeReport>) -> WorkerOutcome {
            panic!("worker blew up");
        }

        let stream = ThreadSafeAsyncStream::with_work(settings(3, 1), exploding_work);
        let result = stream.run(&mut |_: u32| {}).await;

        assert!(matches!(result, Err(StreamError::WorkerFailed { .. })));
        assert!(!stream.is_running());
    }

    #[tokio::test]
    async fn test_failing_sink_stops_worker() {
        struct FailAfter(u32);

        impl PrimeSink for FailAfter {
            fn deliver(&mut self, _prime: u32) -> Result<()> {
                if self.0 == 0 {
                    return Err(StreamError::SinkFailed {
                        message: "closed".to_string(),
                    });
                }
                self.0 -= 1;
                Ok(())
            }
        }

        let stream = ThreadSafeAsyncStream::new(StreamSettings {
            prime_count: MAX_PRIME_COUNT,
            report_every: 1,
            queue_capacity: 1,
        });
        let result = stream.run(&mut FailAfter(2)).await;

        assert!(matches!(result, Err(StreamError::SinkFailed { .. })));
        assert!(!stream.is_running());
    }
}
